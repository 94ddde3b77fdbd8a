use folio_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, TimelineFrame, Viewport};

use crate::format::format_date_range;
use crate::model::TimelineModel;
use crate::timeline::{TargetMap, VisualTarget};

const PADDING: f64 = 32.0;
const COMPANY_FONT_SIZE: f64 = 36.0;
const DATES_FONT_SIZE: f64 = 18.0;
const BODY_FONT_SIZE: f64 = 20.0;
const BADGE_HEIGHT: f64 = 30.0;
const BADGE_GAP: f64 = 10.0;
const SECTION_GAP: f64 = 15.0;
/// Rough advance width of one character, relative to the font size.
const CHAR_WIDTH: f64 = 0.55;

/// Render the experience card stack.
///
/// Every card with a visible style is drawn so cross-fades show both the
/// outgoing and incoming card; technology badges only render for the card
/// that is mostly faded in.
pub fn render_card(
    model: &TimelineModel,
    frame: &TimelineFrame,
    targets: Option<&TargetMap>,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 || model.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(16);
    commands.push(RenderCommand::BeginGroup {
        id: "cards".into(),
        label: Some("Experience".into()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(viewport.x, viewport.y, viewport.width, viewport.height),
        color: ThemeToken::CardBackground,
        border_color: None,
        label: None,
        target: targets.and_then(|t| t.cards).map(|h| h.0),
    });

    let text_width = (viewport.width - 2.0 * PADDING).max(0.0);
    for (index, (experience, visual)) in model
        .enriched
        .iter()
        .zip(&frame.experiences)
        .enumerate()
    {
        let style = visual.card;
        if !style.is_visible() {
            continue;
        }
        let record = &experience.record;
        let x = viewport.x + PADDING;
        let mut y = viewport.y + PADDING + COMPANY_FONT_SIZE + style.offset_y;

        commands.push(RenderCommand::DrawText {
            position: Point::new(x, y),
            text: record.company.clone(),
            color: ThemeToken::CardText,
            font_size: COMPANY_FONT_SIZE,
            align: TextAlign::Left,
            opacity: style.opacity,
        });
        y += SECTION_GAP + DATES_FONT_SIZE;
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, y),
            text: format_date_range(record),
            color: ThemeToken::CardText,
            font_size: DATES_FONT_SIZE,
            align: TextAlign::Left,
            opacity: style.opacity,
        });

        for line in wrap(&record.body, text_width, BODY_FONT_SIZE) {
            y += BODY_FONT_SIZE * 1.4;
            if y > viewport.y + viewport.height - PADDING - BADGE_HEIGHT {
                break;
            }
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, y),
                text: line,
                color: ThemeToken::CardText,
                font_size: BODY_FONT_SIZE,
                align: TextAlign::Left,
                opacity: style.opacity,
            });
        }

        if style.opacity >= 0.5 {
            let card_target = targets.and_then(|t| t.resolve(VisualTarget::Card(index)));
            let badge_y = viewport.y + viewport.height - PADDING - BADGE_HEIGHT;
            let mut badge_x = x;
            for tech in record.technologies() {
                let w = tech.chars().count() as f64 * DATES_FONT_SIZE * CHAR_WIDTH + 40.0;
                if badge_x + w > viewport.x + viewport.width - PADDING {
                    break;
                }
                commands.push(RenderCommand::DrawRect {
                    rect: Rect::new(badge_x, badge_y, w, BADGE_HEIGHT),
                    color: ThemeToken::TechBadge,
                    border_color: Some(ThemeToken::Border),
                    label: Some(tech.clone()),
                    target: card_target.map(|h| h.0),
                });
                badge_x += w + BADGE_GAP;
            }
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Greedy word wrap to an estimated pixel width. Markdown emphasis markers
/// are dropped; paragraphs stay separate lines.
pub(crate) fn wrap(text: &str, width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((width / (font_size * CHAR_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let paragraph = paragraph.trim().trim_start_matches(['#', '-', '*', ' ']);
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let word = word.trim_matches(['*', '_', '`']);
            if word.is_empty() {
                continue;
            }
            let len = line.chars().count();
            if len > 0 && len + 1 + word.chars().count() > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}
