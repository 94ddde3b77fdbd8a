use folio_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::card::wrap;
use crate::model::Milestone;

const PADDING: f64 = 16.0;
const TITLE_FONT_SIZE: f64 = 18.0;
const TEXT_FONT_SIZE: f64 = 15.0;
const LINE_HEIGHT: f64 = 1.4;
const ITEM_GAP: f64 = 16.0;

/// Render the milestone list of the active experience.
///
/// Items that would overflow the viewport are left out; `opacity` is the
/// list's fade-in after an experience swap.
pub fn render_milestones(
    milestones: &[Milestone],
    opacity: f64,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    if milestones.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }

    let x = viewport.x + PADDING;
    let bottom = viewport.y + viewport.height - PADDING;
    let text_width = (viewport.width - 2.0 * PADDING).max(0.0);
    let mut y = viewport.y + PADDING;
    let mut commands = Vec::with_capacity(milestones.len() * 3 + 2);

    commands.push(RenderCommand::BeginGroup {
        id: "milestones".into(),
        label: Some("Milestones".into()),
    });

    'items: for milestone in milestones {
        let description = wrap(&milestone.description, text_width, TEXT_FONT_SIZE);
        y += TITLE_FONT_SIZE;
        if y > bottom {
            break;
        }
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, y),
            text: milestone.title.clone(),
            color: ThemeToken::MilestoneTitle,
            font_size: TITLE_FONT_SIZE,
            align: TextAlign::Left,
            opacity,
        });
        for line in description {
            y += TEXT_FONT_SIZE * LINE_HEIGHT;
            if y > bottom {
                break 'items;
            }
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, y),
                text: line,
                color: ThemeToken::MilestoneText,
                font_size: TEXT_FONT_SIZE,
                align: TextAlign::Left,
                opacity,
            });
        }
        y += ITEM_GAP;
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
