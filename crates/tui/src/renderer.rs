use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::format::percentage;
use folio_core::timeline::{ScrollInput, TimelineController};
use folio_core::views::{render_card, render_milestones, render_rails};
use folio_protocol::{RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Logical pixels per terminal cell.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
/// Scroll pixels per key press / wheel notch.
const SCROLL_STEP: f64 = 60.0;
/// Idle time after the last scroll before snapping kicks in.
const RELEASE_AFTER: Duration = Duration::from_millis(300);

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Primary | ThemeToken::RailFill => Color::Rgb(228, 71, 15),
        ThemeToken::Gray | ThemeToken::RailTrack => Color::DarkGray,
        ThemeToken::Background | ThemeToken::Surface | ThemeToken::CardBackground => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::DotBackground => Color::White,
        ThemeToken::TextPrimary | ThemeToken::CardText => Color::White,
        ThemeToken::TextSecondary | ThemeToken::MilestoneText => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::TechBadge => Color::Cyan,
        ThemeToken::MilestoneTitle => Color::LightRed,
    }
}

/// A viewport in logical pixels covering `area` (in cells).
fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(
        f64::from(area.width) * CELL_WIDTH,
        f64::from(area.height) * CELL_HEIGHT,
    )
}

fn put_str(buf: &mut Buffer, area: Rect, col: i64, row: i64, text: &str, fg: Color) {
    if row < 0 || row >= i64::from(area.height) {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let c = col + i as i64;
        if c < 0 {
            continue;
        }
        if c >= i64::from(area.width) {
            break;
        }
        buf[(area.x + c as u16, area.y + row as u16)]
            .set_char(ch)
            .set_fg(fg);
    }
}

/// Paint render commands laid out for `viewport_for(area)` into the cells
/// of `area`. Faded-out text (opacity below one half) is skipped.
pub fn paint(commands: &[RenderCommand], area: Rect, buf: &mut Buffer) {
    let col = |x: f64| (x / CELL_WIDTH).floor() as i64;
    let row = |y: f64| (y / CELL_HEIGHT).floor() as i64;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                let fg = theme_to_color(*color);
                if row(from.y) == row(to.y) {
                    let (a, b) = (col(from.x.min(to.x)), col(from.x.max(to.x)));
                    let len = (b - a + 1).max(0) as usize;
                    put_str(buf, area, a, row(from.y), &"─".repeat(len), fg);
                } else {
                    let (a, b) = (row(from.y.min(to.y)), row(from.y.max(to.y)));
                    for r in a..=b {
                        put_str(buf, area, col(from.x), r, "│", fg);
                    }
                }
            }
            RenderCommand::DrawDot {
                center,
                radius,
                fill,
                border_color,
                border_width,
                ..
            } => {
                if *radius <= 0.0 {
                    continue;
                }
                // A ring is drawn hollow; a borderless dot is an inner core.
                let (symbol, fg) = if *border_width > 0.0 {
                    ("○", theme_to_color(*border_color))
                } else {
                    ("●", theme_to_color(*fill))
                };
                put_str(buf, area, col(center.x), row(center.y), symbol, fg);
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                opacity,
                ..
            } => {
                if *opacity < 0.5 {
                    continue;
                }
                let width = text.chars().count() as i64;
                let start = match align {
                    TextAlign::Left => col(position.x),
                    TextAlign::Center => col(position.x) - width / 2,
                    TextAlign::Right => col(position.x) - width,
                };
                put_str(buf, area, start, row(position.y), text, theme_to_color(*color));
            }
            RenderCommand::DrawRect {
                rect,
                color,
                label: Some(label),
                ..
            } => {
                put_str(
                    buf,
                    area,
                    col(rect.x),
                    row(rect.y),
                    &format!("[{label}]"),
                    theme_to_color(*color),
                );
            }
            _ => {}
        }
    }
}

/// Interactive scrubbing: the arrow keys and mouse wheel stand in for page
/// scroll while the section is pinned.
pub fn run_tui(controller: &mut TimelineController) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let distance = controller.scroll_distance();
    let mut offset: f64 = 0.0;
    let mut last_scroll: Option<Instant> = None;
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        if last_scroll.is_some_and(|at| now.duration_since(at) >= RELEASE_AFTER) {
            controller.release();
            last_scroll = None;
        }
        if let Some(change) = controller.tick(dt) {
            log::debug!("active experience {:?} -> {:?}", change.previous, change.current);
        }

        let (Some(model), Some(frame)) = (controller.model(), controller.frame()) else {
            break;
        };
        let milestones = controller.current_milestones();
        let layout = &controller.config().layout;

        terminal.draw(|f| {
            let area = f.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " folio: {} experiences | progress {} | ↑↓ scroll | PgUp/PgDn jump | q quit ",
                    model.len(),
                    percentage(frame.progress),
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            f.render_widget(header, header_area);

            let body_height = area.height.saturating_sub(1);
            let rails_height = (body_height * 2 / 5).max(1);
            let rails_area = Rect::new(0, 1, area.width, rails_height);
            let lower_y = 1 + rails_height;
            let lower_height = body_height.saturating_sub(rails_height);
            let card_width = area.width * 3 / 5;
            let card_area = Rect::new(0, lower_y, card_width, lower_height);
            let milestones_area =
                Rect::new(card_width, lower_y, area.width - card_width, lower_height);

            let background = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            f.render_widget(background, Rect::new(0, 1, area.width, body_height));

            let rails = render_rails(model, &frame, layout, None, &viewport_for(rails_area));
            let card = render_card(model, &frame, None, &viewport_for(card_area));
            let list = render_milestones(
                milestones,
                frame.milestone_opacity,
                &viewport_for(milestones_area),
            );

            let buf = f.buffer_mut();
            paint(&rails, rails_area, buf);
            paint(&card, card_area, buf);
            paint(&list, milestones_area, buf);
        })?;

        let timeout = if controller.is_settled() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(16)
        };
        if event::poll(timeout)? {
            let segment = distance / model_segments(controller);
            let previous = offset;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Down | KeyCode::Char('j') => offset += SCROLL_STEP,
                    KeyCode::Up | KeyCode::Char('k') => offset -= SCROLL_STEP,
                    KeyCode::PageDown => offset += segment,
                    KeyCode::PageUp => offset -= segment,
                    KeyCode::Home => offset = 0.0,
                    KeyCode::End => offset = distance,
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => offset += SCROLL_STEP,
                    MouseEventKind::ScrollUp => offset -= SCROLL_STEP,
                    _ => {}
                },
                _ => {}
            }
            offset = offset.clamp(0.0, distance);
            if offset != previous {
                controller.scroll(ScrollInput::pinned(offset));
                last_scroll = Some(Instant::now());
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn model_segments(controller: &TimelineController) -> f64 {
    controller
        .model()
        .map_or(1.0, |m| m.total_segments() as f64)
}
