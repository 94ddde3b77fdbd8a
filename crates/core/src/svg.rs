//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use folio_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                let stroke = border_color
                    .map(|b| format!(r#" stroke="{}""#, resolve_color(b, dark)))
                    .unwrap_or_default();
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"{stroke} rx="8"/>"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));

                // Badge text centered in the rect
                if let Some(label) = label {
                    let text_color = resolve_color(ThemeToken::TextPrimary, dark);
                    let center = rect.center();
                    svg.push_str(&format!(
                        r#"<text x="{}" y="{}" fill="{text_color}" text-anchor="middle" dominant-baseline="central" font-size="14">{}</text>"#,
                        center.x,
                        center.y,
                        escape_xml(label),
                    ));
                }
            }
            RenderCommand::DrawDot {
                center,
                radius,
                fill,
                border_color,
                border_width,
                title,
                ..
            } => {
                if *radius <= 0.0 {
                    continue;
                }
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}" stroke="{}" stroke-width="{border_width}">"#,
                    center.x,
                    center.y,
                    resolve_color(*fill, dark),
                    resolve_color(*border_color, dark),
                ));
                if let Some(title) = title {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
                }
                svg.push_str("</circle>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}" stroke-linecap="round"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
                opacity,
            } => {
                if *opacity <= 0.0 {
                    continue;
                }
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" opacity="{opacity}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Primary | ThemeToken::RailFill | ThemeToken::MilestoneTitle => "#ff5a1f",
            ThemeToken::Gray | ThemeToken::RailTrack | ThemeToken::Border => "#4a4a4a",
            ThemeToken::Background => "#101010",
            ThemeToken::Surface | ThemeToken::TechBadge => "#1f1f1f",
            ThemeToken::DotBackground => "#ffffff",
            ThemeToken::CardBackground => "#000000",
            ThemeToken::TextPrimary | ThemeToken::CardText => "#f5f5f5",
            ThemeToken::TextSecondary | ThemeToken::MilestoneText => "#b0b0b0",
            ThemeToken::TextMuted => "#7a7a7a",
        }
    } else {
        match token {
            ThemeToken::Primary | ThemeToken::RailFill | ThemeToken::MilestoneTitle => "#e4470f",
            ThemeToken::Gray | ThemeToken::RailTrack | ThemeToken::Border => "#d4d4d4",
            ThemeToken::Background => "#ffffff",
            ThemeToken::Surface | ThemeToken::TechBadge => "#f4f4f5",
            ThemeToken::DotBackground => "#ffffff",
            ThemeToken::CardBackground => "#000000",
            ThemeToken::CardText => "#ffffff",
            ThemeToken::TextPrimary => "#171717",
            ThemeToken::TextSecondary | ThemeToken::MilestoneText => "#525252",
            ThemeToken::TextMuted => "#a3a3a3",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "rail-primary".into(),
                label: None,
            },
            RenderCommand::DrawDot {
                center: Point::new(10.0, 20.0),
                radius: 14.0,
                fill: ThemeToken::DotBackground,
                border_color: ThemeToken::Primary,
                border_width: 2.0,
                title: Some("Lead @ Acme".into()),
                target: Some(3),
            },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<g id="rail-primary">"#));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Lead @ Acme"));
        assert!(svg.contains("#ff5a1f"));
    }

    #[test]
    fn hidden_text_and_collapsed_dots_are_skipped() {
        let commands = vec![
            RenderCommand::DrawText {
                position: Point::new(0.0, 0.0),
                text: "faded".into(),
                color: ThemeToken::TextPrimary,
                font_size: 12.0,
                align: TextAlign::Center,
                opacity: 0.0,
            },
            RenderCommand::DrawDot {
                center: Point::new(0.0, 0.0),
                radius: 0.0,
                fill: ThemeToken::Primary,
                border_color: ThemeToken::Primary,
                border_width: 0.0,
                title: None,
                target: None,
            },
        ];
        let svg = render_svg(&commands, 100.0, 100.0, false);
        assert!(!svg.contains("faded"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 200.0, 18.0),
            color: ThemeToken::TechBadge,
            border_color: None,
            label: Some("C++ & <Rust>".into()),
            target: None,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("C++ &amp; &lt;Rust&gt;"));
    }
}
