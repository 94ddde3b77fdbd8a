use folio_protocol::{
    ExperienceVisual, Group, Point, RenderCommand, TextAlign, ThemeToken, TimelineFrame, Viewport,
};

use crate::config::Layout;
use crate::format::format_month_year;
use crate::model::{EnrichedExperience, TimelineModel};
use crate::timeline::TargetMap;

const TRACK_WIDTH: f64 = 2.0;
const DOT_RADIUS: f64 = 14.0;
const DOT_BORDER: f64 = 2.0;
const INNER_RADIUS: f64 = 6.0;
const END_CAP_HEIGHT: f64 = 18.0;
const LABEL_GAP: f64 = 12.0;
const POSITION_FONT_SIZE: f64 = 18.0;
const DATE_FONT_SIZE: f64 = 16.0;
const LINE_GAP: f64 = 4.0;

/// Horizontal extent of both rails: the viewport minus the dot inset on
/// each side.
#[derive(Debug, Clone, Copy)]
struct Axis {
    left: f64,
    span: f64,
}

impl Axis {
    fn new(viewport: &Viewport, layout: &Layout) -> Self {
        let inset = layout.dot_inset.min(viewport.width / 2.0);
        Self {
            left: viewport.x + inset,
            span: (viewport.width - 2.0 * inset).max(0.0),
        }
    }

    fn x(&self, position: f64) -> f64 {
        self.left + position.clamp(0.0, 1.0) * self.span
    }
}

/// Vertical center of a rail within the viewport. The primary rail sits in
/// the upper half with labels above; the other rail in the lower half with
/// labels below.
pub fn rail_y(group: Group, viewport: &Viewport) -> f64 {
    match group {
        Group::Primary => viewport.y + viewport.height * 0.35,
        Group::Other => viewport.y + viewport.height * 0.65,
    }
}

/// Render both rails with their tracks, fills, end cap and markers.
///
/// `targets` attaches presentation handles to the emitted dots so a host
/// can hit-test them.
pub fn render_rails(
    model: &TimelineModel,
    frame: &TimelineFrame,
    layout: &Layout,
    targets: Option<&TargetMap>,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }

    let axis = Axis::new(viewport, layout);
    let mut commands = Vec::with_capacity(8 + model.len() * 5);

    for group in [Group::Primary, Group::Other] {
        let y = rail_y(group, viewport);
        commands.push(RenderCommand::BeginGroup {
            id: format!("rail-{group}"),
            label: Some(match group {
                Group::Primary => "Primary rail".into(),
                Group::Other => "Other rail".into(),
            }),
        });

        let (start, end, fill) = match group {
            Group::Primary => (0.0, 1.0, frame.primary_fill),
            Group::Other => (
                model.other_start_position,
                model.other_end_max_position(layout),
                frame.other_fill,
            ),
        };

        commands.push(RenderCommand::DrawLine {
            from: Point::new(axis.x(start), y),
            to: Point::new(axis.x(end), y),
            color: ThemeToken::RailTrack,
            width: TRACK_WIDTH,
        });
        if fill > 0.0 {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(axis.x(start), y),
                to: Point::new(axis.x(start + (end - start) * fill), y),
                color: ThemeToken::RailFill,
                width: TRACK_WIDTH,
            });
        }
        if group == Group::Other {
            let x = axis.x(end);
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, y - END_CAP_HEIGHT / 2.0),
                to: Point::new(x, y + END_CAP_HEIGHT / 2.0),
                color: if frame.end_cap_reached {
                    ThemeToken::Primary
                } else {
                    ThemeToken::Gray
                },
                width: TRACK_WIDTH,
            });
        }

        for (experience, visual) in model.enriched.iter().zip(&frame.experiences) {
            if experience.group != group {
                continue;
            }
            render_marker(
                &mut commands,
                experience,
                visual,
                targets,
                axis.x(experience.slot_position),
                y,
            );
        }

        commands.push(RenderCommand::EndGroup);
    }

    commands
}

fn render_marker(
    commands: &mut Vec<RenderCommand>,
    experience: &EnrichedExperience,
    visual: &ExperienceVisual,
    targets: Option<&TargetMap>,
    x: f64,
    y: f64,
) {
    let handles = targets.map(|t| t.dot_targets(experience)).unwrap_or_default();
    let record = &experience.record;

    if visual.label.is_visible() {
        // Two lines: position over start date.
        let (position_y, date_y) = match experience.group {
            Group::Primary => {
                let date_y = y - DOT_RADIUS - LABEL_GAP;
                (date_y - DATE_FONT_SIZE - LINE_GAP, date_y)
            }
            Group::Other => {
                let position_y = y + DOT_RADIUS + LABEL_GAP + POSITION_FONT_SIZE;
                (position_y, position_y + LINE_GAP + DATE_FONT_SIZE)
            }
        };
        let dy = visual.label.offset_y;
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, position_y + dy),
            text: record.position.clone(),
            color: ThemeToken::TextPrimary,
            font_size: POSITION_FONT_SIZE,
            align: TextAlign::Center,
            opacity: visual.label.opacity,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, date_y + dy),
            text: format_month_year(&record.start_date),
            color: ThemeToken::TextSecondary,
            font_size: DATE_FONT_SIZE,
            align: TextAlign::Center,
            opacity: visual.label.opacity,
        });
    }

    commands.push(RenderCommand::DrawDot {
        center: Point::new(x, y),
        radius: DOT_RADIUS * visual.dot.scale,
        fill: ThemeToken::DotBackground,
        border_color: if visual.dot.accent >= 0.5 {
            ThemeToken::Primary
        } else {
            ThemeToken::Gray
        },
        border_width: DOT_BORDER,
        title: Some(format!("{} @ {}", record.position, record.company)),
        target: handles.dot.map(|h| h.0),
    });

    let inner = INNER_RADIUS * visual.dot_inner.scale;
    if inner > 0.0 {
        commands.push(RenderCommand::DrawDot {
            center: Point::new(x, y),
            radius: inner,
            fill: ThemeToken::Primary,
            border_color: ThemeToken::Primary,
            border_width: 0.0,
            title: None,
            target: handles.dot_inner.map(|h| h.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::model::{ExperienceRecord, MarkerMatcher};
    use crate::timeline::{ProgressCurve, Resolver, Schedule};

    struct Scene {
        model: TimelineModel,
        curve: ProgressCurve,
        schedule: Schedule,
        config: TimelineConfig,
    }

    impl Scene {
        fn new() -> Self {
            let records = vec![
                ExperienceRecord::new("Initech", "Dev", "2015-01", Some("2016-01")),
                ExperienceRecord::new("Globex", "Senior Dev", "2016-02", Some("2018-01")),
                ExperienceRecord::new("Acme", "Lead", "2018-02", None),
            ];
            let config = TimelineConfig::with_primary_marker("acme");
            let model = TimelineModel::build(&records, &MarkerMatcher::new("acme"));
            let curve = ProgressCurve::for_model(&model, &config);
            let schedule = Schedule::build(&model, &curve, &config);
            Self {
                model,
                curve,
                schedule,
                config,
            }
        }

        fn frame(&self, progress: f64) -> TimelineFrame {
            Resolver::new(&self.model, &self.curve, &self.schedule, &self.config.layout)
                .at_progress(progress)
        }

        fn render(&self, progress: f64) -> Vec<RenderCommand> {
            let frame = self.frame(progress);
            let targets = TargetMap::for_model(&self.model);
            render_rails(
                &self.model,
                &frame,
                &self.config.layout,
                Some(&targets),
                &Viewport::new(1000.0, 400.0),
            )
        }
    }

    fn fill_line(commands: &[RenderCommand], group: &str) -> Option<(f64, f64)> {
        let mut in_group = false;
        for cmd in commands {
            match cmd {
                RenderCommand::BeginGroup { id, .. } => in_group = id == group,
                RenderCommand::DrawLine {
                    from,
                    to,
                    color: ThemeToken::RailFill,
                    ..
                } if in_group => return Some((from.x, to.x)),
                _ => {}
            }
        }
        None
    }

    #[test]
    fn groups_are_balanced() {
        let commands = Scene::new().render(0.5);
        let begins = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::BeginGroup { .. }))
            .count();
        let ends = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::EndGroup))
            .count();
        assert_eq!(begins, 2);
        assert_eq!(begins, ends);
    }

    #[test]
    fn primary_fill_tracks_progress() {
        let commands = Scene::new().render(0.5);
        let (from, to) = fill_line(&commands, "rail-primary").expect("primary fill line");
        assert_eq!(from, 10.0);
        assert!((to - 500.0).abs() < 1e-9);
    }

    #[test]
    fn no_fill_at_start() {
        let commands = Scene::new().render(0.0);
        assert!(fill_line(&commands, "rail-primary").is_none());
    }

    #[test]
    fn dots_carry_titles_and_handles() {
        let commands = Scene::new().render(0.0);
        let titles: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawDot {
                    title: Some(title),
                    target,
                    ..
                } => Some((title.as_str(), target.is_some())),
                _ => None,
            })
            .collect();
        assert_eq!(
            titles,
            [
                ("Lead @ Acme", true),
                ("Dev @ Initech", true),
                ("Senior Dev @ Globex", true),
            ]
        );
    }

    #[test]
    fn end_cap_turns_primary_once_reached() {
        let scene = Scene::new();
        let cap_color = |commands: &[RenderCommand]| {
            commands.iter().find_map(|c| match c {
                RenderCommand::DrawLine { from, to, color, .. } if from.x == to.x => Some(*color),
                _ => None,
            })
        };
        assert_eq!(cap_color(&scene.render(0.1)), Some(ThemeToken::Gray));
        assert_eq!(cap_color(&scene.render(1.0)), Some(ThemeToken::Primary));
    }

    #[test]
    fn only_first_label_visible_at_start() {
        let commands = Scene::new().render(0.0);
        let labels: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["Dev", "enero de 2015"]);
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let scene = Scene::new();
        let frame = scene.frame(0.0);
        let commands = render_rails(
            &scene.model,
            &frame,
            &scene.config.layout,
            None,
            &Viewport::new(0.0, 0.0),
        );
        assert!(commands.is_empty());
    }
}
