use folio_protocol::{ExperienceVisual, Group, TimelineFrame};

use super::curve::ProgressCurve;
use super::schedule::{Schedule, VisualTarget};
use crate::config::Layout;
use crate::model::TimelineModel;

const MIN_SPAN: f64 = 1e-6;

/// Guards `floor(progress * segments)` against landing just below an exact
/// boundary through rounding.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Index of the experience the card stack and milestone list show.
///
/// `None` only when there are no experiences.
pub fn active_index_for(progress: f64, len: usize, segments: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let progress = progress.clamp(0.0, 1.0);
    let raw = (progress * segments.max(1) as f64 + BOUNDARY_EPSILON).floor() as usize;
    Some(raw.min(last))
}

/// Fill ratio of the secondary rail, which spans only from the first
/// secondary marker to its inset end cap.
pub fn other_fill_for(progress: f64, start: f64, end_max: f64) -> f64 {
    let span = (end_max - start).max(MIN_SPAN);
    ((progress - start) / span).clamp(0.0, 1.0)
}

/// Fill ratio of a rail at `progress`.
pub fn fill_for(group: Group, progress: f64, model: &TimelineModel, layout: &Layout) -> f64 {
    match group {
        Group::Primary => progress.clamp(0.0, 1.0),
        Group::Other => other_fill_for(
            progress,
            model.other_start_position,
            model.other_end_max_position(layout),
        ),
    }
}

/// Derives every visual state from the playhead.
///
/// Borrowed views over one mounted model; cheap to construct per tick.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub model: &'a TimelineModel,
    pub curve: &'a ProgressCurve,
    pub schedule: &'a Schedule,
    pub layout: &'a Layout,
}

impl<'a> Resolver<'a> {
    pub fn new(
        model: &'a TimelineModel,
        curve: &'a ProgressCurve,
        schedule: &'a Schedule,
        layout: &'a Layout,
    ) -> Self {
        Self {
            model,
            curve,
            schedule,
            layout,
        }
    }

    /// Resolve the frame at virtual time `time`.
    pub fn at_time(&self, time: f64) -> TimelineFrame {
        let time = time.clamp(0.0, self.curve.total_duration());
        let progress = self.curve.progress_at(time);

        let primary_fill = fill_for(Group::Primary, progress, self.model, self.layout);
        let other_fill = fill_for(Group::Other, progress, self.model, self.layout);
        let end_cap_reached = progress >= self.model.other_end_max_position(self.layout);

        let visual_active = self.schedule.active_cue_at(time).map(|cue| cue.index);
        let segments = self.curve.segments as f64;

        let experiences = self
            .model
            .enriched
            .iter()
            .enumerate()
            .map(|(index, experience)| {
                let fill_contribution = if experience.slot_index == 0 {
                    1.0
                } else {
                    (progress * segments - (experience.slot_index - 1) as f64).clamp(0.0, 1.0)
                };
                ExperienceVisual {
                    index,
                    group: experience.group,
                    group_index: experience.group_index,
                    slot_position: experience.slot_position,
                    is_active: visual_active == Some(index),
                    fill_contribution,
                    dot: self.schedule.style_at(VisualTarget::dot(experience), time),
                    dot_inner: self.schedule.style_at(VisualTarget::dot_inner(experience), time),
                    label: self.schedule.style_at(VisualTarget::label(experience), time),
                    card: self.schedule.style_at(VisualTarget::Card(index), time),
                }
            })
            .collect();

        TimelineFrame {
            time,
            progress,
            primary_fill,
            other_fill,
            end_cap_reached,
            active_index: active_index_for(progress, self.model.len(), self.curve.segments),
            milestone_opacity: self.schedule.milestone_opacity_at(time),
            experiences,
        }
    }

    /// Resolve the frame for a synthetic progress value, at the earliest
    /// virtual time that progress is reached.
    pub fn at_progress(&self, progress: f64) -> TimelineFrame {
        self.at_time(self.curve.earliest_time_for(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::model::{ExperienceRecord, MarkerMatcher};

    struct Fixture {
        model: TimelineModel,
        curve: ProgressCurve,
        schedule: Schedule,
        config: TimelineConfig,
    }

    impl Fixture {
        fn new(records: &[ExperienceRecord]) -> Self {
            let config = TimelineConfig::with_primary_marker("acme");
            let model = TimelineModel::build(records, &MarkerMatcher::new(&config.primary_marker));
            let curve = ProgressCurve::for_model(&model, &config);
            let schedule = Schedule::build(&model, &curve, &config);
            Self {
                model,
                curve,
                schedule,
                config,
            }
        }

        fn resolver(&self) -> Resolver<'_> {
            Resolver::new(&self.model, &self.curve, &self.schedule, &self.config.layout)
        }
    }

    fn four_others() -> Vec<ExperienceRecord> {
        ["2010-01", "2012-01", "2014-01", "2016-01"]
            .iter()
            .map(|d| ExperienceRecord::new("Globex", "Dev", *d, Some("2020-01")))
            .collect()
    }

    #[test]
    fn active_index_at_half_progress() {
        // Four experiences plus an ongoing slot: five slots, step 0.25.
        assert_eq!(active_index_for(0.5, 4, 4), Some(2));
        assert_eq!(active_index_for(1.0, 4, 4), Some(3));
        assert_eq!(active_index_for(1.0, 4, 3), Some(3));
        assert_eq!(active_index_for(0.0, 4, 3), Some(0));
        assert_eq!(active_index_for(0.5, 0, 1), None);
    }

    #[test]
    fn active_index_survives_rounding_at_boundaries() {
        for segments in [3usize, 7, 10, 49] {
            for k in 0..segments {
                let p = k as f64 / segments as f64;
                assert_eq!(active_index_for(p, segments + 1, segments), Some(k));
            }
        }
    }

    #[test]
    fn active_index_is_bounded_and_monotonic() {
        let len = 5;
        let segments = 5;
        let mut last = 0;
        for i in 0..=1000 {
            let index = active_index_for(i as f64 / 1000.0, len, segments).unwrap_or(0);
            assert!(index < len);
            assert!(index >= last);
            last = index;
        }
        for i in (0..=1000).rev() {
            let index = active_index_for(i as f64 / 1000.0, len, segments).unwrap_or(0);
            assert!(index <= last);
            last = index;
        }
    }

    #[test]
    fn other_fill_spans_inset_rail() {
        assert_eq!(other_fill_for(0.0, 0.0, 0.92), 0.0);
        assert!((other_fill_for(0.46, 0.0, 0.92) - 0.5).abs() < 1e-12);
        assert_eq!(other_fill_for(0.95, 0.0, 0.92), 1.0);
        assert_eq!(other_fill_for(0.3, 0.5, 0.5), 0.0);
        assert_eq!(other_fill_for(0.6, 0.5, 0.5), 1.0);
    }

    #[test]
    fn frame_fills_follow_progress() {
        let fixture = Fixture::new(&four_others());
        let resolver = fixture.resolver();
        let frame = resolver.at_progress(0.5);
        assert!((frame.progress - 0.5).abs() < 1e-12);
        assert!((frame.primary_fill - 0.5).abs() < 1e-12);
        assert!((frame.other_fill - 0.5 / 0.92).abs() < 1e-9);
        assert!(!frame.end_cap_reached);
        assert!(resolver.at_progress(0.95).end_cap_reached);
    }

    #[test]
    fn exactly_one_experience_is_active() {
        let fixture = Fixture::new(&four_others());
        let resolver = fixture.resolver();
        for i in 0..=90 {
            let frame = resolver.at_time(i as f64 * 0.1);
            let active = frame.experiences.iter().filter(|e| e.is_active).count();
            assert_eq!(active, 1, "at t={}", frame.time);
        }
    }

    #[test]
    fn visual_switch_anticipates_progress_boundary() {
        let fixture = Fixture::new(&four_others());
        let resolver = fixture.resolver();
        // Marker 1 is reached at t = 1.0; the lead starts its transition at 0.7.
        let frame = resolver.at_time(0.8);
        assert_eq!(frame.active_index, Some(0));
        assert_eq!(frame.active().map(|e| e.index), Some(1));

        let frame = resolver.at_time(1.5);
        assert_eq!(frame.active_index, Some(1));
        assert_eq!(frame.active().map(|e| e.index), Some(1));
    }

    #[test]
    fn fill_contribution_tracks_marker_arrival() {
        let fixture = Fixture::new(&four_others());
        let resolver = fixture.resolver();
        let frame = resolver.at_time(0.5);
        let contributions: Vec<f64> = frame
            .experiences
            .iter()
            .map(|e| e.fill_contribution)
            .collect();
        assert_eq!(contributions[0], 1.0);
        assert!((contributions[1] - 0.5).abs() < 1e-9);
        assert_eq!(contributions[2], 0.0);
        assert_eq!(contributions[3], 0.0);
    }

    #[test]
    fn empty_model_resolves_to_static_frame() {
        let fixture = Fixture::new(&[]);
        let frame = fixture.resolver().at_time(1.0);
        assert!(frame.experiences.is_empty());
        assert_eq!(frame.active_index, None);
    }
}
