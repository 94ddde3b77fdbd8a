use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::model::TimelineModel;

/// Which half of a segment the playhead is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Progress is advancing toward the next marker.
    Move,
    /// Progress rests on a marker while virtual time keeps running.
    Hold,
}

/// Piecewise-linear mapping from virtual time to progress.
///
/// The axis is split into `segments` equal steps. Each step is a move phase
/// (progress rises linearly by `1 / segments`) followed by a hold phase
/// (progress stays put).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressCurve {
    pub segments: usize,
    pub move_duration: f64,
    pub hold_duration: f64,
}

impl ProgressCurve {
    pub fn new(segments: usize, move_duration: f64, hold_duration: f64) -> Self {
        Self {
            segments: segments.max(1),
            move_duration,
            hold_duration,
        }
    }

    pub fn for_model(model: &TimelineModel, config: &TimelineConfig) -> Self {
        Self::new(
            model.total_segments(),
            config.durations.move_phase,
            config.durations.hold_phase,
        )
    }

    pub fn segment_duration(&self) -> f64 {
        self.move_duration + self.hold_duration
    }

    pub fn total_duration(&self) -> f64 {
        self.segments as f64 * self.segment_duration()
    }

    /// Progress step between adjacent markers.
    pub fn step_size(&self) -> f64 {
        1.0 / self.segments as f64
    }

    /// Fraction of each segment spent moving.
    pub fn move_fraction(&self) -> f64 {
        self.move_duration / self.segment_duration()
    }

    pub fn progress_at(&self, time: f64) -> f64 {
        if time <= 0.0 {
            return 0.0;
        }
        if time >= self.total_duration() {
            return 1.0;
        }
        let segment_duration = self.segment_duration();
        let segment = ((time / segment_duration).floor() as usize).min(self.segments - 1);
        let local = time - segment as f64 * segment_duration;
        let within = (local / self.move_duration).min(1.0);
        ((segment as f64 + within) / self.segments as f64).clamp(0.0, 1.0)
    }

    pub fn phase_at(&self, time: f64) -> Phase {
        let time = time.clamp(0.0, self.total_duration());
        let local = time % self.segment_duration();
        if time > 0.0 && local == 0.0 {
            // Exactly on a segment boundary: the previous hold just ended.
            return Phase::Hold;
        }
        if local < self.move_duration {
            Phase::Move
        } else {
            Phase::Hold
        }
    }

    /// Earliest virtual time at which `progress` is reached.
    pub fn earliest_time_for(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        if progress <= 0.0 {
            return 0.0;
        }
        let scaled = progress * self.segments as f64;
        let segment = (scaled.ceil() - 1.0).max(0.0);
        let within = scaled - segment;
        segment * self.segment_duration() + within * self.move_duration
    }

    /// Virtual time at which the fill arrives at the marker in `slot`.
    pub fn reach_time(&self, slot: usize) -> f64 {
        if slot == 0 {
            0.0
        } else {
            (slot - 1) as f64 * self.segment_duration() + self.move_duration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> ProgressCurve {
        ProgressCurve::new(4, 1.0, 2.0)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn totals() {
        let c = curve();
        assert_eq!(c.total_duration(), 12.0);
        assert_eq!(c.step_size(), 0.25);
        assert!(approx(c.move_fraction(), 1.0 / 3.0));
    }

    #[test]
    fn moves_then_holds() {
        let c = curve();
        assert_eq!(c.progress_at(0.0), 0.0);
        assert!(approx(c.progress_at(0.5), 0.125));
        assert!(approx(c.progress_at(1.0), 0.25));
        assert!(approx(c.progress_at(2.5), 0.25));
        assert!(approx(c.progress_at(3.5), 0.375));
        assert_eq!(c.progress_at(12.0), 1.0);
        assert_eq!(c.progress_at(-3.0), 0.0);
        assert_eq!(c.progress_at(99.0), 1.0);
    }

    #[test]
    fn progress_is_monotonic_in_time() {
        let c = curve();
        let mut last = 0.0;
        for i in 0..=1200 {
            let p = c.progress_at(i as f64 * 0.01);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn phases() {
        let c = curve();
        assert_eq!(c.phase_at(0.0), Phase::Move);
        assert_eq!(c.phase_at(0.99), Phase::Move);
        assert_eq!(c.phase_at(1.5), Phase::Hold);
        assert_eq!(c.phase_at(3.0), Phase::Hold);
        assert_eq!(c.phase_at(3.2), Phase::Move);
    }

    #[test]
    fn earliest_time_inverts_move_phase() {
        let c = curve();
        assert_eq!(c.earliest_time_for(0.0), 0.0);
        assert!(approx(c.earliest_time_for(0.125), 0.5));
        assert!(approx(c.earliest_time_for(0.25), 1.0));
        assert!(approx(c.earliest_time_for(0.375), 3.5));
        assert!(approx(c.earliest_time_for(1.0), 10.0));
        for t in [0.3, 1.0, 3.7, 7.0, 9.9] {
            let p = c.progress_at(t);
            assert!(approx(c.progress_at(c.earliest_time_for(p)), p));
        }
    }

    #[test]
    fn reach_times() {
        let c = curve();
        assert_eq!(c.reach_time(0), 0.0);
        assert_eq!(c.reach_time(1), 1.0);
        assert_eq!(c.reach_time(2), 4.0);
        assert_eq!(c.reach_time(4), 10.0);
    }

    #[test]
    fn zero_segments_clamp_to_one() {
        let c = ProgressCurve::new(0, 1.0, 2.0);
        assert_eq!(c.segments, 1);
        assert_eq!(c.total_duration(), 3.0);
    }
}
