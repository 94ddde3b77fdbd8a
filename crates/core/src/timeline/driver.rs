use serde::{Deserialize, Serialize};

use super::curve::ProgressCurve;
use super::snap::SnapPolicy;
use crate::config::TimelineConfig;

/// Residual below which smoothing snaps onto its target.
const SETTLE_EPSILON: f64 = 1e-6;

/// One reading of the pinned region's scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollInput {
    /// Scroll offset past the top of the pinned region, in pixels.
    pub offset_px: f64,
    /// Whether the region is currently pinned to the viewport.
    pub pinned: bool,
}

impl ScrollInput {
    pub fn pinned(offset_px: f64) -> Self {
        Self {
            offset_px,
            pinned: true,
        }
    }
}

/// Turns scroll readings into virtual time on the progress curve.
///
/// The scroll position sets a target time; the rendered time follows it with
/// exponential smoothing (`scrub_seconds`), the same lag a scrubbed tween has.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDriver {
    curve: ProgressCurve,
    scroll_multiplier: f64,
    scrub_seconds: f64,
    snap: Option<SnapPolicy>,
    target_time: f64,
    current_time: f64,
}

impl ProgressDriver {
    /// `snap_enabled` should be false when there is a single experience;
    /// there is nothing to snap between.
    pub fn new(curve: ProgressCurve, config: &TimelineConfig, snap_enabled: bool) -> Self {
        let snap = (snap_enabled && config.snap.enabled)
            .then(|| SnapPolicy::new(&curve, config.snap.threshold));
        Self {
            curve,
            scroll_multiplier: config.layout.scroll_multiplier,
            scrub_seconds: config.scrub_seconds,
            snap,
            target_time: 0.0,
            current_time: 0.0,
        }
    }

    pub fn curve(&self) -> &ProgressCurve {
        &self.curve
    }

    /// Scroll distance, in pixels, the region stays pinned for.
    pub fn scroll_distance(&self) -> f64 {
        self.curve.total_duration() * self.scroll_multiplier
    }

    pub fn time(&self) -> f64 {
        self.current_time
    }

    pub fn target_time(&self) -> f64 {
        self.target_time
    }

    pub fn progress(&self) -> f64 {
        self.curve.progress_at(self.current_time)
    }

    pub fn is_settled(&self) -> bool {
        self.current_time == self.target_time
    }

    /// Feed a scroll reading.
    ///
    /// While unpinned the target only moves to the ends: before the region
    /// it rests at the start, past it at the end.
    pub fn scroll(&mut self, input: ScrollInput) {
        let total = self.curve.total_duration();
        let time = input.offset_px / self.scroll_multiplier;
        if input.pinned {
            self.target_time = time.clamp(0.0, total);
        } else if time <= 0.0 {
            self.target_time = 0.0;
        } else if time >= total {
            self.target_time = total;
        }
    }

    /// Jump straight to `time`, bypassing smoothing.
    pub fn seek(&mut self, time: f64) {
        self.target_time = time.clamp(0.0, self.curve.total_duration());
        self.current_time = self.target_time;
    }

    /// The user let go of the scroll: apply the snapping policy to the
    /// target. Returns the new target time.
    pub fn release(&mut self) -> f64 {
        if let Some(snap) = &self.snap {
            let total = self.curve.total_duration();
            let snapped = snap.snap(self.target_time / total) * total;
            self.target_time = snapped.clamp(0.0, total);
        }
        self.target_time
    }

    /// Advance smoothing by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.scrub_seconds <= 0.0 {
            self.current_time = self.target_time;
            return;
        }
        let delta = self.target_time - self.current_time;
        let follow = 1.0 - (-dt.max(0.0) / self.scrub_seconds).exp();
        self.current_time += delta * follow;
        if (self.target_time - self.current_time).abs() < SETTLE_EPSILON {
            self.current_time = self.target_time;
        }
    }
}
