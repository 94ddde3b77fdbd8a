use super::curve::ProgressCurve;

/// Release-time snapping on the scroll fraction (`time / total_duration`).
///
/// A release late in a move phase commits forward to the next marker; a
/// release early in a move phase, or anywhere in a hold phase, stays put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPolicy {
    pub segments: usize,
    /// Fraction of each segment that is move phase.
    pub move_fraction: f64,
    /// Position within the move phase past which a release snaps forward.
    pub threshold: f64,
}

impl SnapPolicy {
    pub fn new(curve: &ProgressCurve, threshold: f64) -> Self {
        Self {
            segments: curve.segments.max(1),
            move_fraction: curve.move_fraction(),
            threshold,
        }
    }

    /// Snap a scroll fraction in [0, 1].
    pub fn snap(&self, fraction: f64) -> f64 {
        let p = fraction.clamp(0.0, 1.0);
        let step = 1.0 / self.segments as f64;

        let segment = (p / step).floor();
        let local = (p - segment * step) / step;
        if local >= self.move_fraction {
            return p;
        }

        let local_move = local / self.move_fraction;
        if local_move >= self.threshold {
            let snapped = ((segment + 1.0) * step).min(1.0);
            log::trace!("snap {p:.4} -> {snapped:.4}");
            return snapped;
        }

        p
    }
}
