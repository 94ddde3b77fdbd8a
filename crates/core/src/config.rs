//! Tunables for the pinned timeline.
//!
//! Defaults reproduce the site's behavior. Every field can be overridden from
//! JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Virtual-time durations of the scrubbed timeline, in timeline units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durations {
    /// Fill moves from one marker to the next.
    pub move_phase: f64,
    /// Fill rests on a marker so the reader can dwell on it.
    pub hold_phase: f64,
    pub step_fade: f64,
    pub step_show: f64,
    pub dot_animation: f64,
    pub milestone_fade: f64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            move_phase: 1.0,
            hold_phase: 2.0,
            step_fade: 0.2,
            step_show: 0.25,
            dot_animation: 0.4,
            milestone_fade: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How far ahead of a marker being reached its transition begins.
    pub lead: f64,
    /// Offset between hiding the previous experience and showing the next.
    pub step_delay: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            lead: 0.30,
            step_delay: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Minimum gap between the secondary rail's end cap and the axis end.
    pub other_end_gap: f64,
    /// Padding past the last secondary marker before the end cap.
    pub other_after_last: f64,
    /// Horizontal inset of both rails, in pixels.
    pub dot_inset: f64,
    /// Scroll pixels per unit of virtual time while pinned.
    pub scroll_multiplier: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            other_end_gap: 0.08,
            other_after_last: 0.06,
            dot_inset: 10.0,
            scroll_multiplier: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub enabled: bool,
    /// Fraction of a move phase past which a release snaps forward.
    pub threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Case-insensitive substring marking the highlighted employer. Empty
    /// means no company is primary.
    pub primary_marker: String,
    pub durations: Durations,
    pub timings: Timings,
    pub layout: Layout,
    pub snap: SnapConfig,
    /// Time constant (seconds) of the scroll smoothing; 0 follows the
    /// scroll position immediately.
    pub scrub_seconds: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            primary_marker: String::new(),
            durations: Durations::default(),
            timings: Timings::default(),
            layout: Layout::default(),
            snap: SnapConfig::default(),
            scrub_seconds: 1.0,
        }
    }
}

impl TimelineConfig {
    pub fn with_primary_marker(marker: impl Into<String>) -> Self {
        Self {
            primary_marker: marker.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("durations.move_phase", self.durations.move_phase)?;
        non_negative("durations.hold_phase", self.durations.hold_phase)?;
        non_negative("durations.step_fade", self.durations.step_fade)?;
        non_negative("durations.step_show", self.durations.step_show)?;
        non_negative("durations.dot_animation", self.durations.dot_animation)?;
        non_negative("durations.milestone_fade", self.durations.milestone_fade)?;
        non_negative("timings.lead", self.timings.lead)?;
        non_negative("timings.step_delay", self.timings.step_delay)?;
        in_range("layout.other_end_gap", self.layout.other_end_gap, 0.0, 1.0)?;
        in_range("layout.other_after_last", self.layout.other_after_last, 0.0, 1.0)?;
        non_negative("layout.dot_inset", self.layout.dot_inset)?;
        positive("layout.scroll_multiplier", self.layout.scroll_multiplier)?;
        in_range("snap.threshold", self.snap.threshold, 0.0, 1.0)?;
        non_negative("scrub_seconds", self.scrub_seconds)?;
        Ok(())
    }

    /// Virtual length of one segment (move + hold).
    pub fn segment_duration(&self) -> f64 {
        self.durations.move_phase + self.durations.hold_phase
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
