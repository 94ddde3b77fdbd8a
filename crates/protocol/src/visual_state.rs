use serde::{Deserialize, Serialize};

/// Which rail an experience is drawn on.
///
/// `Primary` is the highlighted employer (full-width rail); every other
/// company lands on the inset `Other` rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Primary,
    Other,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Animated properties of one visual element at a point on the timeline.
///
/// Every field is interpolated independently; `accent` blends the border
/// from `ThemeToken::Gray` (0.0) to `ThemeToken::Primary` (1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub opacity: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub accent: f64,
}

impl ElementStyle {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        accent: 0.0,
    };

    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
        scale: 1.0,
        accent: 0.0,
    };

    /// Whether the element would be painted at all.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

pub type DotStyle = ElementStyle;
pub type LabelStyle = ElementStyle;
pub type CardStyle = ElementStyle;

/// Per-experience visual state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceVisual {
    /// Chronological index (slot order).
    pub index: usize,
    pub group: Group,
    pub group_index: usize,
    pub slot_position: f64,
    pub is_active: bool,
    /// How far the rail fill has run through the segment ending at this
    /// experience's marker; 1.0 once the marker has been reached.
    pub fill_contribution: f64,
    pub dot: DotStyle,
    pub dot_inner: DotStyle,
    pub label: LabelStyle,
    pub card: CardStyle,
}

/// Snapshot of the whole timeline at one playhead position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrame {
    /// Virtual time on the scrubbed timeline.
    pub time: f64,
    /// Normalized progress in [0, 1].
    pub progress: f64,
    pub primary_fill: f64,
    pub other_fill: f64,
    /// The secondary rail's end cap switches to the accent once reached.
    pub end_cap_reached: bool,
    /// Experience driving the card stack and milestone list; `None` when
    /// there are no experiences.
    pub active_index: Option<usize>,
    /// The milestone list fades in after each swap.
    pub milestone_opacity: f64,
    pub experiences: Vec<ExperienceVisual>,
}

impl TimelineFrame {
    pub fn active(&self) -> Option<&ExperienceVisual> {
        self.experiences.iter().find(|e| e.is_active)
    }
}
