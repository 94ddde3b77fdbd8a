use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Accent used for fills, active dot borders and the reached end cap.
    Primary,
    /// Muted color for idle tracks, dots and the unreached end cap.
    Gray,

    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Rails
    RailTrack,
    RailFill,
    DotBackground,

    // Experience card
    CardBackground,
    CardText,
    TechBadge,

    // Milestones
    MilestoneTitle,
    MilestoneText,
}
