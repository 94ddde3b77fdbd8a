pub mod commands;
pub mod theme;
pub mod types;
pub mod visual_state;

pub use commands::{RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
pub use visual_state::{
    CardStyle, DotStyle, ElementStyle, ExperienceVisual, Group, LabelStyle, TimelineFrame,
};
