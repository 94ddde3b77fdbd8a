//! Pinned career timeline: content model, scroll-driven progress, and the
//! render-command views that present it.

pub mod config;
pub mod contact;
pub mod content;
pub mod format;
pub mod model;
pub mod projects;
pub mod svg;
pub mod timeline;
pub mod views;

pub use config::{ConfigError, TimelineConfig};
pub use content::ContentError;
pub use timeline::{MountError, TimelineController};
