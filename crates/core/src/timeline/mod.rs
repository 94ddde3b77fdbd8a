pub mod controller;
pub mod curve;
pub mod driver;
pub mod resolver;
pub mod schedule;
pub mod snap;
pub mod targets;

pub use controller::{ActiveChange, ObserverGuard, TimelineController};
pub use curve::{Phase, ProgressCurve};
pub use driver::{ProgressDriver, ScrollInput};
pub use resolver::{Resolver, active_index_for, fill_for, other_fill_for};
pub use schedule::{Cue, Ease, Schedule, StyleChange, Transition, VisualTarget};
pub use snap::SnapPolicy;
pub use targets::{DotTargets, MountError, TargetHandle, TargetMap};
