pub mod card;
pub mod milestones;
pub mod rail;

pub use card::render_card;
pub use milestones::render_milestones;
pub use rail::{rail_y, render_rails};
