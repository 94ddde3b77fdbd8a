pub mod experience;
pub mod group;
pub mod normalize;
pub mod project;
pub mod timeline;

pub use experience::{ExperienceRecord, Milestone, parse_date};
pub use folio_protocol::Group;
pub use group::{CompanyMatcher, MarkerMatcher};
pub use normalize::normalize;
pub use project::ProjectRecord;
pub use timeline::{EnrichedExperience, ModelIdentity, TimelineModel};
