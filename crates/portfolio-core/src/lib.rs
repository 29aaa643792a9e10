pub mod config;
pub mod error;
pub mod ids;
pub mod paths;
pub mod project;
pub mod record;
pub mod repository;
pub mod skill;
pub mod store;

pub use error::{Result, StoreError};
pub use project::{Project, ProjectFields};
pub use record::{Record, RecordId};
pub use repository::Repository;
pub use skill::{Skill, SkillFields};
