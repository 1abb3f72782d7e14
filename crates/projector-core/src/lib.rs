pub mod catalog;
pub mod error;
pub mod meta;
pub mod name;
pub mod project;
pub mod render;
pub mod template;
pub mod time;

pub use catalog::TemplateCatalog;
pub use error::{CoreError, ErrorCategory, Result};
pub use meta::{ObjectMeta, ObjectRef, OwnerReference};
pub use name::validate_project_name;
pub use project::{
    Condition, ConditionStatus, Destination, ManagedProject, ManagedProjectSpec,
    ManagedProjectStatus, Phase,
};
pub use render::{AppProject, AppProjectSpec, ProjectRenderer};
pub use template::{GroupKind, OrphanedResources, Role, Template, TemplateName};
pub use time::{Timestamp, now_utc};
