// src/domain/entity/mod.rs
#[allow(clippy::module_inception)]
pub mod entity;
pub mod repository;
pub mod transition;
pub mod value_objects;

pub use entity::{GovernedEntity, StatusStamp, StatusUpdate};
pub use repository::EntityStore;
pub use transition::{Transition, transition};
pub use value_objects::{AccountStatus, EntityId, EntityKind, GovernedStatus, ProfessionalStatus};
