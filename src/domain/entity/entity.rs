// src/domain/entity/entity.rs
use crate::domain::entity::value_objects::{EntityId, EntityKind, GovernedStatus};
use chrono::{DateTime, Utc};

/// Who last changed an entity's status and when. For professionals this is
/// persisted as `reviewed_at` / `reviewed_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusStamp {
    pub at: DateTime<Utc>,
    pub by: String,
}

#[derive(Debug, Clone)]
pub struct GovernedEntity {
    pub id: EntityId,
    pub status: GovernedStatus,
    pub status_stamp: Option<StatusStamp>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl GovernedEntity {
    pub const fn kind(&self) -> EntityKind {
        self.status.kind()
    }
}

/// Rewrite of the status fields only; every other column is left untouched.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub id: EntityId,
    pub status: GovernedStatus,
    pub stamp: StatusStamp,
}

impl StatusUpdate {
    pub fn new(id: EntityId, status: GovernedStatus, at: DateTime<Utc>, by: impl Into<String>) -> Self {
        Self {
            id,
            status,
            stamp: StatusStamp { at, by: by.into() },
        }
    }

    pub const fn kind(&self) -> EntityKind {
        self.status.kind()
    }
}
