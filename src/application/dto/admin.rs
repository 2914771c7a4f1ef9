use crate::domain::entity::{EntityKind, GovernedEntity, GovernedStatus, Transition};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status view of a governed entity as returned to the admin console.
/// Professionals expose the stamp as `reviewedAt` / `reviewedBy`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernedEntityDto {
    pub id: String,
    pub kind: EntityKind,
    pub status: GovernedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_by: Option<String>,
}

impl From<GovernedEntity> for GovernedEntityDto {
    fn from(entity: GovernedEntity) -> Self {
        let kind = entity.kind();
        let (at, by) = entity
            .status_stamp
            .map_or((None, None), |stamp| (Some(stamp.at), Some(stamp.by)));
        let (reviewed_at, reviewed_by, status_updated_at, status_updated_by) = match kind {
            EntityKind::Professional => (at, by, None, None),
            EntityKind::User => (None, None, at, by),
        };

        Self {
            id: entity.id.into(),
            kind,
            status: entity.status,
            reviewed_at,
            reviewed_by,
            status_updated_at,
            status_updated_by,
        }
    }
}

/// Result of an applied admin action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionOutcome {
    pub entity: GovernedEntityDto,
    pub previous_status: GovernedStatus,
    pub new_status: GovernedStatus,
}

impl AdminActionOutcome {
    pub fn new(entity: GovernedEntity, transition: Transition) -> Self {
        Self {
            entity: entity.into(),
            previous_status: transition.previous,
            new_status: transition.next,
        }
    }
}
