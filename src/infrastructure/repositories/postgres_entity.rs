use super::map_sqlx;
use crate::domain::entity::{
    EntityId, EntityKind, EntityStore, GovernedEntity, GovernedStatus, StatusStamp, StatusUpdate,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

const SELECT_PROFESSIONAL: &str = "SELECT id, status, reviewed_at AS stamp_at, reviewed_by AS stamp_by, display_name, email
     FROM professionals WHERE id = $1";
const SELECT_USER: &str = "SELECT id, status, status_updated_at AS stamp_at, status_updated_by AS stamp_by, display_name, email
     FROM users WHERE id = $1";
const UPDATE_PROFESSIONAL: &str = "UPDATE professionals SET status = $2, reviewed_at = $3, reviewed_by = $4
     WHERE id = $1
     RETURNING id, status, reviewed_at AS stamp_at, reviewed_by AS stamp_by, display_name, email";
const UPDATE_USER: &str = "UPDATE users SET status = $2, status_updated_at = $3, status_updated_by = $4
     WHERE id = $1
     RETURNING id, status, status_updated_at AS stamp_at, status_updated_by AS stamp_by, display_name, email";

#[derive(Clone)]
pub struct PostgresEntityStore {
    pool: PgPool,
}

impl PostgresEntityStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GovernedRow {
    id: String,
    status: String,
    stamp_at: Option<DateTime<Utc>>,
    stamp_by: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
}

impl GovernedRow {
    fn into_entity(self, kind: EntityKind) -> DomainResult<GovernedEntity> {
        let status_stamp = match (self.stamp_at, self.stamp_by) {
            (Some(at), Some(by)) => Some(StatusStamp { at, by }),
            _ => None,
        };

        Ok(GovernedEntity {
            id: EntityId::new(self.id)?,
            status: GovernedStatus::parse(kind, &self.status)
                .map_err(|err| DomainError::Persistence(format!("corrupt {kind} status: {err}")))?,
            status_stamp,
            display_name: self.display_name,
            email: self.email,
        })
    }
}

#[async_trait]
impl EntityStore for PostgresEntityStore {
    async fn get(&self, kind: EntityKind, id: &EntityId) -> DomainResult<Option<GovernedEntity>> {
        let sql = match kind {
            EntityKind::Professional => SELECT_PROFESSIONAL,
            EntityKind::User => SELECT_USER,
        };

        let row = sqlx::query_as::<_, GovernedRow>(sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(|row| row.into_entity(kind)).transpose()
    }

    async fn update_status(&self, update: StatusUpdate) -> DomainResult<GovernedEntity> {
        let kind = update.kind();
        let sql = match kind {
            EntityKind::Professional => UPDATE_PROFESSIONAL,
            EntityKind::User => UPDATE_USER,
        };

        let row = sqlx::query_as::<_, GovernedRow>(sql)
            .bind(update.id.as_str())
            .bind(update.status.as_str())
            .bind(update.stamp.at)
            .bind(update.stamp.by)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound(format!("{kind} not found")))?;

        row.into_entity(kind)
    }
}
