use super::map_sqlx;
use crate::domain::audit::{AuditLog, AuditLogRepository};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditRow {
    id: i64,
    timestamp: DateTime<Utc>,
    admin_uid: String,
    admin_email: String,
    action: String,
    target_id: String,
    target_type: String,
    details: Json<serde_json::Map<String, serde_json::Value>>,
}

impl TryFrom<AuditRow> for AuditLog {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(row.id),
            timestamp: row.timestamp,
            admin_uid: row.admin_uid,
            admin_email: row.admin_email,
            action: row.action.parse()?,
            target_id: row.target_id,
            target_kind: row.target_type.parse()?,
            details: row.details.0,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn insert(&self, log: AuditLog) -> DomainResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs (timestamp, admin_uid, admin_email, action, target_id, target_type, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(log.timestamp)
        .bind(log.admin_uid)
        .bind(log.admin_email)
        .bind(log.action.as_str())
        .bind(log.target_id)
        .bind(log.target_kind.as_str())
        .bind(Json(log.details))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> DomainResult<Vec<AuditLog>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, timestamp, admin_uid, admin_email, action, target_id, target_type, details
             FROM audit_logs ORDER BY timestamp DESC, id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(AuditLog::try_from).collect()
    }
}
