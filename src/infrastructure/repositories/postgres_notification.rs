use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::notification::{
    Notification, NotificationId, NotificationPayload, NotificationRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: String,
    payload: Json<serde_json::Value>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let payload: NotificationPayload = serde_json::from_value(row.payload.0)
            .map_err(|err| DomainError::Persistence(format!("corrupt notification payload: {err}")))?;
        Ok(Self {
            id: NotificationId::from_uuid(row.id),
            recipient_id: row.recipient_id,
            payload,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: Notification) -> DomainResult<Notification> {
        let payload = serde_json::to_value(&notification.payload)
            .map_err(|err| DomainError::Persistence(err.to_string()))?;

        let row = sqlx::query_as::<_, NotificationRow>(
            r"
            INSERT INTO notifications (id, recipient_id, payload, read, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, recipient_id, payload, read, created_at
            ",
        )
        .bind(notification.id.as_uuid())
        .bind(&notification.recipient_id)
        .bind(Json(payload))
        .bind(notification.read)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Notification::try_from(row)
    }

    async fn find_by_id(&self, id: NotificationId) -> DomainResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "SELECT id, recipient_id, payload, read, created_at FROM notifications WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Notification::try_from).transpose()
    }

    async fn list_for_recipient(&self, recipient_id: &str) -> DomainResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT id, recipient_id, payload, read, created_at
             FROM notifications WHERE recipient_id = $1
             ORDER BY created_at DESC, seq DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: NotificationId) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND read = FALSE")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, recipient_id: &str) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected())
    }
}
