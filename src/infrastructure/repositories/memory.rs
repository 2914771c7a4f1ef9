//! Process-local stores used when no `DATABASE_URL` is configured and by the
//! integration tests.
use crate::domain::audit::{AuditLog, AuditLogRepository};
use crate::domain::entity::{
    EntityId, EntityKind, EntityStore, GovernedEntity, GovernedStatus, StatusUpdate,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::notification::{Notification, NotificationId, NotificationRepository};
use crate::domain::user::{DirectoryEntry, UserDirectory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

fn poisoned() -> DomainError {
    DomainError::Persistence("in-memory store lock poisoned".into())
}

#[derive(Default)]
pub struct InMemoryEntityStore {
    rows: Mutex<HashMap<(EntityKind, EntityId), GovernedEntity>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. Used for bootstrapping and tests.
    pub fn seed(&self, entity: GovernedEntity) -> DomainResult<()> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        rows.insert((entity.kind(), entity.id.clone()), entity);
        Ok(())
    }

    pub fn seed_professional(
        &self,
        id: &str,
        status: crate::domain::entity::ProfessionalStatus,
        display_name: &str,
        email: &str,
    ) -> DomainResult<()> {
        self.seed(GovernedEntity {
            id: EntityId::new(id)?,
            status: GovernedStatus::Professional(status),
            status_stamp: None,
            display_name: Some(display_name.to_owned()),
            email: Some(email.to_owned()),
        })
    }

    pub fn seed_user(
        &self,
        id: &str,
        status: crate::domain::entity::AccountStatus,
        display_name: &str,
        email: &str,
    ) -> DomainResult<()> {
        self.seed(GovernedEntity {
            id: EntityId::new(id)?,
            status: GovernedStatus::Account(status),
            status_stamp: None,
            display_name: Some(display_name.to_owned()),
            email: Some(email.to_owned()),
        })
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get(&self, kind: EntityKind, id: &EntityId) -> DomainResult<Option<GovernedEntity>> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.get(&(kind, id.clone())).cloned())
    }

    async fn update_status(&self, update: StatusUpdate) -> DomainResult<GovernedEntity> {
        let kind = update.kind();
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        let entity = rows
            .get_mut(&(kind, update.id.clone()))
            .ok_or_else(|| DomainError::NotFound(format!("{kind} not found")))?;
        entity.status = update.status;
        entity.status_stamp = Some(update.stamp);
        Ok(entity.clone())
    }
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    entries: Mutex<HashMap<String, DirectoryEntry>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, entry: DirectoryEntry) -> DomainResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(entry.uid.clone(), entry);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_uid(&self, uid: &str) -> DomainResult<Option<DirectoryEntry>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(uid).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    entries: Mutex<Vec<AuditLog>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored entry in insertion order.
    pub fn snapshot(&self) -> Vec<AuditLog> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn insert(&self, mut log: AuditLog) -> DomainResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        let next_id = i64::try_from(entries.len())
            .map_err(|_| DomainError::Persistence("audit log is full".into()))?
            + 1;
        log.id = Some(next_id);
        entries.push(log);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> DomainResult<Vec<AuditLog>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        let mut recent: Vec<AuditLog> = entries.iter().rev().cloned().collect();
        // Stable sort keeps insertion order among equal timestamps.
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    // Insertion order doubles as the tie-breaker for equal `created_at`.
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: Notification) -> DomainResult<Notification> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        if rows.iter().any(|row| row.id == notification.id) {
            return Err(DomainError::Conflict("notification id already exists".into()));
        }
        rows.push(notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> DomainResult<Option<Notification>> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list_for_recipient(&self, recipient_id: &str) -> DomainResult<Vec<Notification>> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        let mut owned: Vec<Notification> = rows
            .iter()
            .rev()
            .filter(|row| row.recipient_id == recipient_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn mark_read(&self, id: NotificationId) -> DomainResult<bool> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        match rows.iter_mut().find(|row| row.id == id && !row.read) {
            Some(row) => {
                row.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient_id: &str) -> DomainResult<u64> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.recipient_id == recipient_id && !row.read)
        {
            row.read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{AccountStatus, ProfessionalStatus};
    use crate::domain::notification::NotificationPayload;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn update_status_stamps_the_record() {
        let store = InMemoryEntityStore::new();
        store
            .seed_professional("p1", ProfessionalStatus::Pending, "Ada", "ada@example.com")
            .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = store
            .update_status(StatusUpdate::new(
                EntityId::new("p1").unwrap(),
                GovernedStatus::Professional(ProfessionalStatus::Approved),
                at,
                "admin-1",
            ))
            .await
            .unwrap();
        assert_eq!(
            updated.status,
            GovernedStatus::Professional(ProfessionalStatus::Approved)
        );
        let stamp = updated.status_stamp.unwrap();
        assert_eq!(stamp.by, "admin-1");
        assert_eq!(stamp.at, at);
    }

    #[tokio::test]
    async fn kinds_do_not_share_ids() {
        let store = InMemoryEntityStore::new();
        store
            .seed_user("x", AccountStatus::Active, "Bo", "bo@example.com")
            .unwrap();
        let id = EntityId::new("x").unwrap();
        assert!(store.get(EntityKind::Professional, &id).await.unwrap().is_none());
        assert!(store.get(EntityKind::User, &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn notifications_list_newest_first_with_ties_by_insertion() {
        let repo = InMemoryNotificationRepository::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let first = repo
            .insert(Notification::new("u1", NotificationPayload::ProfessionalApproved, at).unwrap())
            .await
            .unwrap();
        let second = repo
            .insert(
                Notification::new(
                    "u1",
                    NotificationPayload::ProfessionalRejected { reason: None },
                    at,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let listed = repo.list_for_recipient("u1").await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        assert!(repo.mark_read(first.id).await.unwrap());
        assert!(!repo.mark_read(first.id).await.unwrap());
        assert_eq!(repo.mark_all_read("u1").await.unwrap(), 1);
        assert_eq!(repo.mark_all_read("u1").await.unwrap(), 0);
    }
}
