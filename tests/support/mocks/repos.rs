// tests/support/mocks/repos.rs
use async_trait::async_trait;
use marketplace_admin::domain::{
    audit::{AuditLog, AuditLogRepository},
    entity::{EntityId, EntityKind, EntityStore, GovernedEntity, StatusUpdate},
    errors::{DomainError, DomainResult},
    notification::{Notification, NotificationId, NotificationRepository},
};
use marketplace_admin::infrastructure::repositories::InMemoryEntityStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/* -------------------------------- FailingAuditRepo -------------------------------- */

/// 常に失敗する監査ログリポジトリ（ストア障害の再現用）
#[derive(Clone, Debug, Default)]
pub struct FailingAuditRepo;

#[async_trait]
impl AuditLogRepository for FailingAuditRepo {
    async fn insert(&self, _log: AuditLog) -> DomainResult<()> {
        Err(DomainError::Persistence("audit store unavailable".into()))
    }

    async fn list_recent(&self, _limit: u32) -> DomainResult<Vec<AuditLog>> {
        Err(DomainError::Persistence("audit store unavailable".into()))
    }
}

/* -------------------------------- FailingNotificationRepo -------------------------------- */

#[derive(Clone, Debug, Default)]
pub struct FailingNotificationRepo;

#[async_trait]
impl NotificationRepository for FailingNotificationRepo {
    async fn insert(&self, _notification: Notification) -> DomainResult<Notification> {
        Err(DomainError::Persistence("notification store unavailable".into()))
    }

    async fn find_by_id(&self, _id: NotificationId) -> DomainResult<Option<Notification>> {
        Ok(None)
    }

    async fn list_for_recipient(&self, _recipient_id: &str) -> DomainResult<Vec<Notification>> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, _id: NotificationId) -> DomainResult<bool> {
        Ok(false)
    }

    async fn mark_all_read(&self, _recipient_id: &str) -> DomainResult<u64> {
        Ok(0)
    }
}

/* -------------------------------- CountingEntityStore -------------------------------- */

/// 読み取り・書き込み回数を数えるエンティティストア
pub struct CountingEntityStore {
    inner: Arc<InMemoryEntityStore>,
    gets: AtomicUsize,
    updates: AtomicUsize,
}

impl CountingEntityStore {
    pub fn new(inner: Arc<InMemoryEntityStore>) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityStore for CountingEntityStore {
    async fn get(&self, kind: EntityKind, id: &EntityId) -> DomainResult<Option<GovernedEntity>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(kind, id).await
    }

    async fn update_status(&self, update: StatusUpdate) -> DomainResult<GovernedEntity> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_status(update).await
    }
}
