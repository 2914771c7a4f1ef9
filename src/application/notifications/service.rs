use super::{hub::NotificationHub, subscription::Subscription};
use crate::application::{
    dto::NotificationFeed,
    error::{ApplicationError, ApplicationResult},
    ports::time::Clock,
};
use crate::domain::notification::{
    Notification, NotificationId, NotificationPayload, NotificationRepository,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Persists notifications and pushes the recipient's full list to live
/// subscribers after every change.
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
    hub: NotificationHub,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(
        repo: Arc<dyn NotificationRepository>,
        hub: NotificationHub,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, hub, clock }
    }

    pub const fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub async fn create(
        &self,
        recipient_id: &str,
        payload: NotificationPayload,
    ) -> ApplicationResult<Notification> {
        let guard = self.hub.lock_recipient(recipient_id).await;

        let notification = Notification::new(recipient_id, payload, self.clock.now())?;
        let stored = self.repo.insert(notification).await?;
        debug!(recipient_id, notification_id = %stored.id, "notification created");

        self.publish_snapshot(recipient_id).await;
        drop(guard);
        self.hub.prune_idle_locks();
        Ok(stored)
    }

    /// Start a live feed for `recipient_id`. `on_change` receives the full
    /// list, newest first, once per change until the subscription ends.
    pub fn subscribe<F>(&self, recipient_id: &str, on_change: F) -> Subscription
    where
        F: FnMut(&NotificationFeed) + Send + 'static,
    {
        Subscription::start(&self.hub, recipient_id, on_change)
    }

    pub async fn feed(&self, recipient_id: &str) -> ApplicationResult<NotificationFeed> {
        let notifications = self.repo.list_for_recipient(recipient_id).await?;
        Ok(NotificationFeed::new(recipient_id, notifications))
    }

    /// Mark one notification read. Returns whether anything changed; an
    /// already-read notification is left untouched and nothing is published.
    pub async fn mark_read(&self, id: NotificationId) -> ApplicationResult<bool> {
        let notification = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("notification not found"))?;
        self.mark_read_locked(&notification).await
    }

    /// Same as `mark_read`, but only for a notification owned by `recipient_id`.
    pub async fn mark_read_for(
        &self,
        recipient_id: &str,
        id: NotificationId,
    ) -> ApplicationResult<bool> {
        let notification = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|n| n.recipient_id == recipient_id)
            .ok_or_else(|| ApplicationError::not_found("notification not found"))?;
        self.mark_read_locked(&notification).await
    }

    /// Mark every unread notification of the recipient read. Returns the
    /// number changed.
    pub async fn mark_all_read(&self, recipient_id: &str) -> ApplicationResult<u64> {
        let guard = self.hub.lock_recipient(recipient_id).await;
        let changed = self.repo.mark_all_read(recipient_id).await?;
        if changed > 0 {
            self.publish_snapshot(recipient_id).await;
        }
        drop(guard);
        self.hub.prune_idle_locks();
        Ok(changed)
    }

    async fn mark_read_locked(&self, notification: &Notification) -> ApplicationResult<bool> {
        if notification.read {
            return Ok(false);
        }

        let recipient_id = notification.recipient_id.as_str();
        let guard = self.hub.lock_recipient(recipient_id).await;
        let changed = self.repo.mark_read(notification.id).await?;
        if changed {
            self.publish_snapshot(recipient_id).await;
        }
        drop(guard);
        self.hub.prune_idle_locks();
        Ok(changed)
    }

    async fn publish_snapshot(&self, recipient_id: &str) {
        if self.hub.subscriber_count(recipient_id) == 0 {
            return;
        }
        match self.feed(recipient_id).await {
            Ok(feed) => {
                let delivered = self.hub.publish(feed);
                debug!(recipient_id, delivered, "notification feed published");
            }
            Err(err) => {
                warn!(error = %err, recipient_id, "failed to load notification feed for subscribers");
            }
        }
    }
}
