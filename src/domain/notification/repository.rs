use crate::domain::errors::DomainResult;
use crate::domain::notification::entity::{Notification, NotificationId};
use async_trait::async_trait;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: Notification) -> DomainResult<Notification>;

    async fn find_by_id(&self, id: NotificationId) -> DomainResult<Option<Notification>>;

    /// Every notification of the recipient, newest first.
    async fn list_for_recipient(&self, recipient_id: &str) -> DomainResult<Vec<Notification>>;

    /// Flip `read` to true. Returns whether a row actually changed.
    async fn mark_read(&self, id: NotificationId) -> DomainResult<bool>;

    /// Flip every unread notification of the recipient. Returns the number changed.
    async fn mark_all_read(&self, recipient_id: &str) -> DomainResult<u64>;
}
