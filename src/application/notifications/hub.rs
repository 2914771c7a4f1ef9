//! In-process publish/subscribe keyed by recipient id.
//!
//! Each subscriber owns an unbounded channel, so a slow consumer never loses
//! a delivery. Changes for one recipient are serialized through a
//! per-recipient lock which the notification service holds across the write,
//! the snapshot read and the publish.

use crate::application::dto::NotificationFeed;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, mpsc};

pub type FeedReceiver = mpsc::UnboundedReceiver<Arc<NotificationFeed>>;

struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<Arc<NotificationFeed>>,
}

#[derive(Default)]
pub(super) struct HubInner {
    topics: Mutex<HashMap<String, Vec<Subscriber>>>,
    recipient_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    next_id: AtomicU64,
}

impl HubInner {
    pub(super) fn unregister(&self, recipient_id: &str, subscriber_id: u64) {
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(subscribers) = topics.get_mut(recipient_id) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                topics.remove(recipient_id);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn inner(&self) -> &Arc<HubInner> {
        &self.inner
    }

    /// Add a subscriber for `recipient_id`. The returned id identifies it for
    /// `unregister`.
    pub fn register(&self, recipient_id: &str) -> (u64, FeedReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let mut topics = self
            .inner
            .topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        topics
            .entry(recipient_id.to_string())
            .or_default()
            .push(Subscriber { id, sender });
        (id, receiver)
    }

    pub fn unregister(&self, recipient_id: &str, subscriber_id: u64) {
        self.inner.unregister(recipient_id, subscriber_id);
    }

    /// Send the snapshot once to every live subscriber of its recipient.
    /// Returns the number of deliveries.
    pub fn publish(&self, feed: NotificationFeed) -> usize {
        let feed = Arc::new(feed);
        let mut topics = self
            .inner
            .topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(subscribers) = topics.get_mut(&feed.recipient_id) else {
            return 0;
        };

        subscribers.retain(|s| s.sender.send(Arc::clone(&feed)).is_ok());
        let delivered = subscribers.len();
        if subscribers.is_empty() {
            topics.remove(&feed.recipient_id);
        }
        delivered
    }

    pub fn subscriber_count(&self, recipient_id: &str) -> usize {
        self.inner
            .topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient_id)
            .map_or(0, Vec::len)
    }

    /// Drop every subscriber channel; their consumer loops finish.
    pub fn close(&self) {
        self.inner
            .topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Serialize changes for one recipient.
    pub async fn lock_recipient(&self, recipient_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .inner
                .recipient_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(recipient_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Forget per-recipient locks nobody is holding or waiting on.
    pub fn prune_idle_locks(&self) {
        self.inner
            .recipient_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
