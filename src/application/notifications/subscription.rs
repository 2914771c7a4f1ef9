use super::hub::{FeedReceiver, HubInner, NotificationHub};
use crate::application::dto::NotificationFeed;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::task::JoinHandle;

struct Gate {
    active: bool,
    task: Option<JoinHandle<()>>,
}

/// Handle to a live notification feed. Dropping it unsubscribes.
pub struct Subscription {
    recipient_id: String,
    subscriber_id: u64,
    hub: Weak<HubInner>,
    gate: Arc<Mutex<Gate>>,
}

impl Subscription {
    /// Register on `hub` and start the consumer loop that feeds `on_change`.
    ///
    /// `on_change` runs on a background task, once per change, in change
    /// order. It must not call `unsubscribe` on its own subscription.
    pub(super) fn start<F>(hub: &NotificationHub, recipient_id: &str, on_change: F) -> Self
    where
        F: FnMut(&NotificationFeed) + Send + 'static,
    {
        let (subscriber_id, receiver) = hub.register(recipient_id);
        let gate = Arc::new(Mutex::new(Gate {
            active: true,
            task: None,
        }));

        let task = tokio::spawn(consume(receiver, Arc::clone(&gate), on_change));
        {
            let mut guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.active {
                guard.task = Some(task);
            } else {
                task.abort();
            }
        }

        Self {
            recipient_id: recipient_id.to_string(),
            subscriber_id,
            hub: Arc::downgrade(hub.inner()),
            gate,
        }
    }

    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }

    pub fn is_active(&self) -> bool {
        self.gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
    }

    /// Stop deliveries and release the channel. Idempotent, and safe after
    /// the hub itself has gone away. Once this returns the callback is not
    /// invoked again.
    pub fn unsubscribe(&self) {
        let task = {
            let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            if !gate.active {
                return;
            }
            gate.active = false;
            gate.task.take()
        };

        if let Some(hub) = self.hub.upgrade() {
            hub.unregister(&self.recipient_id, self.subscriber_id);
        }
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn consume<F>(mut receiver: FeedReceiver, gate: Arc<Mutex<Gate>>, mut on_change: F)
where
    F: FnMut(&NotificationFeed) + Send + 'static,
{
    while let Some(feed) = receiver.recv().await {
        let delivered = {
            let guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.active {
                on_change(&feed);
                true
            } else {
                false
            }
        };
        if !delivered {
            break;
        }
    }
}
