use crate::domain::notification::Notification;
use serde::Serialize;

/// Full notification list of one recipient at one point in time, newest first.
/// Delivered to live subscribers on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub recipient_id: String,
    pub notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(recipient_id: impl Into<String>, mut notifications: Vec<Notification>) -> Self {
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            recipient_id: recipient_id.into(),
            notifications,
        }
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }

    /// The `limit` most recent notifications, newest first.
    pub fn recent(&self, limit: usize) -> &[Notification] {
        &self.notifications[..limit.min(self.notifications.len())]
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeedDto {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub total: usize,
}

impl NotificationFeedDto {
    pub fn from_feed(feed: &NotificationFeed, recent: Option<usize>) -> Self {
        let notifications = match recent {
            Some(limit) => feed.recent(limit).to_vec(),
            None => feed.notifications.clone(),
        };
        Self {
            notifications,
            unread_count: feed.unread_count(),
            total: feed.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationPayload;
    use chrono::{Duration, Utc};

    fn notification(minutes_ago: i64, read: bool) -> Notification {
        let mut n = Notification::new(
            "u1",
            NotificationPayload::ProfessionalApproved,
            Utc::now() - Duration::minutes(minutes_ago),
        )
        .unwrap();
        n.read = read;
        n
    }

    #[test]
    fn feed_orders_newest_first_and_derives_views() {
        let oldest = notification(30, true);
        let middle = notification(20, false);
        let newest = notification(10, false);
        let feed = NotificationFeed::new(
            "u1",
            vec![middle.clone(), oldest.clone(), newest.clone()],
        );

        assert_eq!(feed.notifications, vec![newest.clone(), middle.clone(), oldest]);
        assert_eq!(feed.unread_count(), 2);
        assert_eq!(feed.recent(1), std::slice::from_ref(&newest));
        assert_eq!(feed.recent(10).len(), 3);
    }
}
