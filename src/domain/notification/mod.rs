pub mod entity;
pub mod repository;

pub use entity::{Notification, NotificationId, NotificationPayload};
pub use repository::NotificationRepository;
