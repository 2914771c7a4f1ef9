pub mod hub;
pub mod service;
pub mod subscription;

pub use hub::NotificationHub;
pub use service::NotificationService;
pub use subscription::Subscription;
