pub mod admin;
pub mod audit;
pub mod auth;
pub mod notifications;

pub use admin::{AdminActionOutcome, GovernedEntityDto};
pub use audit::AuditLogDto;
pub use auth::AdminIdentity;
pub use notifications::{NotificationFeed, NotificationFeedDto};
