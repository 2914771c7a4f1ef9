// src/infrastructure/repositories/mod.rs
mod error;
mod memory;
mod postgres_audit_log;
mod postgres_entity;
mod postgres_notification;
mod postgres_user_directory;
mod seed;

pub(crate) use error::map_sqlx;
pub use memory::{
    InMemoryAuditLogRepository, InMemoryEntityStore, InMemoryNotificationRepository,
    InMemoryUserDirectory,
};
pub use postgres_audit_log::PostgresAuditLogRepository;
pub use postgres_entity::PostgresEntityStore;
pub use postgres_notification::PostgresNotificationRepository;
pub use postgres_user_directory::PostgresUserDirectory;
pub use seed::{MemorySeed, SeedCounts};
