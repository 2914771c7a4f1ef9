pub mod entity;
pub mod repository;

pub use entity::{AuditAction, AuditLog, TargetKind, UNKNOWN_ADMIN_EMAIL};
pub use repository::AuditLogRepository;
