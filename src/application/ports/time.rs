// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Server-side timestamp authority for audit entries, notifications and
/// rate-limit windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
