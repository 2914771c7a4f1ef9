// src/application/services/audit_writer.rs
use crate::application::{error::ApplicationResult, ports::time::Clock};
use crate::domain::audit::{
    AuditAction, AuditLog, AuditLogRepository, TargetKind, UNKNOWN_ADMIN_EMAIL,
};
use crate::domain::user::UserDirectory;
use chrono::{DateTime, Duration, DurationRound, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Input to `AuditLogWriter::record`. The timestamp is never supplied by the caller.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub admin_uid: String,
    pub admin_email: Option<String>,
    pub action: AuditAction,
    pub target_id: String,
    pub target_kind: TargetKind,
    pub details: serde_json::Map<String, serde_json::Value>,
}

pub struct AuditLogWriter {
    repo: Arc<dyn AuditLogRepository>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
}

impl AuditLogWriter {
    pub fn new(
        repo: Arc<dyn AuditLogRepository>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            directory,
            clock,
            last_timestamp: Mutex::new(None),
        }
    }

    /// Append one entry. The admin email is looked up when not supplied and
    /// falls back to `"unknown"`; only the insert itself can fail.
    pub async fn record(&self, record: AuditRecord) -> ApplicationResult<AuditLog> {
        let admin_email = match record.admin_email.filter(|email| !email.is_empty()) {
            Some(email) => email,
            None => self.resolve_email(&record.admin_uid).await,
        };

        let log = AuditLog {
            id: None,
            timestamp: self.next_timestamp(),
            admin_uid: record.admin_uid,
            admin_email,
            action: record.action,
            target_id: record.target_id,
            target_kind: record.target_kind,
            details: record.details,
        };

        self.repo.insert(log.clone()).await?;
        debug!(action = %log.action, target_id = %log.target_id, "audit entry written");
        Ok(log)
    }

    async fn resolve_email(&self, admin_uid: &str) -> String {
        match self.directory.find_by_uid(admin_uid).await {
            Ok(Some(entry)) => entry
                .email
                .filter(|email| !email.is_empty())
                .unwrap_or_else(|| UNKNOWN_ADMIN_EMAIL.to_string()),
            Ok(None) => UNKNOWN_ADMIN_EMAIL.to_string(),
            Err(err) => {
                warn!(error = %err, admin_uid, "admin email lookup failed");
                UNKNOWN_ADMIN_EMAIL.to_string()
            }
        }
    }

    /// Server time at microsecond precision (what Postgres keeps), nudged
    /// forward so that no two entries from this writer share a timestamp.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let raw = self.clock.now();
        let now = raw.duration_trunc(Duration::microseconds(1)).unwrap_or(raw);
        let mut last = self
            .last_timestamp
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}
