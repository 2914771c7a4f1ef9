use crate::domain::audit::{AuditAction, AuditLog, TargetKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub admin_uid: String,
    pub admin_email: String,
    pub action: AuditAction,
    pub target_id: String,
    pub target_type: TargetKind,
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl From<AuditLog> for AuditLogDto {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            timestamp: log.timestamp,
            admin_uid: log.admin_uid,
            admin_email: log.admin_email,
            action: log.action,
            target_id: log.target_id,
            target_type: log.target_kind,
            details: log.details,
        }
    }
}
