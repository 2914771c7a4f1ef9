// src/domain/audit/entity.rs
use crate::domain::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const UNKNOWN_ADMIN_EMAIL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ApproveProfessional,
    RejectProfessional,
    UpdateUserStatus,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApproveProfessional => "approve_professional",
            Self::RejectProfessional => "reject_professional",
            Self::UpdateUserStatus => "update_user_status",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve_professional" => Ok(Self::ApproveProfessional),
            "reject_professional" => Ok(Self::RejectProfessional),
            "update_user_status" => Ok(Self::UpdateUserStatus),
            other => Err(DomainError::Validation(format!(
                "unknown audit action '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    User,
    Professional,
    Appointment,
    Review,
    Category,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Professional => "professional",
            Self::Appointment => "appointment",
            Self::Review => "review",
            Self::Category => "category",
        }
    }
}

impl FromStr for TargetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "professional" => Ok(Self::Professional),
            "appointment" => Ok(Self::Appointment),
            "review" => Ok(Self::Review),
            "category" => Ok(Self::Category),
            other => Err(DomainError::Validation(format!(
                "unknown audit target kind '{other}'"
            ))),
        }
    }
}

/// One privileged mutation. Written once, never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub admin_uid: String,
    pub admin_email: String,
    pub action: AuditAction,
    pub target_id: String,
    pub target_kind: TargetKind,
    pub details: serde_json::Map<String, serde_json::Value>,
}
