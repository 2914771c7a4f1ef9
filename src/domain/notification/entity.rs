// src/domain/notification/entity.rs
use crate::domain::entity::{AccountStatus, GovernedStatus};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for NotificationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::Validation(format!("invalid notification id '{s}'")))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What happened to the recipient. Stored as JSON, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    ProfessionalApproved,
    ProfessionalRejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AccountStatusChanged {
        previous_status: AccountStatus,
        new_status: AccountStatus,
    },
}

impl NotificationPayload {
    /// Payload for an account move, or `None` when the statuses are not
    /// account statuses.
    pub const fn account_status_changed(
        previous: GovernedStatus,
        next: GovernedStatus,
    ) -> Option<Self> {
        match (previous, next) {
            (GovernedStatus::Account(previous_status), GovernedStatus::Account(new_status)) => {
                Some(Self::AccountStatusChanged {
                    previous_status,
                    new_status,
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: String,
    pub payload: NotificationPayload,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: impl Into<String>,
        payload: NotificationPayload,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let recipient_id = recipient_id.into();
        if recipient_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "notification recipient cannot be empty".into(),
            ));
        }
        Ok(Self {
            id: NotificationId::generate(),
            recipient_id,
            payload,
            read: false,
            created_at,
        })
    }
}
