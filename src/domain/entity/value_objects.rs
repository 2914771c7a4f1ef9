// src/domain/entity/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("entity id cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of record whose status only an administrator may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Professional,
    User,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProfessionalStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ProfessionalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(DomainError::InvalidTransition(format!(
                "unknown professional status '{other}'"
            ))),
        }
    }
}

/// Account statuses a user may be moved between. Every pair is a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    UnderReview,
    Rejected,
    Inactive,
}

impl AccountStatus {
    pub const ALL: [Self; 4] = [
        Self::Active,
        Self::UnderReview,
        Self::Rejected,
        Self::Inactive,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::UnderReview => "under_review",
            Self::Rejected => "rejected",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::InvalidTransition(format!(
                    "invalid status '{s}', expected one of: active, under_review, rejected, inactive"
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GovernedStatus {
    Professional(ProfessionalStatus),
    Account(AccountStatus),
}

impl GovernedStatus {
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Professional(_) => EntityKind::Professional,
            Self::Account(_) => EntityKind::User,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professional(status) => status.as_str(),
            Self::Account(status) => status.as_str(),
        }
    }

    /// Parse a stored status column for the given kind.
    pub fn parse(kind: EntityKind, raw: &str) -> DomainResult<Self> {
        match kind {
            EntityKind::Professional => raw.parse().map(Self::Professional),
            EntityKind::User => raw.parse().map(Self::Account),
        }
    }
}

impl fmt::Display for GovernedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GovernedStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_status_parses_the_enumerated_set_only() {
        for status in AccountStatus::ALL {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
        let err = "suspended".parse::<AccountStatus>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert!("Active".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn entity_id_rejects_blank_values() {
        assert!(EntityId::new("  ").is_err());
        assert_eq!(EntityId::new("pro-1").unwrap().as_str(), "pro-1");
    }

    #[test]
    fn governed_status_serializes_as_plain_string() {
        let value =
            serde_json::to_value(GovernedStatus::Account(AccountStatus::UnderReview)).unwrap();
        assert_eq!(value, serde_json::json!("under_review"));
    }
}
