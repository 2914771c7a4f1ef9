use crate::application::error::ApplicationError;
use std::fmt;

/// Where an admin request ended up. Only `Applied` is required for success;
/// the audit and notify stages are reported after the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminActionStage {
    RateLimited,
    Unauthorized,
    NotFound,
    Invalid,
    Applied,
    AuditOk,
    AuditFailed,
    NotifyOk,
    NotifyFailed,
    Responded,
}

impl AdminActionStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
            Self::Applied => "applied",
            Self::AuditOk => "audit_ok",
            Self::AuditFailed => "audit_failed",
            Self::NotifyOk => "notify_ok",
            Self::NotifyFailed => "notify_failed",
            Self::Responded => "responded",
        }
    }

    /// Stage at which a request rejected with `err` stopped.
    pub fn rejected_at(err: &ApplicationError) -> Self {
        match err {
            ApplicationError::RateLimited(_) => Self::RateLimited,
            ApplicationError::Unauthorized(_) => Self::Unauthorized,
            ApplicationError::NotFound(_) => Self::NotFound,
            ApplicationError::Validation(_)
            | ApplicationError::InvalidTransition(_)
            | ApplicationError::Conflict(_) => Self::Invalid,
            ApplicationError::Infrastructure(_) => Self::Responded,
        }
    }
}

impl fmt::Display for AdminActionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
