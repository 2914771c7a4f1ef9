// src/application/ports/rate_limit.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt, time::Duration};

/// Maximum number of requests admitted per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPreset {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPreset {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Route families that get their own counters and preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    Admin,
    Api,
}

impl RouteClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request against `key` and report whether it fits the preset.
    /// The read-modify-write must be atomic per key.
    async fn hit(
        &self,
        key: &str,
        preset: RateLimitPreset,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RateLimitDecision>;
}
