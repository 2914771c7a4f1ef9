// src/application/services/rate_limiter.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult, RateLimitInfo},
    ports::{
        rate_limit::{RateLimitDecision, RateLimitPreset, RateLimitStore, RouteClass},
        time::Clock,
    },
};
use chrono::Duration as ChronoDuration;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Presets per route class. Built once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPresets {
    pub admin: RateLimitPreset,
    pub api: RateLimitPreset,
}

impl RateLimitPresets {
    pub const fn for_class(&self, class: RouteClass) -> RateLimitPreset {
        match class {
            RouteClass::Admin => self.admin,
            RouteClass::Api => self.api,
        }
    }
}

impl Default for RateLimitPresets {
    fn default() -> Self {
        Self {
            admin: RateLimitPreset::new(20, 60),
            api: RateLimitPreset::new(100, 60),
        }
    }
}

pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    presets: RateLimitPresets,
    timeout: Duration,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        presets: RateLimitPresets,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            presets,
            timeout,
        }
    }

    pub const fn presets(&self) -> &RateLimitPresets {
        &self.presets
    }

    /// Count one request from `caller` against the preset of `class`.
    ///
    /// Returns `ApplicationError::RateLimited` when the window is exhausted.
    /// A store that fails or does not answer within the timeout also yields a
    /// denial.
    pub async fn check(
        &self,
        class: RouteClass,
        caller: &str,
    ) -> ApplicationResult<RateLimitDecision> {
        let preset = self.presets.for_class(class);
        let key = format!("{class}:{caller}");
        let now = self.clock.now();

        let decision =
            match tokio::time::timeout(self.timeout, self.store.hit(&key, preset, now)).await {
                Ok(Ok(decision)) => decision,
                Ok(Err(err)) => {
                    warn!(error = %err, %key, "rate limit store failed, denying request");
                    return Err(Self::fail_closed(preset, now));
                }
                Err(_) => {
                    warn!(%key, timeout_ms = self.timeout.as_millis(), "rate limit store timed out, denying request");
                    return Err(Self::fail_closed(preset, now));
                }
            };

        if decision.allowed {
            Ok(decision)
        } else {
            debug!(%key, reset_at = %decision.reset_at, "rate limit exceeded");
            Err(ApplicationError::RateLimited(RateLimitInfo {
                limit: decision.limit,
                remaining: decision.remaining,
                reset_at: decision.reset_at,
            }))
        }
    }

    fn fail_closed(preset: RateLimitPreset, now: chrono::DateTime<chrono::Utc>) -> ApplicationError {
        let window = ChronoDuration::from_std(preset.window).unwrap_or(ChronoDuration::seconds(60));
        ApplicationError::RateLimited(RateLimitInfo {
            limit: preset.max_requests,
            remaining: 0,
            reset_at: now + window,
        })
    }
}
