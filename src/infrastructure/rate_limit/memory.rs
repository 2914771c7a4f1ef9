use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::rate_limit::{RateLimitDecision, RateLimitPreset, RateLimitStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

/// Fixed-window counters held in process memory. One lock covers the whole
/// map, so every hit is an atomic read-modify-write.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop windows that ended before `now`.
    pub fn prune(&self, now: DateTime<Utc>, longest_window: ChronoDuration) {
        if let Ok(mut windows) = self.windows.lock() {
            windows.retain(|_, window| now < window.started_at + longest_window);
        }
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        preset: RateLimitPreset,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RateLimitDecision> {
        let window_len = ChronoDuration::from_std(preset.window)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| ApplicationError::infrastructure("rate limit state poisoned"))?;

        let window = windows.entry(key.to_owned()).or_insert(Window {
            count: 0,
            started_at: now,
        });
        if now >= window.started_at + window_len {
            window.count = 0;
            window.started_at = now;
        }

        let reset_at = window.started_at + window_len;
        if window.count >= preset.max_requests {
            return Ok(RateLimitDecision {
                allowed: false,
                limit: preset.max_requests,
                remaining: 0,
                reset_at,
            });
        }

        window.count += 1;
        Ok(RateLimitDecision {
            allowed: true,
            limit: preset.max_requests,
            remaining: preset.max_requests - window.count,
            reset_at,
        })
    }
}
