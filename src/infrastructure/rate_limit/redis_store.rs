use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::rate_limit::{RateLimitDecision, RateLimitPreset, RateLimitStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};

// INCR the window counter, arm its expiry on the first hit, and report the
// remaining ttl. A key that somehow lost its ttl is re-armed.
const FIXED_WINDOW_SCRIPT: &str = r"
    local count = redis.call('INCR', KEYS[1])
    if count == 1 then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
    end
    local ttl = redis.call('PTTL', KEYS[1])
    if ttl < 0 then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
        ttl = tonumber(ARGV[1])
    end
    return {count, ttl}
";

/// Fixed-window counters shared across instances through Redis.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: Pool,
    prefix: String,
}

impl RedisRateLimitStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> ApplicationResult<Self> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            pool,
            prefix: "ratelimit".to_string(),
        })
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        preset: RateLimitPreset,
        now: DateTime<Utc>,
    ) -> ApplicationResult<RateLimitDecision> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let window_ms = u64::try_from(preset.window.as_millis())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let redis_key = format!("{}:{key}", self.prefix);

        let (count, ttl_ms): (u64, i64) = redis::cmd("EVAL")
            .arg(FIXED_WINDOW_SCRIPT)
            .arg(1)
            .arg(&redis_key)
            .arg(window_ms)
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let limit = preset.max_requests;
        let used = u32::try_from(count).unwrap_or(u32::MAX);
        Ok(RateLimitDecision {
            allowed: used <= limit,
            limit,
            remaining: limit.saturating_sub(used),
            reset_at: now + ChronoDuration::milliseconds(ttl_ms.max(0)),
        })
    }
}
