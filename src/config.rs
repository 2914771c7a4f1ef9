// src/config.rs
use crate::application::{
    ports::rate_limit::RateLimitPreset,
    services::{PipelineSettings, rate_limiter::RateLimitPresets},
};
use crate::presentation::http::middleware::rate_limit::IpFloodSettings;
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    database_url: Option<String>,
    redis_url: Option<String>,
    memory_seed_path: Option<String>,
    biscuit_private_key: String,
    token_ttl: Duration,
    allowed_origins: Vec<String>,
    pipeline: PipelineSettings,
    ip_flood: IpFloodSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

const fn default_token_ttl() -> u64 {
    3600
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{key} must be a number, got '{value}'"))),
    }
}

/// Parse a `max/window_secs` quota such as `20/60`.
fn parse_preset(
    key: &'static str,
    raw: Option<String>,
    default: RateLimitPreset,
) -> Result<RateLimitPreset, ConfigError> {
    let Some(value) = non_empty(raw) else {
        return Ok(default);
    };
    let invalid = || ConfigError::Invalid(format!("{key} must look like 'max/window_secs', got '{value}'"));

    let (max, window) = value.split_once('/').ok_or_else(invalid)?;
    let max: u32 = max.trim().parse().map_err(|_| invalid())?;
    let window: u64 = window.trim().parse().map_err(|_| invalid())?;
    if max == 0 || window == 0 {
        return Err(invalid());
    }
    Ok(RateLimitPreset::new(max, window))
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = non_empty(lookup("LISTEN_ADDR")).unwrap_or_else(default_listen_addr);
        let database_url = non_empty(lookup("DATABASE_URL"));
        let redis_url = non_empty(lookup("REDIS_URL"));
        let memory_seed_path = non_empty(lookup("MEMORY_SEED_PATH"));

        let biscuit_private_key = non_empty(lookup("BISCUIT_ROOT_PRIVATE_KEY"))
            .ok_or(ConfigError::Missing("BISCUIT_ROOT_PRIVATE_KEY"))?;
        if biscuit_private_key.len() != 64
            || !biscuit_private_key.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ConfigError::Invalid(
                "BISCUIT_ROOT_PRIVATE_KEY must be a 32-byte hex string".into(),
            ));
        }

        let token_ttl_secs = parse_number(
            "TOKEN_TTL_SECONDS",
            lookup("TOKEN_TTL_SECONDS"),
            default_token_ttl(),
        )?;

        let allowed_origins = non_empty(lookup("ALLOWED_ORIGINS"))
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let defaults = PipelineSettings::default();
        let presets = RateLimitPresets {
            admin: parse_preset(
                "ADMIN_RATE_LIMIT",
                lookup("ADMIN_RATE_LIMIT"),
                defaults.presets.admin,
            )?,
            api: parse_preset("API_RATE_LIMIT", lookup("API_RATE_LIMIT"), defaults.presets.api)?,
        };
        let auth_timeout_ms = parse_number(
            "AUTH_TIMEOUT_MS",
            lookup("AUTH_TIMEOUT_MS"),
            u64::try_from(defaults.auth_timeout.as_millis()).unwrap_or(3000),
        )?;
        let rate_limit_timeout_ms = parse_number(
            "RATE_LIMIT_TIMEOUT_MS",
            lookup("RATE_LIMIT_TIMEOUT_MS"),
            u64::try_from(defaults.rate_limit_timeout.as_millis()).unwrap_or(500),
        )?;

        let flood_defaults = IpFloodSettings::default();
        let ip_flood = IpFloodSettings {
            replenish_secs: parse_number(
                "IP_FLOOD_REPLENISH_SECS",
                lookup("IP_FLOOD_REPLENISH_SECS"),
                flood_defaults.replenish_secs,
            )?,
            burst: parse_number("IP_FLOOD_BURST", lookup("IP_FLOOD_BURST"), flood_defaults.burst)?,
        };

        Ok(Self {
            listen_addr,
            database_url,
            redis_url,
            memory_seed_path,
            biscuit_private_key,
            token_ttl: Duration::from_secs(token_ttl_secs),
            allowed_origins,
            pipeline: PipelineSettings {
                presets,
                auth_timeout: Duration::from_millis(auth_timeout_ms),
                rate_limit_timeout: Duration::from_millis(rate_limit_timeout_ms),
            },
            ip_flood,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// `None` selects the in-memory stores.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// `None` keeps rate-limit counters in process memory.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    /// JSON fixture loaded into the in-memory stores at startup.
    pub fn memory_seed_path(&self) -> Option<&str> {
        self.memory_seed_path.as_deref()
    }

    pub fn biscuit_private_key(&self) -> &str {
        &self.biscuit_private_key
    }

    pub const fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Allowed CORS origins; empty means any.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub const fn pipeline(&self) -> PipelineSettings {
        self.pipeline
    }

    pub const fn ip_flood(&self) -> IpFloodSettings {
        self.ip_flood
    }
}
