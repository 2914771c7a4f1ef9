// src/presentation/http/middleware/rate_limit.rs
use crate::application::error::{ApplicationError, RateLimitInfo};
use crate::presentation::http::error::HttpError;
use ::governor::middleware::NoOpMiddleware;
use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
};

pub type IpFloodLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-IP token bucket in front of every route. Coarse flood protection only;
/// the per-route-class quotas live in the application rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpFloodSettings {
    /// Seconds between two replenished tokens.
    pub replenish_secs: u64,
    /// Tokens available to a fresh client before replenishment kicks in.
    pub burst: u32,
}

impl Default for IpFloodSettings {
    fn default() -> Self {
        Self {
            replenish_secs: 10,
            burst: 20,
        }
    }
}

/// `None` when the settings cannot form a valid quota (zero period or burst).
pub fn ip_flood_layer(settings: IpFloodSettings) -> Option<IpFloodLayer> {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(settings.replenish_secs);
    builder.burst_size(settings.burst);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;

    let burst = settings.burst;
    Some(GovernorLayer::new(config).error_handler(move |err| flood_response(burst, err)))
}

// Same JSON envelope and quota headers as the application limiter.
fn flood_response(burst: u32, err: GovernorError) -> Response<Body> {
    let error = match err {
        GovernorError::TooManyRequests { wait_time, .. } => {
            let wait = i64::try_from(wait_time.min(86_400)).unwrap_or(86_400);
            ApplicationError::RateLimited(RateLimitInfo {
                limit: burst,
                remaining: 0,
                reset_at: Utc::now() + Duration::seconds(wait),
            })
        }
        GovernorError::UnableToExtractKey => {
            ApplicationError::infrastructure("could not determine client address")
        }
        GovernorError::Other { msg, .. } => ApplicationError::infrastructure(
            msg.unwrap_or_else(|| "ip flood guard failed".to_owned()),
        ),
    };
    HttpError::from_error(error).into_response()
}
