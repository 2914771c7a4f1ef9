// src/presentation/http/routes.rs
use crate::presentation::http::{
    controllers::{admin, audit, notifications},
    middleware::rate_limit::{IpFloodSettings, ip_flood_layer},
    state::HttpState,
};
use axum::{
    Extension, Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Transport-level options decided at start-up.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// `None` disables the per-IP flood layer.
    pub ip_flood: Option<IpFloodSettings>,
}

pub fn build_router(state: HttpState) -> Router {
    build_router_with_rate_limiter(state, true)
}

pub fn build_router_with_rate_limiter(state: HttpState, enable_rate_limiter: bool) -> Router {
    let options = RouterOptions {
        allowed_origins: Vec::new(),
        ip_flood: enable_rate_limiter.then(IpFloodSettings::default),
    };
    build_router_with_options(state, &options)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

pub fn build_router_with_options(state: HttpState, options: &RouterOptions) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/admin/professionals/{id}/approve",
            post(admin::approve_professional),
        )
        .route(
            "/api/v1/admin/professionals/{id}/reject",
            post(admin::reject_professional),
        )
        .route(
            "/api/v1/admin/users/{id}/status",
            post(admin::change_user_status),
        )
        .route("/api/v1/admin/audit-logs", get(audit::list_audit_logs))
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route(
            "/api/v1/notifications/read-all",
            post(notifications::mark_all_notifications_read),
        )
        .route(
            "/api/v1/notifications/stream",
            get(notifications::stream_notifications),
        )
        .route(
            "/api/v1/notifications/{id}/read",
            post(notifications::mark_notification_read),
        );

    let router = match options.ip_flood.and_then(ip_flood_layer) {
        Some(layer) => router.layer(layer),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.allowed_origins))
        .layer(Extension(state))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}
