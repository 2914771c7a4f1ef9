use crate::application::{
    ApplicationResult,
    error::{ApplicationError, RateLimitInfo},
};
use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
    rate_limit: Option<RateLimitInfo>,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg) | ApplicationError::InvalidTransition(msg) => {
                Self::new(StatusCode::BAD_REQUEST, msg)
            }
            ApplicationError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ApplicationError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ApplicationError::Unauthorized(msg) => Self::new(StatusCode::UNAUTHORIZED, msg),
            ApplicationError::RateLimited(info) => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: "too many requests".into(),
                rate_limit: Some(info),
            },
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "request failed on infrastructure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                )
            }
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            rate_limit: None,
        }
    }
}

fn rate_limit_headers(info: RateLimitInfo) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let reset = info.reset_at.timestamp().max(0);
    let retry_after = (reset - Utc::now().timestamp()).max(1);

    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(info.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(info.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset));
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
    headers
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        match self.rate_limit {
            Some(info) => (self.status, rate_limit_headers(info), body).into_response(),
            None => (self.status, body).into_response(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
