// src/presentation/http/extractors.rs
use crate::application::{
    ApplicationResult, commands::admin::AdminRequest, error::ApplicationError,
};
use axum::{
    extract::{FromRequestParts, Query, rejection::QueryRejection},
    http::{HeaderMap, request::Parts},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::convert::Infallible;

/// Rate-limit key used when the client address cannot be determined.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Caller address plus the bearer credential, if any. Never rejects: a missing
/// or malformed `Authorization` header is left for the authorization guard to
/// refuse, after the rate limiter has counted the request.
#[derive(Debug, Clone)]
pub struct RequestContext(pub AdminRequest);

impl RequestContext {
    pub fn caller(&self) -> &str {
        &self.0.caller
    }

    pub fn bearer(&self) -> Option<&str> {
        self.0.bearer.as_deref()
    }
}

/// Query string whose decoding failure is held back until the handler has run
/// its gates.
pub type DeferredQuery<T> = Result<Query<T>, QueryRejection>;

pub fn query_params<T>(query: DeferredQuery<T>) -> ApplicationResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApplicationError::validation(rejection.body_text()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`.
pub fn client_address(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(ToOwned::to_owned)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = client_address(&parts.headers).unwrap_or_else(|| ANONYMOUS_CALLER.to_string());
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|header| header.token().to_string());

        Ok(Self(AdminRequest::new(caller, bearer)))
    }
}
