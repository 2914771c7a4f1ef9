// src/presentation/http/controllers/admin.rs
use crate::application::{
    commands::admin::{
        AdminRequest, ApproveProfessionalCommand, ChangeUserStatusCommand,
        RejectProfessionalCommand,
    },
    dto::AdminActionOutcome,
    error::ApplicationError,
};
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::RequestContext,
    response::ApiResponse,
    state::HttpState,
};
use axum::{Extension, Json, body::Bytes, extract::Path};
use serde::{Deserialize, de::DeserializeOwned};

#[derive(Debug, Default, Deserialize)]
pub struct RejectProfessionalRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeUserStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// An empty body carries no fields. A body that does not decode is a 400,
/// reported only after the rate limit and authorization gates.
async fn admin_body<T: DeserializeOwned + Default>(
    state: &HttpState,
    request: &AdminRequest,
    body: &Bytes,
) -> HttpResult<T> {
    if body.is_empty() {
        return Ok(T::default());
    }
    match serde_json::from_slice(body) {
        Ok(payload) => Ok(payload),
        Err(err) => state
            .services
            .admin_commands
            .refuse_payload(
                request,
                ApplicationError::validation(format!("invalid request body: {err}")),
            )
            .await
            .into_http(),
    }
}

pub async fn approve_professional(
    Extension(state): Extension<HttpState>,
    RequestContext(request): RequestContext,
    Path(professional_id): Path<String>,
) -> HttpResult<Json<ApiResponse<AdminActionOutcome>>> {
    let outcome = state
        .services
        .admin_commands
        .approve_professional(&request, ApproveProfessionalCommand { professional_id })
        .await
        .into_http()?;

    Ok(ApiResponse::ok("Professional approved", outcome))
}

pub async fn reject_professional(
    Extension(state): Extension<HttpState>,
    RequestContext(request): RequestContext,
    Path(professional_id): Path<String>,
    body: Bytes,
) -> HttpResult<Json<ApiResponse<AdminActionOutcome>>> {
    let payload: RejectProfessionalRequest = admin_body(&state, &request, &body).await?;
    let outcome = state
        .services
        .admin_commands
        .reject_professional(
            &request,
            RejectProfessionalCommand {
                professional_id,
                reason: payload.reason,
            },
        )
        .await
        .into_http()?;

    Ok(ApiResponse::ok("Professional rejected", outcome))
}

pub async fn change_user_status(
    Extension(state): Extension<HttpState>,
    RequestContext(request): RequestContext,
    Path(user_id): Path<String>,
    body: Bytes,
) -> HttpResult<Json<ApiResponse<AdminActionOutcome>>> {
    let payload: ChangeUserStatusRequest = admin_body(&state, &request, &body).await?;
    let outcome = state
        .services
        .admin_commands
        .change_user_status(
            &request,
            ChangeUserStatusCommand {
                user_id,
                status: payload.status,
            },
        )
        .await
        .into_http()?;

    Ok(ApiResponse::ok("User status updated", outcome))
}
