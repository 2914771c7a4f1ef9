use crate::application::dto::AuditLogDto;
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::{DeferredQuery, RequestContext, query_params},
    response::ApiResponse,
    state::HttpState,
};
use axum::{Extension, Json};

#[derive(Debug, serde::Deserialize)]
pub struct ListAuditParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

pub async fn list_audit_logs(
    Extension(state): Extension<HttpState>,
    RequestContext(request): RequestContext,
    query: DeferredQuery<ListAuditParams>,
) -> HttpResult<Json<ApiResponse<Vec<AuditLogDto>>>> {
    let admin = state
        .services
        .admin_commands
        .admit(&request)
        .await
        .into_http()?;
    let params = query_params(query).into_http()?;
    let logs = state
        .services
        .audit_queries
        .list_recent(&admin, params.limit)
        .await
        .into_http()?;

    Ok(ApiResponse::ok("Audit log entries", logs))
}
