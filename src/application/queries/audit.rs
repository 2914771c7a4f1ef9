use crate::application::{
    dto::{AdminIdentity, AuditLogDto},
    error::ApplicationResult,
};
use crate::domain::audit::AuditLogRepository;
use std::sync::Arc;

pub const DEFAULT_AUDIT_PAGE: u32 = 50;
pub const MAX_AUDIT_PAGE: u32 = 100;

pub struct AuditQueryService {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditQueryService {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    /// Most recent entries first. `_admin` is proof that the caller already
    /// passed the admin gates.
    pub async fn list_recent(
        &self,
        _admin: &AdminIdentity,
        limit: Option<u32>,
    ) -> ApplicationResult<Vec<AuditLogDto>> {
        let limit = limit.unwrap_or(DEFAULT_AUDIT_PAGE).clamp(1, MAX_AUDIT_PAGE);
        let logs = self.repo.list_recent(limit).await?;
        Ok(logs.into_iter().map(AuditLogDto::from).collect())
    }
}
