use crate::domain::errors::DomainResult;
use crate::domain::user::entity::DirectoryEntry;
use async_trait::async_trait;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> DomainResult<Option<DirectoryEntry>>;
}
