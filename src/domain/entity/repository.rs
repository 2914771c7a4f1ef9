use crate::domain::entity::{
    entity::{GovernedEntity, StatusUpdate},
    value_objects::{EntityId, EntityKind},
};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get(&self, kind: EntityKind, id: &EntityId) -> DomainResult<Option<GovernedEntity>>;

    /// Single atomic write of the status fields. Fails with `NotFound` when the
    /// record vanished between the read and the write.
    async fn update_status(&self, update: StatusUpdate) -> DomainResult<GovernedEntity>;
}
