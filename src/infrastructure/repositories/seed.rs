//! JSON fixture for the in-memory stores, so a database-less process has
//! admins to authorize and entities to act on.
use super::memory::{InMemoryEntityStore, InMemoryUserDirectory};
use crate::domain::entity::{
    AccountStatus, EntityId, GovernedEntity, GovernedStatus, ProfessionalStatus,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{DirectoryEntry, Role};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemorySeed {
    pub directory: Vec<SeedSubject>,
    pub professionals: Vec<SeedEntity<ProfessionalStatus>>,
    pub users: Vec<SeedEntity<AccountStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSubject {
    pub uid: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedEntity<S> {
    pub id: String,
    pub status: S,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// How many records a seed put in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub subjects: usize,
    pub entities: usize,
}

impl MemorySeed {
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        serde_json::from_str(raw)
            .map_err(|err| DomainError::Validation(format!("invalid memory seed: {err}")))
    }

    pub fn apply(
        self,
        entities: &InMemoryEntityStore,
        directory: &InMemoryUserDirectory,
    ) -> DomainResult<SeedCounts> {
        let subjects = self.directory.len();
        for subject in self.directory {
            if subject.uid.trim().is_empty() {
                return Err(DomainError::Validation("seeded uid cannot be empty".into()));
            }
            directory.upsert(DirectoryEntry {
                uid: subject.uid,
                role: subject.role,
                email: subject.email,
                display_name: subject.display_name,
            })?;
        }

        let professionals = self
            .professionals
            .into_iter()
            .map(|seed| seed.into_entity(GovernedStatus::Professional));
        let users = self
            .users
            .into_iter()
            .map(|seed| seed.into_entity(GovernedStatus::Account));

        let mut seeded = 0;
        for entity in professionals.chain(users) {
            entities.seed(entity?)?;
            seeded += 1;
        }

        Ok(SeedCounts {
            subjects,
            entities: seeded,
        })
    }
}

impl<S> SeedEntity<S> {
    fn into_entity(self, status: impl FnOnce(S) -> GovernedStatus) -> DomainResult<GovernedEntity> {
        Ok(GovernedEntity {
            id: EntityId::new(self.id)?,
            status: status(self.status),
            status_stamp: None,
            display_name: self.display_name,
            email: self.email,
        })
    }
}
