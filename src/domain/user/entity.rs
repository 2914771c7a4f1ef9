// src/domain/user/entity.rs
use crate::domain::user::value_objects::Role;

/// Directory view of a subject: what the authorization guard and the audit
/// writer need to know about whoever holds a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub uid: String,
    pub role: Role,
    pub email: Option<String>,
    pub display_name: Option<String>,
}
