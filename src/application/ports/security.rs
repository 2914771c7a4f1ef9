use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Subject proven by a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Check the credential's signature and expiry. Any failure is reported as
    /// `ApplicationError::Unauthorized`.
    async fn verify(&self, token: &str) -> ApplicationResult<VerifiedIdentity>;
}
