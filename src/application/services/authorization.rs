// src/application/services/authorization.rs
use crate::application::{
    dto::AdminIdentity,
    error::{ApplicationError, ApplicationResult},
    ports::security::IdentityVerifier,
};
use crate::domain::user::UserDirectory;
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Message returned for every rejected credential, whatever the reason.
const UNAUTHORIZED: &str = "unauthorized";

/// Second gate of the admin pipeline. Every rejection carries the same error
/// so callers cannot tell a missing token from a non-admin one.
pub struct AuthorizationGuard {
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn UserDirectory>,
    timeout: Duration,
}

impl AuthorizationGuard {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        directory: Arc<dyn UserDirectory>,
        timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            directory,
            timeout,
        }
    }

    /// Resolve the bearer credential to an administrator.
    pub async fn authorize(&self, bearer: Option<&str>) -> ApplicationResult<AdminIdentity> {
        let token = bearer.ok_or_else(|| Self::deny("missing bearer token"))?;

        match tokio::time::timeout(self.timeout, self.resolve_admin(token)).await {
            Ok(result) => result,
            Err(_) => Err(Self::deny("authorization timed out")),
        }
    }

    /// Resolve the bearer credential to its subject id without any role
    /// requirement. Used by recipient-facing endpoints.
    pub async fn authenticate(&self, bearer: Option<&str>) -> ApplicationResult<String> {
        let token = bearer.ok_or_else(|| Self::deny("missing bearer token"))?;

        match tokio::time::timeout(self.timeout, self.verifier.verify(token)).await {
            Ok(Ok(identity)) => Ok(identity.subject_id),
            Ok(Err(err)) => Err(Self::deny(&err.to_string())),
            Err(_) => Err(Self::deny("authentication timed out")),
        }
    }

    async fn resolve_admin(&self, token: &str) -> ApplicationResult<AdminIdentity> {
        let identity = self
            .verifier
            .verify(token)
            .await
            .map_err(|err| Self::deny(&err.to_string()))?;

        let entry = self
            .directory
            .find_by_uid(&identity.subject_id)
            .await
            .map_err(|err| Self::deny(&format!("directory lookup failed: {err}")))?
            .ok_or_else(|| Self::deny("subject not in directory"))?;

        if !entry.role.is_admin() {
            return Err(Self::deny("subject is not an administrator"));
        }

        Ok(AdminIdentity {
            uid: entry.uid,
            email: entry.email,
        })
    }

    fn deny(reason: &str) -> ApplicationError {
        debug!(reason, "admin authorization denied");
        ApplicationError::unauthorized(UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::security::VerifiedIdentity;
    use crate::domain::errors::{DomainError, DomainResult};
    use crate::domain::user::{DirectoryEntry, Role};
    use async_trait::async_trait;

    struct TableVerifier;

    #[async_trait]
    impl IdentityVerifier for TableVerifier {
        async fn verify(&self, token: &str) -> ApplicationResult<VerifiedIdentity> {
            match token {
                "admin" | "client" | "ghost" | "broken" => Ok(VerifiedIdentity {
                    subject_id: token.to_string(),
                }),
                "slow" => std::future::pending().await,
                _ => Err(ApplicationError::unauthorized("bad signature")),
            }
        }
    }

    struct TableDirectory;

    #[async_trait]
    impl UserDirectory for TableDirectory {
        async fn find_by_uid(&self, uid: &str) -> DomainResult<Option<DirectoryEntry>> {
            let role = match uid {
                "admin" => Role::Admin,
                "client" => Role::Client,
                "broken" => return Err(DomainError::Persistence("connection reset".into())),
                _ => return Ok(None),
            };
            Ok(Some(DirectoryEntry {
                uid: uid.to_string(),
                role,
                email: Some(format!("{uid}@example.com")),
                display_name: None,
            }))
        }
    }

    fn guard() -> AuthorizationGuard {
        AuthorizationGuard::new(
            Arc::new(TableVerifier),
            Arc::new(TableDirectory),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn admin_credential_resolves_identity() {
        let identity = guard().authorize(Some("admin")).await.unwrap();
        assert_eq!(identity.uid, "admin");
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
    }

    #[tokio::test]
    async fn every_non_admin_case_is_the_same_error() {
        let guard = guard();
        let cases = [None, Some("forged"), Some("client"), Some("ghost"), Some("broken"), Some("slow")];

        for bearer in cases {
            let err = guard.authorize(bearer).await.unwrap_err();
            match err {
                ApplicationError::Unauthorized(msg) => assert_eq!(msg, UNAUTHORIZED, "case {bearer:?}"),
                other => panic!("case {bearer:?}: unexpected {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn authenticate_accepts_any_role() {
        assert_eq!(guard().authenticate(Some("client")).await.unwrap(), "client");
        assert!(guard().authenticate(Some("forged")).await.is_err());
    }
}
