// src/infrastructure/security/token.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::{IdentityVerifier, VerifiedIdentity},
};
use async_trait::async_trait;
use biscuit_auth::{
    Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Fact, Term},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

const SUBJECT_CODE: &str = r"
    user({uid});
    issued_at({issued});
    expires_at({exp});
    check if time($now), $now >= {issued};
    check if time($now), $now <= {exp};
";

/// Verifies biscuit bearer tokens signed by the configured root key. The
/// token's own `time` checks carry the expiry, so a stale token fails
/// authorization rather than being parsed.
#[derive(Clone)]
pub struct BiscuitIdentityVerifier {
    root: Arc<KeyPair>,
    public: PublicKey,
    ttl: Duration,
}

impl BiscuitIdentityVerifier {
    pub fn new(private_key_hex: &str, ttl: Duration) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            ttl,
        })
    }

    /// Mint a token for `subject_id`, valid from now for the configured ttl.
    pub fn issue(&self, subject_id: &str) -> ApplicationResult<String> {
        let issued_at = SystemTime::now();
        let expires_at = issued_at
            .checked_add(self.ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;
        self.issue_window(subject_id, issued_at, expires_at)
    }

    fn issue_window(
        &self,
        subject_id: &str,
        issued_at: SystemTime,
        expires_at: SystemTime,
    ) -> ApplicationResult<String> {
        let mut params: HashMap<String, Term> = HashMap::new();
        params.insert("uid".to_string(), subject_id.into());
        params.insert("issued".to_string(), issued_at.into());
        params.insert("exp".to_string(), expires_at.into());

        let token = Biscuit::builder()
            .code_with_params(SUBJECT_CODE, params, HashMap::new())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .build(self.root.as_ref())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        token
            .seal()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .to_base64()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }
}

fn subject_from_facts(facts: Vec<Fact>) -> Option<String> {
    facts.into_iter().find_map(|fact| {
        let predicate = fact.predicate;
        if predicate.name != "user" || predicate.terms.len() != 1 {
            return None;
        }
        match predicate.terms.into_iter().next() {
            Some(Term::Str(uid)) if !uid.trim().is_empty() => Some(uid),
            _ => None,
        }
    })
}

#[async_trait]
impl IdentityVerifier for BiscuitIdentityVerifier {
    async fn verify(&self, token: &str) -> ApplicationResult<VerifiedIdentity> {
        let biscuit = Biscuit::from_base64(token, self.public)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        let mut authorizer = AuthorizerBuilder::new()
            .time()
            .build(&biscuit)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        authorizer
            .authorize()
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        let view = biscuit
            .authorizer()
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;
        let (facts, _, _, _) = view.dump();

        let subject_id = subject_from_facts(facts)
            .ok_or_else(|| ApplicationError::unauthorized("token carries no subject"))?;

        Ok(VerifiedIdentity { subject_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_KEY_HEX: &str = "c2b7507d4c2f8b7a6a3f1e0d9c8b7a695847362514f3e2d1c0b9a8f7e6d5c4b3";

    fn verifier() -> BiscuitIdentityVerifier {
        BiscuitIdentityVerifier::new(ROOT_KEY_HEX, Duration::from_secs(60)).unwrap()
    }

    #[tokio::test]
    async fn issued_tokens_verify_to_their_subject() {
        let verifier = verifier();
        let token = verifier.issue("admin-1").unwrap();
        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.subject_id, "admin-1");
    }

    #[tokio::test]
    async fn expired_tokens_are_unauthorized() {
        let verifier = verifier();
        let issued = SystemTime::now() - Duration::from_secs(120);
        let expired = issued + Duration::from_secs(60);
        let token = verifier.issue_window("admin-1", issued, expired).unwrap();
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn foreign_signatures_are_unauthorized() {
        let other = BiscuitIdentityVerifier::new(
            "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0",
            Duration::from_secs(60),
        )
        .unwrap();
        let token = other.issue("admin-1").unwrap();
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));

        let err = verifier().verify("not-a-token").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }
}
