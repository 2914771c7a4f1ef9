// tests/support/mocks/security.rs
use async_trait::async_trait;
use marketplace_admin::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::security::{IdentityVerifier, VerifiedIdentity},
};
use std::time::Duration;

/// テスト用トークン定数（タイポ防止とIDE補完のため）
pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLIENT_TOKEN: &str = "client-token";
pub const EXPIRED_TOKEN: &str = "expired-token";
/// 署名は有効だがディレクトリに存在しない主体
pub const UNLISTED_TOKEN: &str = "unlisted-token";

pub const ADMIN_UID: &str = "admin-1";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const CLIENT_UID: &str = "client-1";

/* -------------------------------- IdentityVerifier -------------------------------- */

#[derive(Clone, Debug, Default)]
pub struct DummyIdentityVerifier;

#[async_trait]
impl IdentityVerifier for DummyIdentityVerifier {
    async fn verify(&self, token: &str) -> ApplicationResult<VerifiedIdentity> {
        let subject = match token {
            ADMIN_TOKEN => ADMIN_UID,
            CLIENT_TOKEN => CLIENT_UID,
            UNLISTED_TOKEN => "ghost-1",
            // Expired tokens should be rejected at verification time
            EXPIRED_TOKEN => return Err(ApplicationError::unauthorized("expired token")),
            _ => return Err(ApplicationError::unauthorized("invalid token")),
        };
        Ok(VerifiedIdentity {
            subject_id: subject.to_string(),
        })
    }
}

/// 応答しない検証器（タイムアウトの確認用）
#[derive(Clone, Debug)]
pub struct SlowIdentityVerifier(pub Duration);

#[async_trait]
impl IdentityVerifier for SlowIdentityVerifier {
    async fn verify(&self, token: &str) -> ApplicationResult<VerifiedIdentity> {
        tokio::time::sleep(self.0).await;
        DummyIdentityVerifier.verify(token).await
    }
}
