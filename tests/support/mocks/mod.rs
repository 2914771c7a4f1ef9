// tests/support/mocks/mod.rs
//! テストサポートモック再エクスポートモジュール
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod repos;
pub mod security;
pub mod time;

// 時刻関連
pub use time::{FixedClock, fixed_now};

// セキュリティ関連
pub use security::{
    ADMIN_EMAIL, ADMIN_TOKEN, ADMIN_UID, CLIENT_TOKEN, CLIENT_UID, DummyIdentityVerifier,
    EXPIRED_TOKEN, SlowIdentityVerifier, UNLISTED_TOKEN,
};

// リポジトリ関連
pub use repos::{CountingEntityStore, FailingAuditRepo, FailingNotificationRepo};
