// src/bin/issue_token.rs
//! Mint a bearer token for a directory subject, signed with the configured
//! root key and valid for `TOKEN_TTL_SECONDS`.
use anyhow::{Result, bail};
use marketplace_admin::{config::AppConfig, infrastructure::security::BiscuitIdentityVerifier};
use std::env;

fn main() -> Result<()> {
    let Some(subject) = env::args().nth(1).filter(|uid| !uid.trim().is_empty()) else {
        bail!("usage: issue_token <subject-uid>");
    };

    let config = AppConfig::from_env()?;
    let verifier =
        BiscuitIdentityVerifier::new(config.biscuit_private_key(), config.token_ttl())?;
    println!("{}", verifier.issue(&subject)?);
    Ok(())
}
