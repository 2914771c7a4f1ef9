// src/application/ports/mod.rs
pub mod rate_limit;
pub mod security;
pub mod time;
