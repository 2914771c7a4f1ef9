// src/infrastructure/mod.rs
pub mod database;
pub mod rate_limit;
pub mod repositories;
pub mod security;
pub mod time;
