// src/domain/mod.rs
pub mod audit;
pub mod entity;
pub mod errors;
pub mod notification;
pub mod user;
