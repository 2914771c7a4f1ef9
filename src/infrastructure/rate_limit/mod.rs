// src/infrastructure/rate_limit/mod.rs
mod memory;
mod redis_store;

pub use memory::InMemoryRateLimitStore;
pub use redis_store::RedisRateLimitStore;
