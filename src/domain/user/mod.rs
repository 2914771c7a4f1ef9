// src/domain/user/mod.rs
pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::DirectoryEntry;
pub use repository::UserDirectory;
pub use value_objects::Role;
