//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_authorization_seed_repository;
mod postgres_authorization_seed_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_authorization_seed_repository::{
    InMemoryAuthorizationSeedRepository, InMemorySeedTransaction,
};
pub use postgres_authorization_seed_repository::{
    PostgresAuthorizationSeedRepository, PostgresSeedTransaction,
};
