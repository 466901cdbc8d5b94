//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_seed_ports;
mod authorization_seed_service;
mod seed_catalog;

pub use authorization_seed_ports::{
    AuthorizationSeedRepository, PasswordHasher, SeedTransaction, StoredPermission, StoredRole,
    StoredUser,
};
pub use authorization_seed_service::{AuthorizationSeedService, SeedOutcome, SeedSummary};
pub use seed_catalog::{
    PermissionSeed, RoleGrants, RoleSeed, SeedCatalog, UnresolvedGrant, UserSeed,
};
