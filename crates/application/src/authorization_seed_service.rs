//! One-time bootstrap of the permission, role and user graph.
//!
//! A pass checks whether the store already holds permissions. When it does
//! not, permissions, roles and users are created in that order inside a
//! single [`SeedTransaction`]. Any failure rolls the whole pass back.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthorizationSeedRepository, PasswordHasher, SeedCatalog};

/// Terminal state of a successful seeding pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held permissions; nothing was written.
    Skipped {
        /// Permission rows found by the idempotency gate.
        existing_permissions: u64,
    },
    /// The full graph was committed.
    Completed(SeedSummary),
}

/// Counts of the committed graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// Number of permissions created.
    pub permission_count: usize,
    /// Distinct permissions granted to each created role.
    pub role_permission_counts: BTreeMap<String, usize>,
    /// Number of users created.
    pub user_count: usize,
    /// Commit time.
    pub completed_at: DateTime<Utc>,
}

/// Seeds the authorization domain on first startup.
#[derive(Clone)]
pub struct AuthorizationSeedService {
    repository: Arc<dyn AuthorizationSeedRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    catalog: SeedCatalog,
}

impl AuthorizationSeedService {
    /// Creates a seed service using the built-in tables.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationSeedRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self::with_catalog(repository, password_hasher, SeedCatalog::standard())
    }

    /// Creates a seed service using custom tables.
    #[must_use]
    pub fn with_catalog(
        repository: Arc<dyn AuthorizationSeedRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        catalog: SeedCatalog,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            catalog,
        }
    }
}

mod orchestrator;
mod permissions;
mod roles;
mod users;
