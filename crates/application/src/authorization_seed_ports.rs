//! Ports used by the authorization seed.
//!
//! The store is reached through [`AuthorizationSeedRepository`], which
//! hands out one [`SeedTransaction`] per seeding pass. Every write of a
//! pass goes through that transaction so the whole graph becomes visible
//! on commit or not at all.

use async_trait::async_trait;
use uuid::Uuid;

use stockchain_core::AppResult;
use stockchain_domain::{Permission, Role, UserAccount, UserId};

/// Permission row returned by the store after a save or lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPermission {
    /// Store-assigned identifier.
    pub permission_id: Uuid,
    /// Persisted permission definition.
    pub permission: Permission,
}

/// Role row with its effective permission codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRole {
    /// Store-assigned identifier.
    pub role_id: Uuid,
    /// Persisted role with its granted permissions.
    pub role: Role,
}

/// User row returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Store-assigned identifier.
    pub user_id: UserId,
    /// Persisted account.
    pub account: UserAccount,
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a self-describing digest.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored digest.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// One all-or-nothing unit of work against the authorization store.
///
/// Dropping a transaction without calling [`SeedTransaction::commit`]
/// discards every write made through it.
#[async_trait]
pub trait SeedTransaction: Send {
    /// Counts permissions visible to this transaction.
    async fn count_permissions(&mut self) -> AppResult<u64>;

    /// Persists a permission. Fails with a conflict when the code exists.
    async fn save_permission(&mut self, permission: Permission) -> AppResult<StoredPermission>;

    /// Persists a role together with its grants in a single write.
    ///
    /// Every granted code must already exist in this transaction.
    async fn save_role(&mut self, role: Role) -> AppResult<StoredRole>;

    /// Persists a user. The bound role must already exist.
    async fn save_user(&mut self, account: UserAccount) -> AppResult<StoredUser>;

    /// Publishes every write of this transaction.
    async fn commit(&mut self) -> AppResult<()>;

    /// Discards every write of this transaction.
    async fn rollback(&mut self) -> AppResult<()>;
}

/// Repository port for the permission, role and user tables.
#[async_trait]
pub trait AuthorizationSeedRepository: Send + Sync {
    /// Opens the unit of work used by one seeding pass.
    async fn begin_seed(&self) -> AppResult<Box<dyn SeedTransaction>>;

    /// Counts committed permissions.
    async fn count_permissions(&self) -> AppResult<u64>;

    /// Counts committed roles.
    async fn count_roles(&self) -> AppResult<u64>;

    /// Counts committed users.
    async fn count_users(&self) -> AppResult<u64>;

    /// Finds a permission by its unique code.
    async fn find_permission(&self, code: &str) -> AppResult<Option<StoredPermission>>;

    /// Finds a role by its unique name.
    async fn find_role(&self, name: &str) -> AppResult<Option<StoredRole>>;

    /// Finds a user by its unique username.
    async fn find_user(&self, username: &str) -> AppResult<Option<StoredUser>>;
}
