use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use stockchain_application::{
    AuthorizationSeedRepository, SeedTransaction, StoredPermission, StoredRole, StoredUser,
};
use stockchain_core::{AppError, AppResult};
use stockchain_domain::{Permission, Role, UserAccount, UserId};

#[derive(Debug, Clone, Default)]
struct AuthorizationState {
    permissions: BTreeMap<String, StoredPermission>,
    roles: BTreeMap<String, StoredRole>,
    users: BTreeMap<String, StoredUser>,
}

/// In-memory authorization store with single-writer transactions.
///
/// A transaction works on a private copy of the committed state and
/// replaces it on commit. Only one transaction is open at a time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorizationSeedRepository {
    state: Arc<RwLock<AuthorizationState>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryAuthorizationSeedRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over [`InMemoryAuthorizationSeedRepository`].
#[derive(Debug)]
pub struct InMemorySeedTransaction {
    committed: Arc<RwLock<AuthorizationState>>,
    staged: Option<AuthorizationState>,
    writer: Option<OwnedMutexGuard<()>>,
}

impl InMemorySeedTransaction {
    fn staged(&mut self) -> AppResult<&mut AuthorizationState> {
        self.staged.as_mut().ok_or_else(|| {
            AppError::Internal("seed transaction has already been finished".to_owned())
        })
    }
}

#[async_trait]
impl SeedTransaction for InMemorySeedTransaction {
    async fn count_permissions(&mut self) -> AppResult<u64> {
        let staged = self.staged()?;
        Ok(staged.permissions.len() as u64)
    }

    async fn save_permission(&mut self, permission: Permission) -> AppResult<StoredPermission> {
        let staged = self.staged()?;
        let code = permission.code().as_str().to_owned();

        if staged.permissions.contains_key(&code) {
            return Err(AppError::Conflict(format!(
                "permission '{code}' already exists"
            )));
        }

        let stored = StoredPermission {
            permission_id: Uuid::new_v4(),
            permission,
        };
        staged.permissions.insert(code, stored.clone());
        Ok(stored)
    }

    async fn save_role(&mut self, role: Role) -> AppResult<StoredRole> {
        let staged = self.staged()?;

        if staged.roles.contains_key(role.name()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        if let Some(missing) = role
            .permissions()
            .find(|code| !staged.permissions.contains_key(code.as_str()))
        {
            return Err(AppError::NotFound(format!(
                "role '{}' grants unknown permission '{missing}'",
                role.name()
            )));
        }

        let stored = StoredRole {
            role_id: Uuid::new_v4(),
            role,
        };
        staged
            .roles
            .insert(stored.role.name().to_owned(), stored.clone());
        Ok(stored)
    }

    async fn save_user(&mut self, account: UserAccount) -> AppResult<StoredUser> {
        let staged = self.staged()?;

        if staged.users.contains_key(account.username()) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                account.username()
            )));
        }

        if staged
            .users
            .values()
            .any(|user| user.account.email() == account.email())
        {
            return Err(AppError::Conflict(format!(
                "email '{}' already exists",
                account.email().as_str()
            )));
        }

        if !staged.roles.contains_key(account.role_name()) {
            return Err(AppError::NotFound(format!(
                "role '{}' for user '{}' was not found",
                account.role_name(),
                account.username()
            )));
        }

        let stored = StoredUser {
            user_id: UserId::new(),
            account,
        };
        staged
            .users
            .insert(stored.account.username().to_owned(), stored.clone());
        Ok(stored)
    }

    async fn commit(&mut self) -> AppResult<()> {
        let staged = self.staged.take().ok_or_else(|| {
            AppError::Internal("seed transaction has already been finished".to_owned())
        })?;

        // Publish before releasing the writer so the next transaction sees it.
        *self.committed.write().await = staged;
        self.writer = None;
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.staged = None;
        self.writer = None;
        Ok(())
    }
}

#[async_trait]
impl AuthorizationSeedRepository for InMemoryAuthorizationSeedRepository {
    async fn begin_seed(&self) -> AppResult<Box<dyn SeedTransaction>> {
        let writer = Arc::clone(&self.writer).lock_owned().await;
        let staged = self.state.read().await.clone();

        Ok(Box::new(InMemorySeedTransaction {
            committed: Arc::clone(&self.state),
            staged: Some(staged),
            writer: Some(writer),
        }))
    }

    async fn count_permissions(&self) -> AppResult<u64> {
        Ok(self.state.read().await.permissions.len() as u64)
    }

    async fn count_roles(&self) -> AppResult<u64> {
        Ok(self.state.read().await.roles.len() as u64)
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.state.read().await.users.len() as u64)
    }

    async fn find_permission(&self, code: &str) -> AppResult<Option<StoredPermission>> {
        Ok(self.state.read().await.permissions.get(code).cloned())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<StoredRole>> {
        Ok(self.state.read().await.roles.get(name).cloned())
    }

    async fn find_user(&self, username: &str) -> AppResult<Option<StoredUser>> {
        Ok(self.state.read().await.users.get(username).cloned())
    }
}
