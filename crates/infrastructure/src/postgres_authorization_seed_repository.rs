use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use stockchain_application::{
    AuthorizationSeedRepository, SeedTransaction, StoredPermission, StoredRole, StoredUser,
};
use stockchain_core::{AppError, AppResult};
use stockchain_domain::{
    EmailAddress, Permission, PermissionCategory, PermissionCode, Role, UserAccount, UserId,
};

/// Advisory lock key serialising seed transactions across processes.
const SEED_ADVISORY_LOCK_KEY: i64 = 0x5EED_A117;

/// PostgreSQL-backed repository for the permission, role and user tables.
#[derive(Clone)]
pub struct PostgresAuthorizationSeedRepository {
    pool: PgPool,
}

impl PostgresAuthorizationSeedRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Seed unit of work backed by one PostgreSQL transaction.
pub struct PostgresSeedTransaction {
    transaction: Option<Transaction<'static, Postgres>>,
}

impl PostgresSeedTransaction {
    fn active(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        self.transaction.as_mut().ok_or_else(|| {
            AppError::Internal("seed transaction has already been finished".to_owned())
        })
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    code: String,
    name: String,
    description: String,
    category: String,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_name: String,
    description: String,
    permission_code: Option<String>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    full_name: String,
    is_active: bool,
    role_name: String,
}

#[async_trait]
impl SeedTransaction for PostgresSeedTransaction {
    async fn count_permissions(&mut self) -> AppResult<u64> {
        let transaction = self.active()?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions")
            .fetch_one(&mut **transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count permissions: {error}"))
            })?;

        row_count(count)
    }

    async fn save_permission(&mut self, permission: Permission) -> AppResult<StoredPermission> {
        let transaction = self.active()?;
        let permission_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO permissions (id, code, name, description, category)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(permission_id)
        .bind(permission.code().as_str())
        .bind(permission.name())
        .bind(permission.description())
        .bind(permission.category().as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            map_unique_violation(error, format!("permission '{}'", permission.code()))
        })?;

        Ok(StoredPermission {
            permission_id,
            permission,
        })
    }

    async fn save_role(&mut self, role: Role) -> AppResult<StoredRole> {
        let transaction = self.active()?;
        let role_id = Uuid::new_v4();
        let codes: Vec<String> = role
            .permissions()
            .map(|code| code.as_str().to_owned())
            .collect();

        let granted = sqlx::query(
            r#"
            WITH inserted_role AS (
                INSERT INTO roles (id, name, description)
                VALUES ($1, $2, $3)
                RETURNING id
            )
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT inserted_role.id, permissions.id
            FROM inserted_role
            CROSS JOIN permissions
            WHERE permissions.code = ANY($4)
            "#,
        )
        .bind(role_id)
        .bind(role.name())
        .bind(role.description())
        .bind(&codes)
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_unique_violation(error, format!("role '{}'", role.name())))?
        .rows_affected();

        if granted != codes.len() as u64 {
            return Err(AppError::NotFound(format!(
                "role '{}' grants {} permissions but only {granted} exist",
                role.name(),
                codes.len()
            )));
        }

        Ok(StoredRole { role_id, role })
    }

    async fn save_user(&mut self, account: UserAccount) -> AppResult<StoredUser> {
        let transaction = self.active()?;
        let user_id = UserId::new();

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, full_name, role_id, is_active)
            SELECT $1, $2, $3, $4, $5, roles.id, $7
            FROM roles
            WHERE roles.name = $6
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(account.username())
        .bind(account.email().as_str())
        .bind(account.password_hash())
        .bind(account.full_name())
        .bind(account.role_name())
        .bind(account.is_active())
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_unique_violation(error, format!("user '{}'", account.username())))?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' for user '{}' was not found",
                account.role_name(),
                account.username()
            )));
        }

        Ok(StoredUser { user_id, account })
    }

    async fn commit(&mut self) -> AppResult<()> {
        let transaction = self.transaction.take().ok_or_else(|| {
            AppError::Internal("seed transaction has already been finished".to_owned())
        })?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
    }

    async fn rollback(&mut self) -> AppResult<()> {
        let Some(transaction) = self.transaction.take() else {
            return Ok(());
        };

        transaction.rollback().await.map_err(|error| {
            AppError::Internal(format!("failed to roll back transaction: {error}"))
        })
    }
}

#[async_trait]
impl AuthorizationSeedRepository for PostgresAuthorizationSeedRepository {
    async fn begin_seed(&self) -> AppResult<Box<dyn SeedTransaction>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_ADVISORY_LOCK_KEY)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to acquire seed lock: {error}"))
            })?;
        debug!(lock_key = SEED_ADVISORY_LOCK_KEY, "acquired authorization seed lock");

        Ok(Box::new(PostgresSeedTransaction {
            transaction: Some(transaction),
        }))
    }

    async fn count_permissions(&self) -> AppResult<u64> {
        self.count_rows("SELECT COUNT(*) FROM permissions", "permissions")
            .await
    }

    async fn count_roles(&self) -> AppResult<u64> {
        self.count_rows("SELECT COUNT(*) FROM roles", "roles").await
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.count_rows("SELECT COUNT(*) FROM users", "users").await
    }

    async fn find_permission(&self, code: &str) -> AppResult<Option<StoredPermission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, code, name, description, category
            FROM permissions
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        row.map(|row| -> AppResult<StoredPermission> {
            Ok(StoredPermission {
                permission_id: row.id,
                permission: Permission::new(
                    PermissionCode::new(row.code)?,
                    row.name,
                    row.description,
                    PermissionCategory::new(row.category)?,
                )?,
            })
        })
        .transpose()
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<StoredRole>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.description,
                permissions.code AS permission_code
            FROM roles
            LEFT JOIN role_permissions
                ON role_permissions.role_id = roles.id
            LEFT JOIN permissions
                ON permissions.id = role_permissions.permission_id
            WHERE roles.name = $1
            ORDER BY permissions.code
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        aggregate_role(rows)
    }

    async fn find_user(&self, username: &str) -> AppResult<Option<StoredUser>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                users.id,
                users.username,
                users.email,
                users.password_hash,
                users.full_name,
                users.is_active,
                roles.name AS role_name
            FROM users
            INNER JOIN roles ON roles.id = users.role_id
            WHERE users.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        row.map(|row| -> AppResult<StoredUser> {
            let account = UserAccount::new(
                row.username,
                EmailAddress::new(row.email)?,
                row.password_hash,
                row.full_name,
                row.role_name,
            )?
            .with_is_active(row.is_active);

            Ok(StoredUser {
                user_id: UserId::from_uuid(row.id),
                account,
            })
        })
        .transpose()
    }
}

impl PostgresAuthorizationSeedRepository {
    async fn count_rows(&self, statement: &'static str, table: &str) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(statement)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count {table}: {error}")))?;

        row_count(count)
    }
}

fn aggregate_role(rows: Vec<RoleRow>) -> AppResult<Option<StoredRole>> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let role_id = first.role_id;
    let role_name = first.role_name.clone();
    let description = first.description.clone();

    let permissions = rows
        .into_iter()
        .filter_map(|row| row.permission_code)
        .map(PermissionCode::new)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Some(StoredRole {
        role_id,
        role: Role::with_permissions(role_name, description, permissions)?,
    }))
}

fn row_count(count: i64) -> AppResult<u64> {
    u64::try_from(count)
        .map_err(|error| AppError::Internal(format!("invalid row count {count}: {error}")))
}

fn map_unique_violation(error: sqlx::Error, subject: String) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("{subject} already exists"));
    }

    AppError::Internal(format!("failed to persist {subject}: {error}"))
}

#[cfg(test)]
mod tests;
