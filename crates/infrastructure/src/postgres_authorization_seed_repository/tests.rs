use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use stockchain_application::AuthorizationSeedRepository;
use stockchain_core::AppError;
use stockchain_domain::{
    EmailAddress, Permission, PermissionCategory, PermissionCode, Role, UserAccount,
};

use super::PostgresAuthorizationSeedRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres authorization seed tests: {error}");
    }

    Some(pool)
}

fn sample_permission(suffix: &str) -> Permission {
    let code = match PermissionCode::new(format!("sample_{suffix}.read")) {
        Ok(code) => code,
        Err(error) => panic!("sample code should be valid: {error}"),
    };
    let category = match PermissionCategory::new("SAMPLE") {
        Ok(category) => category,
        Err(error) => panic!("sample category should be valid: {error}"),
    };

    match Permission::new(code, "Read sample", "Sample permission for tests", category) {
        Ok(permission) => permission,
        Err(error) => panic!("sample permission should be valid: {error}"),
    }
}

fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

#[tokio::test]
async fn staged_rows_stay_invisible_and_vanish_on_rollback() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let permission = sample_permission(&suffix);
    let code = permission.code().as_str().to_owned();

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    let before = transaction.count_permissions().await;
    assert!(before.is_ok());

    let stored = transaction.save_permission(permission).await;
    assert!(stored.is_ok());

    let staged = transaction.count_permissions().await;
    assert!(matches!((before, staged), (Ok(before), Ok(staged)) if staged == before + 1));

    let outside = repository.find_permission(&code).await;
    assert!(matches!(outside, Ok(None)));

    assert!(transaction.rollback().await.is_ok());
    assert!(transaction.rollback().await.is_ok());

    let after = repository.find_permission(&code).await;
    assert!(matches!(after, Ok(None)));
}

#[tokio::test]
async fn role_and_user_link_inside_one_transaction() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let permission = sample_permission(&suffix);
    let mut role = match Role::new(format!("SAMPLE_{suffix}"), "Sample role") {
        Ok(role) => role,
        Err(error) => panic!("sample role should be valid: {error}"),
    };
    assert!(role.grant(&permission));
    let role_name = role.name().to_owned();

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    assert!(transaction.save_permission(permission).await.is_ok());
    let stored_role = transaction.save_role(role).await;
    assert!(matches!(&stored_role, Ok(stored) if stored.role.permission_count() == 1));

    let email = match EmailAddress::new(format!("{suffix}@sample.test")) {
        Ok(email) => email,
        Err(error) => panic!("sample email should be valid: {error}"),
    };
    let account = match UserAccount::new(
        format!("sample_{suffix}"),
        email,
        "$argon2id$sample",
        "Sample User",
        role_name.as_str(),
    ) {
        Ok(account) => account,
        Err(error) => panic!("sample account should be valid: {error}"),
    };
    let stored_user = transaction.save_user(account).await;
    assert!(matches!(&stored_user, Ok(stored) if stored.account.role_name() == role_name));

    assert!(transaction.rollback().await.is_ok());
    assert!(matches!(repository.find_role(&role_name).await, Ok(None)));
}

#[tokio::test]
async fn role_granting_missing_permission_is_rejected() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let unsaved = sample_permission(&suffix);
    let mut role = match Role::new(format!("SAMPLE_{suffix}"), "Sample role") {
        Ok(role) => role,
        Err(error) => panic!("sample role should be valid: {error}"),
    };
    assert!(role.grant(&unsaved));

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    let result = transaction.save_role(role).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(transaction.rollback().await.is_ok());
}

#[tokio::test]
async fn user_with_unknown_role_is_rejected() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let email = match EmailAddress::new(format!("{suffix}@sample.test")) {
        Ok(email) => email,
        Err(error) => panic!("sample email should be valid: {error}"),
    };
    let account = match UserAccount::new(
        format!("sample_{suffix}"),
        email,
        "$argon2id$sample",
        "Sample User",
        format!("MISSING_{suffix}"),
    ) {
        Ok(account) => account,
        Err(error) => panic!("sample account should be valid: {error}"),
    };

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    let result = transaction.save_user(account).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(transaction.rollback().await.is_ok());
}

#[tokio::test]
async fn duplicate_permission_code_conflicts() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    assert!(transaction.save_permission(sample_permission(&suffix)).await.is_ok());
    let duplicate = transaction.save_permission(sample_permission(&suffix)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(transaction.rollback().await.is_ok());
}

#[tokio::test]
async fn finished_transaction_refuses_further_writes() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };

    assert!(transaction.rollback().await.is_ok());
    let result = transaction
        .save_permission(sample_permission(&unique_suffix()))
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(matches!(transaction.commit().await, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn committed_graph_reads_back_through_lookups() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let permission = sample_permission(&suffix);
    let code = permission.code().as_str().to_owned();

    let mut role = match Role::new(format!("SAMPLE_{suffix}"), "Sample role") {
        Ok(role) => role,
        Err(error) => panic!("role should be valid: {error}"),
    };
    assert!(role.grant(&permission));
    let role_name = role.name().to_owned();

    let empty_role = match Role::new(format!("EMPTY_{suffix}"), "Role without grants") {
        Ok(role) => role,
        Err(error) => panic!("role should be valid: {error}"),
    };
    let empty_role_name = empty_role.name().to_owned();

    let email = match EmailAddress::new(format!("{suffix}@sample.test")) {
        Ok(email) => email,
        Err(error) => panic!("email should be valid: {error}"),
    };
    let username = format!("committed_{suffix}");
    let account = match UserAccount::new(
        username.as_str(),
        email,
        "$argon2id$committed",
        "Committed User",
        role_name.as_str(),
    ) {
        Ok(account) => account,
        Err(error) => panic!("account should be valid: {error}"),
    };

    let roles_before = repository.count_roles().await;
    let users_before = repository.count_users().await;
    assert!(roles_before.is_ok());
    assert!(users_before.is_ok());

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };
    assert!(transaction.save_permission(permission).await.is_ok());
    assert!(transaction.save_role(role).await.is_ok());
    assert!(transaction.save_role(empty_role).await.is_ok());
    assert!(transaction.save_user(account).await.is_ok());
    assert!(transaction.commit().await.is_ok());

    let stored_permission = repository.find_permission(&code).await;
    assert!(matches!(
        &stored_permission,
        Ok(Some(stored)) if stored.permission.category().as_str() == "SAMPLE"
            && stored.permission.name() == "Read sample"
    ));

    let stored_role = match repository.find_role(&role_name).await {
        Ok(Some(stored)) => stored,
        other => panic!("committed role should be found, got {other:?}"),
    };
    let codes: Vec<&str> = stored_role
        .role
        .permissions()
        .map(PermissionCode::as_str)
        .collect();
    assert_eq!(codes, vec![code.as_str()]);
    assert_eq!(stored_role.role.description(), "Sample role");

    let stored_empty_role = repository.find_role(&empty_role_name).await;
    assert!(matches!(
        &stored_empty_role,
        Ok(Some(stored)) if stored.role.permission_count() == 0
    ));

    let stored_user = match repository.find_user(&username).await {
        Ok(Some(stored)) => stored,
        other => panic!("committed user should be found, got {other:?}"),
    };
    assert_eq!(stored_user.account.role_name(), role_name);
    assert_eq!(stored_user.account.email().as_str(), format!("{suffix}@sample.test"));
    assert_eq!(stored_user.account.password_hash(), "$argon2id$committed");
    assert!(stored_user.account.is_active());

    let roles_after = repository.count_roles().await;
    let users_after = repository.count_users().await;
    assert!(matches!(
        (roles_before, roles_after),
        (Ok(before), Ok(after)) if after >= before + 2
    ));
    assert!(matches!(
        (users_before, users_after),
        (Ok(before), Ok(after)) if after > before
    ));
}

#[tokio::test]
async fn inactive_flag_survives_read_back() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresAuthorizationSeedRepository::new(pool);
    let suffix = unique_suffix();
    let role = match Role::new(format!("DORMANT_{suffix}"), "Dormant role") {
        Ok(role) => role,
        Err(error) => panic!("role should be valid: {error}"),
    };
    let role_name = role.name().to_owned();
    let email = match EmailAddress::new(format!("dormant_{suffix}@sample.test")) {
        Ok(email) => email,
        Err(error) => panic!("email should be valid: {error}"),
    };
    let username = format!("dormant_{suffix}");
    let account = match UserAccount::new(
        username.as_str(),
        email,
        "$argon2id$dormant",
        "Dormant User",
        role_name.as_str(),
    ) {
        Ok(account) => account.with_is_active(false),
        Err(error) => panic!("account should be valid: {error}"),
    };

    let mut transaction = match repository.begin_seed().await {
        Ok(transaction) => transaction,
        Err(error) => panic!("failed to begin seed: {error}"),
    };
    assert!(transaction.save_role(role).await.is_ok());
    assert!(transaction.save_user(account).await.is_ok());
    assert!(transaction.commit().await.is_ok());

    let stored_user = repository.find_user(&username).await;
    assert!(matches!(
        &stored_user,
        Ok(Some(stored)) if !stored.account.is_active() && stored.account.role_name() == role_name
    ));
}
