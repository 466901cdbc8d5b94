use std::collections::BTreeMap;

use stockchain_core::{AppError, AppResult};
use stockchain_domain::{Permission, PermissionCategory, PermissionCode};
use tracing::{debug, info};

use super::AuthorizationSeedService;
use crate::{SeedTransaction, StoredPermission};

impl AuthorizationSeedService {
    /// Persists every permission of the table and returns them keyed by code.
    pub async fn build_catalog(
        &self,
        transaction: &mut dyn SeedTransaction,
    ) -> AppResult<BTreeMap<String, StoredPermission>> {
        info!("creating permissions");
        let mut catalog = BTreeMap::new();

        for seed in self.catalog.permissions {
            let permission = Permission::new(
                PermissionCode::new(seed.code)?,
                seed.name,
                seed.description,
                PermissionCategory::new(seed.category)?,
            )?;

            let stored = transaction.save_permission(permission).await?;
            debug!(
                namespace = stored.permission.code().namespace(),
                action = stored.permission.code().action(),
                "created permission"
            );
            let code = stored.permission.code().as_str().to_owned();
            if catalog.insert(code, stored).is_some() {
                return Err(AppError::Conflict(format!(
                    "permission '{}' is declared twice",
                    seed.code
                )));
            }
        }

        info!(count = catalog.len(), "created permissions");
        Ok(catalog)
    }
}
