use std::collections::BTreeMap;

use stockchain_core::{AppError, AppResult};
use stockchain_domain::{EmailAddress, UserAccount};
use tracing::info;

use super::AuthorizationSeedService;
use crate::{SeedTransaction, StoredRole, StoredUser};

impl AuthorizationSeedService {
    /// Provisions the demo identities, each bound to one role from `roles`.
    ///
    /// A user whose role is missing from `roles` fails the pass instead of
    /// being stored without a role.
    pub async fn build_users(
        &self,
        transaction: &mut dyn SeedTransaction,
        roles: &BTreeMap<String, StoredRole>,
    ) -> AppResult<Vec<StoredUser>> {
        info!("creating demo users");
        let mut users = Vec::with_capacity(self.catalog.users.len());

        for seed in self.catalog.users {
            let Some(role) = roles.get(seed.role) else {
                return Err(AppError::Validation(format!(
                    "user '{}' references unknown role '{}'",
                    seed.username, seed.role
                )));
            };

            let password_hash = self.password_hasher.hash_password(seed.password)?;
            let account = UserAccount::new(
                seed.username,
                EmailAddress::new(seed.email)?,
                password_hash,
                seed.full_name,
                role.role.name(),
            )?;

            users.push(transaction.save_user(account).await?);
        }

        info!(count = users.len(), "created demo users");
        Ok(users)
    }
}
