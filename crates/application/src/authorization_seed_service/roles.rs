use std::collections::BTreeMap;

use stockchain_core::AppResult;
use stockchain_domain::Role;
use tracing::info;

use super::AuthorizationSeedService;
use crate::{RoleGrants, SeedTransaction, StoredPermission, StoredRole};

impl AuthorizationSeedService {
    /// Assembles and persists every role of the table, keyed by name.
    ///
    /// Granted codes are looked up in `catalog`; a code that is not there is
    /// skipped; `run` reports those up front. Each role is written once,
    /// after its permission set is final.
    pub async fn build_roles(
        &self,
        transaction: &mut dyn SeedTransaction,
        catalog: &BTreeMap<String, StoredPermission>,
    ) -> AppResult<BTreeMap<String, StoredRole>> {
        info!("creating roles");
        let mut roles = BTreeMap::new();

        for seed in self.catalog.roles {
            let mut role = Role::new(seed.name, seed.description)?;

            match seed.grants {
                RoleGrants::All => {
                    for stored in catalog.values() {
                        role.grant(&stored.permission);
                    }
                }
                RoleGrants::Codes(codes) => {
                    for stored in codes.iter().filter_map(|&code| catalog.get(code)) {
                        role.grant(&stored.permission);
                    }
                }
            }

            let stored = transaction.save_role(role).await?;
            info!(
                role = stored.role.name(),
                permissions = stored.role.permission_count(),
                "created role"
            );
            roles.insert(seed.name.to_owned(), stored);
        }

        Ok(roles)
    }
}
