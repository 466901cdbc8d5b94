use std::collections::BTreeMap;

use chrono::Utc;
use stockchain_core::AppResult;
use tracing::{error, info, warn};

use super::{AuthorizationSeedService, SeedOutcome, SeedSummary};
use crate::SeedTransaction;

struct SeededGraph {
    permission_count: usize,
    role_permission_counts: BTreeMap<String, usize>,
    user_count: usize,
}

impl AuthorizationSeedService {
    /// Runs one seeding pass.
    ///
    /// The idempotency gate counts permissions inside the seed transaction.
    /// A non-zero count ends the pass without writes, whatever the tables
    /// hold. Otherwise the tables are validated, then permissions, roles and
    /// users are created and committed together; on failure the transaction
    /// is rolled back and the error is returned.
    pub async fn run(&self) -> AppResult<SeedOutcome> {
        let mut transaction = self.repository.begin_seed().await?;

        let existing_permissions = match transaction.count_permissions().await {
            Ok(count) => count,
            Err(error) => {
                rollback_after_failure(transaction.as_mut()).await;
                return Err(error);
            }
        };

        if existing_permissions > 0 {
            transaction.rollback().await?;
            info!(
                existing_permissions,
                "authorization data already initialized, skipping seed"
            );
            return Ok(SeedOutcome::Skipped {
                existing_permissions,
            });
        }

        if let Err(validation_error) = self.catalog.validate() {
            rollback_after_failure(transaction.as_mut()).await;
            return Err(validation_error);
        }
        for unresolved in self.catalog.unresolved_grants() {
            warn!(
                role = unresolved.role,
                permission = unresolved.code,
                "skipping grant of permission missing from the catalog"
            );
        }

        info!("starting authorization seed");
        let graph = match self.seed_graph(transaction.as_mut()).await {
            Ok(graph) => graph,
            Err(seed_error) => {
                rollback_after_failure(transaction.as_mut()).await;
                error!(error = %seed_error, "authorization seed failed and was rolled back");
                return Err(seed_error);
            }
        };

        transaction.commit().await?;
        let summary = SeedSummary {
            permission_count: graph.permission_count,
            role_permission_counts: graph.role_permission_counts,
            user_count: graph.user_count,
            completed_at: Utc::now(),
        };

        info!(
            permissions = summary.permission_count,
            roles = summary.role_permission_counts.len(),
            users = summary.user_count,
            "authorization seed completed"
        );

        Ok(SeedOutcome::Completed(summary))
    }

    async fn seed_graph(&self, transaction: &mut dyn SeedTransaction) -> AppResult<SeededGraph> {
        let permissions = self.build_catalog(transaction).await?;
        let roles = self.build_roles(transaction, &permissions).await?;
        let users = self.build_users(transaction, &roles).await?;

        Ok(SeededGraph {
            permission_count: permissions.len(),
            role_permission_counts: roles
                .iter()
                .map(|(name, stored)| (name.clone(), stored.role.permission_count()))
                .collect(),
            user_count: users.len(),
        })
    }
}

async fn rollback_after_failure(transaction: &mut dyn SeedTransaction) {
    if let Err(rollback_error) = transaction.rollback().await {
        warn!(error = %rollback_error, "failed to roll back authorization seed");
    }
}
