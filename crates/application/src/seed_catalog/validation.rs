use std::collections::HashSet;

use stockchain_core::{AppError, AppResult};
use stockchain_domain::{EmailAddress, PermissionCategory, PermissionCode};

use super::{RoleGrants, SeedCatalog, UnresolvedGrant};

impl SeedCatalog {
    /// Checks the tables before any write and reports every problem at once.
    ///
    /// Role grants naming unknown permission codes are accepted here; they
    /// are skipped while roles are assembled. A user bound to a role that is
    /// not in the table is rejected.
    pub fn validate(&self) -> AppResult<()> {
        let mut problems = Vec::new();

        let mut codes = HashSet::new();
        for seed in self.permissions {
            if let Err(error) = PermissionCode::new(seed.code) {
                problems.push(describe(error));
            }
            if let Err(error) = PermissionCategory::new(seed.category) {
                problems.push(describe(error));
            }
            if seed.name.trim().is_empty() {
                problems.push(format!("permission '{}' has an empty name", seed.code));
            }
            if !codes.insert(seed.code) {
                problems.push(format!("duplicate permission code '{}'", seed.code));
            }
        }

        let mut role_names = HashSet::new();
        for seed in self.roles {
            if seed.name.trim().is_empty() {
                problems.push("role name must not be empty".to_owned());
            }
            if !role_names.insert(seed.name) {
                problems.push(format!("duplicate role name '{}'", seed.name));
            }
        }

        let mut usernames = HashSet::new();
        let mut emails = HashSet::new();
        for seed in self.users {
            if !usernames.insert(seed.username) {
                problems.push(format!("duplicate username '{}'", seed.username));
            }
            match EmailAddress::new(seed.email) {
                Ok(email) => {
                    if !emails.insert(String::from(email)) {
                        problems.push(format!("duplicate email '{}'", seed.email));
                    }
                }
                Err(error) => problems.push(format!(
                    "user '{}': {}",
                    seed.username,
                    describe(error)
                )),
            }
            if !role_names.contains(seed.role) {
                problems.push(format!(
                    "user '{}' references unknown role '{}'",
                    seed.username, seed.role
                ));
            }
        }

        if problems.is_empty() {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "seed catalog is invalid: {}",
            problems.join("; ")
        )))
    }

    /// Lists role grants whose code is absent from the permission table.
    #[must_use]
    pub fn unresolved_grants(&self) -> Vec<UnresolvedGrant> {
        let codes: HashSet<&str> = self.permissions.iter().map(|seed| seed.code).collect();

        let mut unresolved = Vec::new();
        for seed in self.roles {
            let RoleGrants::Codes(granted) = seed.grants else {
                continue;
            };

            for &code in granted {
                if !codes.contains(code) {
                    unresolved.push(UnresolvedGrant {
                        role: seed.name,
                        code,
                    });
                }
            }
        }

        unresolved
    }
}

fn describe(error: AppError) -> String {
    match error {
        AppError::Validation(message) => message,
        other => other.to_string(),
    }
}
