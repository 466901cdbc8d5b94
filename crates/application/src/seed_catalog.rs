//! Declarative tables describing the initial authorization graph.

/// One permission row of the seed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionSeed {
    /// Unique dotted code, e.g. `inventory.read`.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Uppercase category tag.
    pub category: &'static str,
}

/// Permissions a seeded role receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrants {
    /// Every permission of the catalog, whatever its size.
    All,
    /// Listed codes. Codes missing from the catalog are skipped.
    Codes(&'static [&'static str]),
}

/// One role row of the seed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSeed {
    /// Unique role name.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Granted permissions.
    pub grants: RoleGrants,
}

/// One demo identity of the seed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSeed {
    /// Unique login name.
    pub username: &'static str,
    /// Unique email address.
    pub email: &'static str,
    /// Plaintext credential, hashed before it is stored.
    pub password: &'static str,
    /// Display name.
    pub full_name: &'static str,
    /// Name of the bound role.
    pub role: &'static str,
}

/// Role grant that names a code absent from the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedGrant {
    /// Role declaring the grant.
    pub role: &'static str,
    /// Unknown permission code.
    pub code: &'static str,
}

/// Complete set of seed tables for one bootstrap pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCatalog {
    /// Permission rows, persisted in table order.
    pub permissions: &'static [PermissionSeed],
    /// Role rows, persisted in table order after all permissions.
    pub roles: &'static [RoleSeed],
    /// User rows, persisted in table order after all roles.
    pub users: &'static [UserSeed],
}

impl SeedCatalog {
    /// Returns the built-in supply-chain tables.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            permissions: standard::PERMISSIONS,
            roles: standard::ROLES,
            users: standard::USERS,
        }
    }
}

impl Default for SeedCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

mod standard;
mod validation;

#[cfg(test)]
mod tests;
