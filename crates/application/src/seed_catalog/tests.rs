use std::collections::HashSet;

use stockchain_core::AppError;
use stockchain_domain::PermissionCode;

use super::{PermissionSeed, RoleGrants, RoleSeed, SeedCatalog, UnresolvedGrant, UserSeed};

const DRIFTED_PERMISSIONS: &[PermissionSeed] = &[PermissionSeed {
    code: "inventory.read",
    name: "View Inventory",
    description: "Allows viewing inventory",
    category: "INVENTORY",
}];

const DRIFTED_ROLES: &[RoleSeed] = &[RoleSeed {
    name: "VIEWER",
    description: "Viewer",
    grants: RoleGrants::Codes(&["inventory.read", "reports.read", "transfers.read"]),
}];

const BROKEN_PERMISSIONS: &[PermissionSeed] = &[
    PermissionSeed {
        code: "audit.read",
        name: "View Audit Logs",
        description: "",
        category: "AUDIT",
    },
    PermissionSeed {
        code: "audit.read",
        name: "View Audit Logs Again",
        description: "",
        category: "audit",
    },
];

const BROKEN_USERS: &[UserSeed] = &[
    UserSeed {
        username: "ghost",
        email: "ghost@company.com",
        password: "ghost123",
        full_name: "Ghost",
        role: "PHANTOM",
    },
    UserSeed {
        username: "ghost",
        email: "GHOST@company.com",
        password: "ghost123",
        full_name: "Ghost Twin",
        role: "SPECTRE",
    },
];

#[test]
fn standard_catalog_is_valid() {
    assert!(SeedCatalog::standard().validate().is_ok());
    assert_eq!(SeedCatalog::default(), SeedCatalog::standard());
}

#[test]
fn standard_permissions_have_unique_codes_grouped_by_namespace() {
    let catalog = SeedCatalog::standard();
    let mut codes = HashSet::new();

    for seed in catalog.permissions {
        assert!(codes.insert(seed.code), "duplicate code '{}'", seed.code);
        let code = PermissionCode::new(seed.code);
        assert!(
            matches!(code, Ok(ref code) if code.namespace().to_uppercase() == seed.category),
            "code '{}' does not match category '{}'",
            seed.code,
            seed.category
        );
    }

    assert_eq!(codes.len(), 27);
}

#[test]
fn standard_role_grants_all_resolve() {
    let catalog = SeedCatalog::standard();
    assert!(catalog.unresolved_grants().is_empty());

    let names: Vec<&str> = catalog.roles.iter().map(|seed| seed.name).collect();
    assert_eq!(
        names,
        vec!["ADMIN", "MANAGER", "WAREHOUSE_CLERK", "AUDITOR", "VIEWER"]
    );
    assert!(matches!(catalog.roles[0].grants, RoleGrants::All));
}

#[test]
fn standard_users_bind_to_declared_roles() {
    let catalog = SeedCatalog::standard();
    let bindings: Vec<(&str, &str)> = catalog
        .users
        .iter()
        .map(|seed| (seed.username, seed.role))
        .collect();

    assert_eq!(
        bindings,
        vec![
            ("admin", "ADMIN"),
            ("manager", "MANAGER"),
            ("clerk", "WAREHOUSE_CLERK"),
            ("auditor", "AUDITOR"),
            ("viewer", "VIEWER"),
        ]
    );
}

#[test]
fn unresolved_grants_list_missing_codes() {
    let catalog = SeedCatalog {
        permissions: DRIFTED_PERMISSIONS,
        roles: DRIFTED_ROLES,
        users: &[],
    };

    assert!(catalog.validate().is_ok());
    assert_eq!(
        catalog.unresolved_grants(),
        vec![
            UnresolvedGrant {
                role: "VIEWER",
                code: "reports.read",
            },
            UnresolvedGrant {
                role: "VIEWER",
                code: "transfers.read",
            },
        ]
    );
}

#[test]
fn validate_reports_every_problem() {
    let catalog = SeedCatalog {
        permissions: BROKEN_PERMISSIONS,
        roles: &[],
        users: BROKEN_USERS,
    };

    let Err(AppError::Validation(message)) = catalog.validate() else {
        panic!("broken catalog must fail validation");
    };

    assert!(message.contains("duplicate permission code 'audit.read'"));
    assert!(message.contains("permission category 'audit'"));
    assert!(message.contains("duplicate username 'ghost'"));
    assert!(message.contains("duplicate email 'GHOST@company.com'"));
    assert!(message.contains("user 'ghost' references unknown role 'PHANTOM'"));
    assert!(message.contains("user 'ghost' references unknown role 'SPECTRE'"));
}
