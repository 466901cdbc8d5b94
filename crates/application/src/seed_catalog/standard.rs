use super::{PermissionSeed, RoleGrants, RoleSeed, UserSeed};

const fn permission(
    code: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
) -> PermissionSeed {
    PermissionSeed {
        code,
        name,
        description,
        category,
    }
}

pub(super) const PERMISSIONS: &[PermissionSeed] = &[
    // Users
    permission("users.create", "Create Users", "Allows creating new users", "USERS"),
    permission("users.read", "View Users", "Allows viewing user information", "USERS"),
    permission("users.update", "Update Users", "Allows updating user information", "USERS"),
    permission("users.delete", "Delete Users", "Allows deleting users", "USERS"),
    // Transfers
    permission(
        "transfers.create",
        "Create Transfers",
        "Allows creating inventory transfers",
        "TRANSFERS",
    ),
    permission("transfers.read", "View Transfers", "Allows viewing transfers", "TRANSFERS"),
    permission("transfers.update", "Update Transfers", "Allows updating transfers", "TRANSFERS"),
    permission("transfers.delete", "Delete Transfers", "Allows deleting transfers", "TRANSFERS"),
    permission(
        "transfers.approve",
        "Approve Transfers",
        "Allows approving transfers",
        "TRANSFERS",
    ),
    // Inventory
    permission(
        "inventory.create",
        "Create Inventory",
        "Allows adding inventory items",
        "INVENTORY",
    ),
    permission("inventory.read", "View Inventory", "Allows viewing inventory", "INVENTORY"),
    permission("inventory.update", "Update Inventory", "Allows updating inventory", "INVENTORY"),
    permission(
        "inventory.delete",
        "Delete Inventory",
        "Allows deleting inventory items",
        "INVENTORY",
    ),
    // Reports
    permission("reports.read", "View Reports", "Allows viewing reports", "REPORTS"),
    permission("reports.export", "Export Reports", "Allows exporting reports", "REPORTS"),
    // Audit
    permission("audit.read", "View Audit Logs", "Allows viewing audit logs", "AUDIT"),
    // Settings
    permission("settings.read", "View Settings", "Allows viewing system settings", "SETTINGS"),
    permission(
        "settings.update",
        "Update Settings",
        "Allows updating system settings",
        "SETTINGS",
    ),
    // Suppliers
    permission("suppliers.create", "Create Suppliers", "Allows creating suppliers", "SUPPLIERS"),
    permission("suppliers.read", "View Suppliers", "Allows viewing suppliers", "SUPPLIERS"),
    permission("suppliers.update", "Update Suppliers", "Allows updating suppliers", "SUPPLIERS"),
    permission("suppliers.delete", "Delete Suppliers", "Allows deleting suppliers", "SUPPLIERS"),
    // Analytics
    permission(
        "analytics.read",
        "View Analytics",
        "Allows viewing analytics dashboard",
        "ANALYTICS",
    ),
    // Documents
    permission("documents.create", "Create Documents", "Allows uploading documents", "DOCUMENTS"),
    permission("documents.read", "View Documents", "Allows viewing documents", "DOCUMENTS"),
    permission("documents.update", "Update Documents", "Allows updating documents", "DOCUMENTS"),
    permission("documents.delete", "Delete Documents", "Allows deleting documents", "DOCUMENTS"),
];

pub(super) const ROLES: &[RoleSeed] = &[
    RoleSeed {
        name: "ADMIN",
        description: "Full system administrator with all permissions",
        grants: RoleGrants::All,
    },
    RoleSeed {
        name: "MANAGER",
        description: "Operations manager with inventory and transfer management",
        grants: RoleGrants::Codes(&[
            "transfers.create",
            "transfers.read",
            "transfers.update",
            "transfers.approve",
            "inventory.create",
            "inventory.read",
            "inventory.update",
            "reports.read",
            "reports.export",
            "suppliers.create",
            "suppliers.read",
            "suppliers.update",
            "analytics.read",
            "documents.create",
            "documents.read",
            "documents.update",
            "audit.read",
        ]),
    },
    RoleSeed {
        name: "WAREHOUSE_CLERK",
        description: "Warehouse staff handling daily inventory operations",
        grants: RoleGrants::Codes(&[
            "transfers.create",
            "transfers.read",
            "transfers.update",
            "inventory.read",
            "inventory.update",
            "suppliers.read",
            "documents.read",
            "documents.create",
        ]),
    },
    RoleSeed {
        name: "AUDITOR",
        description: "Auditor with read-only access to all records",
        grants: RoleGrants::Codes(&[
            "transfers.read",
            "inventory.read",
            "reports.read",
            "reports.export",
            "suppliers.read",
            "analytics.read",
            "documents.read",
            "audit.read",
            "users.read",
        ]),
    },
    RoleSeed {
        name: "VIEWER",
        description: "Basic viewer with minimal read permissions",
        grants: RoleGrants::Codes(&["inventory.read", "transfers.read", "reports.read"]),
    },
];

pub(super) const USERS: &[UserSeed] = &[
    UserSeed {
        username: "admin",
        email: "admin@company.com",
        password: "admin123",
        full_name: "System Administrator",
        role: "ADMIN",
    },
    UserSeed {
        username: "manager",
        email: "manager@company.com",
        password: "manager123",
        full_name: "Operations Manager",
        role: "MANAGER",
    },
    UserSeed {
        username: "clerk",
        email: "clerk@company.com",
        password: "clerk123",
        full_name: "Warehouse Clerk",
        role: "WAREHOUSE_CLERK",
    },
    UserSeed {
        username: "auditor",
        email: "auditor@company.com",
        password: "auditor123",
        full_name: "External Auditor",
        role: "AUDITOR",
    },
    UserSeed {
        username: "viewer",
        email: "viewer@company.com",
        password: "viewer123",
        full_name: "Report Viewer",
        role: "VIEWER",
    },
];
