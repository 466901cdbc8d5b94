//! Authorization catalog entities: permissions and the roles that aggregate them.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use stockchain_core::{AppError, AppResult, NonEmptyString};

/// Dotted permission identifier such as `inventory.read`.
///
/// A code has at least two `.`-separated segments. Every segment starts
/// with an ASCII lowercase letter and contains only lowercase letters,
/// digits and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Creates a validated permission code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if !value.contains('.') {
            return Err(AppError::Validation(format!(
                "permission code '{value}' must use the 'namespace.action' form"
            )));
        }

        if let Some(segment) = value
            .split('.')
            .find(|segment| !is_valid_code_segment(segment))
        {
            return Err(AppError::Validation(format!(
                "permission code '{value}' has an invalid segment '{segment}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the resource namespace, e.g. `inventory` for `inventory.read`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0
            .split_once('.')
            .map_or(self.0.as_str(), |(namespace, _)| namespace)
    }

    /// Returns the action, e.g. `read` for `inventory.read`.
    #[must_use]
    pub fn action(&self) -> &str {
        self.0
            .rsplit_once('.')
            .map_or(self.0.as_str(), |(_, action)| action)
    }
}

fn is_valid_code_segment(segment: &str) -> bool {
    let mut characters = segment.chars();
    matches!(characters.next(), Some(first) if first.is_ascii_lowercase())
        && characters.all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
        })
}

impl TryFrom<String> for PermissionCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionCode> for String {
    fn from(value: PermissionCode) -> Self {
        value.0
    }
}

impl Borrow<str> for PermissionCode {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PermissionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Uppercase grouping tag for permissions, e.g. `INVENTORY`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCategory(String);

impl PermissionCategory {
    /// Creates a validated category tag.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let mut characters = value.chars();
        let is_valid = matches!(characters.next(), Some(first) if first.is_ascii_uppercase())
            && characters.all(|character| {
                character.is_ascii_uppercase() || character.is_ascii_digit() || character == '_'
            });

        if !is_valid {
            return Err(AppError::Validation(format!(
                "permission category '{value}' must be an uppercase tag"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionCategory {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionCategory> for String {
    fn from(value: PermissionCategory) -> Self {
        value.0
    }
}

/// Atomic grant of capability over a resource category.
///
/// Identity is the [`PermissionCode`]. Permissions are immutable once
/// created; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    code: PermissionCode,
    name: NonEmptyString,
    description: String,
    category: PermissionCategory,
}

impl Permission {
    /// Creates a permission definition.
    pub fn new(
        code: PermissionCode,
        name: impl Into<String>,
        description: impl Into<String>,
        category: PermissionCategory,
    ) -> AppResult<Self> {
        Ok(Self {
            code,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            category,
        })
    }

    /// Returns the unique permission code.
    #[must_use]
    pub fn code(&self) -> &PermissionCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the category tag.
    #[must_use]
    pub fn category(&self) -> &PermissionCategory {
        &self.category
    }
}

/// Named aggregation of permissions.
///
/// The permission collection has set semantics: granting the same
/// permission twice leaves a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: NonEmptyString,
    description: String,
    permissions: BTreeSet<PermissionCode>,
}

impl Role {
    /// Creates a role without any permissions.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            description: description.into(),
            permissions: BTreeSet::new(),
        })
    }

    /// Rebuilds a role from already persisted permission codes.
    pub fn with_permissions(
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionCode>,
    ) -> AppResult<Self> {
        let mut role = Self::new(name, description)?;
        role.permissions.extend(permissions);
        Ok(role)
    }

    /// Adds a permission. Returns `false` when the role already held it.
    pub fn grant(&mut self, permission: &Permission) -> bool {
        self.permissions.insert(permission.code().clone())
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns granted permission codes in code order.
    pub fn permissions(&self) -> impl Iterator<Item = &PermissionCode> {
        self.permissions.iter()
    }

    /// Returns the number of distinct granted permissions.
    #[must_use]
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }

    /// Returns whether the role holds the given permission code.
    #[must_use]
    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }
}
