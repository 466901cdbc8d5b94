//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod security;
mod user;

pub use security::{Permission, PermissionCategory, PermissionCode, Role};
pub use user::{EmailAddress, UserAccount, UserId};
