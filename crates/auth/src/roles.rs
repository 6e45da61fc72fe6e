use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for the hierarchical capability checks.
///
/// The vocabulary is small and fixed (see the associated constants); matching
/// is case-sensitive exact string comparison, so `"super_admin"` is *not*
/// [`Role::SUPER_ADMIN`]. Unknown role strings pass through untouched and
/// simply never match a known constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Platform-wide administrator; dominates every lower-scope check.
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("SUPER_ADMIN"));

    /// Administrator of a single customer and everything under it.
    pub const CUSTOMER_ADMIN: Role = Role(Cow::Borrowed("CUSTOMER_ADMIN"));

    /// Administrator of a single tenant and its resources.
    pub const TENANT_ADMIN: Role = Role(Cow::Borrowed("TENANT_ADMIN"));

    /// Ordinary member with no implied lower-scope access.
    pub const USER: Role = Role(Cow::Borrowed("USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
