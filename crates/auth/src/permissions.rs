use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier for resource-level grants.
///
/// Permissions are independent of roles: holding `WRITE` on a resource says
/// nothing about roles at any scope, and vice versa. Matching is
/// case-sensitive exact string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const READ: Permission = Permission(Cow::Borrowed("READ"));
    pub const WRITE: Permission = Permission(Cow::Borrowed("WRITE"));
    pub const DELETE: Permission = Permission(Cow::Borrowed("DELETE"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
