//! Strongly-typed scope identifiers.
//!
//! Customer, tenant and resource ids arrive from external directories in a
//! variety of representations; they are canonicalized to a trimmed string
//! exactly once at construction, so two representations of the same
//! identifier always compare equal. Construction rejects blank input —
//! downstream code never sees an empty id.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a customer (top-level tenancy boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

/// Identifier of a tenant, nested under a customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

/// Identifier of a resource (VMF), the finest-grained grant target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

macro_rules! impl_scope_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Canonicalize and validate an identifier.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
                let canonical = raw.as_ref().trim();
                if canonical.is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": blank")));
                }
                Ok(Self(canonical.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_scope_id!(CustomerId, "CustomerId");
impl_scope_id!(TenantId, "TenantId");
impl_scope_id!(ResourceId, "ResourceId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_canonicalized_before_comparison() {
        let a = CustomerId::new("cust-7").unwrap();
        let b = CustomerId::new("  cust-7 ").unwrap();
        assert_eq!(a, b);
        assert_eq!(b.as_str(), "cust-7");
    }

    #[test]
    fn blank_id_is_rejected() {
        let err = TenantId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn serde_round_trip_uses_canonical_form() {
        let id: ResourceId = serde_json::from_str("\" vmf-1 \"").unwrap();
        assert_eq!(id.as_str(), "vmf-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"vmf-1\"");
    }

    #[test]
    fn blank_id_fails_deserialization() {
        let res: Result<CustomerId, _> = serde_json::from_str("\"\"");
        assert!(res.is_err());
    }
}
