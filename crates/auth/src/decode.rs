//! Trust-boundary decoding of directory payloads.
//!
//! The directory API returns loosely-shaped grant arrays (fields may be
//! absent, blank, or duplicated). They are parsed into the typed [`Principal`]
//! exactly once, here, so the resolver can assume well-formed input and stay
//! a set of total, pure functions.
//!
//! Decoding is fail-closed, never fail-open: a grant whose scope ids cannot
//! be canonicalized is dropped, which can only ever *reduce* access.

use serde::Deserialize;
use uuid::Uuid;

use scopegate_core::{CustomerId, ResourceId, TenantId};

use crate::principal::{CustomerGrant, PlatformGrant, ResourceGrant, TenantGrant};
use crate::{Permission, Principal, PrincipalId, Role};

/// Wire shape of a principal as the directory supplies it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDoc {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub platform_grants: Vec<PlatformGrantDoc>,
    #[serde(default)]
    pub customer_grants: Vec<CustomerGrantDoc>,
    #[serde(default)]
    pub tenant_grants: Vec<TenantGrantDoc>,
    #[serde(default)]
    pub resource_grants: Vec<ResourceGrantDoc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformGrantDoc {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGrantDoc {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantGrantDoc {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGrantDoc {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Decode a directory payload into a typed, immutable [`Principal`].
///
/// - All `platformGrants` entries collapse into the one conceptual
///   platform-level grant (role union, first occurrence order).
/// - Duplicate `customerGrants` for the same id collapse first-wins.
/// - Grants with missing or blank scope ids are dropped.
pub fn decode_principal(doc: PrincipalDoc) -> Principal {
    let mut platform_roles: Vec<Role> = Vec::new();
    for grant in doc.platform_grants {
        for role in grant.roles {
            let role = Role::new(role);
            if !platform_roles.contains(&role) {
                platform_roles.push(role);
            }
        }
    }

    let mut customer_grants: Vec<CustomerGrant> = Vec::new();
    for grant in doc.customer_grants {
        let Some(customer_id) = canonical_customer(grant.customer_id.as_deref()) else {
            continue;
        };
        if customer_grants.iter().any(|g| g.customer_id == customer_id) {
            tracing::debug!(customer = %customer_id, "duplicate customer grant dropped (first wins)");
            continue;
        }
        customer_grants.push(CustomerGrant {
            customer_id,
            roles: grant.roles.into_iter().map(Role::new).collect(),
        });
    }

    let mut tenant_grants: Vec<TenantGrant> = Vec::new();
    for grant in doc.tenant_grants {
        let (Some(customer_id), Some(tenant_id)) = (
            canonical_customer(grant.customer_id.as_deref()),
            canonical_tenant(grant.tenant_id.as_deref()),
        ) else {
            continue;
        };
        tenant_grants.push(TenantGrant {
            customer_id,
            tenant_id,
            roles: grant.roles.into_iter().map(Role::new).collect(),
        });
    }

    let mut resource_grants: Vec<ResourceGrant> = Vec::new();
    for grant in doc.resource_grants {
        let (Some(customer_id), Some(tenant_id), Some(resource_id)) = (
            canonical_customer(grant.customer_id.as_deref()),
            canonical_tenant(grant.tenant_id.as_deref()),
            grant.resource_id.as_deref().and_then(|s| ResourceId::new(s).ok()),
        ) else {
            continue;
        };
        resource_grants.push(ResourceGrant {
            customer_id,
            tenant_id,
            resource_id,
            permissions: grant.permissions.into_iter().map(Permission::new).collect(),
        });
    }

    Principal {
        id: PrincipalId::from_uuid(doc.id),
        display_name: doc.display_name,
        is_active: doc.is_active,
        platform_grant: PlatformGrant {
            roles: platform_roles,
        },
        customer_grants,
        tenant_grants,
        resource_grants,
    }
}

fn canonical_customer(raw: Option<&str>) -> Option<CustomerId> {
    raw.and_then(|s| CustomerId::new(s).ok())
}

fn canonical_tenant(raw: Option<&str>) -> Option<TenantId> {
    raw.and_then(|s| TenantId::new(s).ok())
}
