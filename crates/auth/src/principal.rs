use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scopegate_core::{CustomerId, ResourceId, TenantId};

use crate::{Permission, Role};

/// Identity of an authenticated principal (human operator, service account).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<PrincipalId> for Uuid {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The single conceptual platform-level grant (customer scope absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformGrant {
    pub roles: Vec<Role>,
}

/// Roles granted within one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerGrant {
    pub customer_id: CustomerId,
    pub roles: Vec<Role>,
}

/// Roles granted within one tenant, keyed by the (customer, tenant) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantGrant {
    pub customer_id: CustomerId,
    pub tenant_id: TenantId,
    pub roles: Vec<Role>,
}

/// Permissions granted on one resource, keyed by the full triple.
///
/// Permissions here are independent of any role at any scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGrant {
    pub customer_id: CustomerId,
    pub tenant_id: TenantId,
    pub resource_id: ResourceId,
    pub permissions: Vec<Permission>,
}

/// A fully resolved principal: the authenticated actor and its grant set.
///
/// # Invariants
/// - Immutable once resolved for a session; a new sign-in produces a new
///   `Principal`, never a mutation of the old one.
/// - `customer_grants` is unique per customer id; when the source payload
///   carries duplicates, decoding keeps the first by scan order.
/// - A principal with no grants fails every capability check (fail-closed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub display_name: String,
    pub is_active: bool,
    pub platform_grant: PlatformGrant,
    pub customer_grants: Vec<CustomerGrant>,
    pub tenant_grants: Vec<TenantGrant>,
    pub resource_grants: Vec<ResourceGrant>,
}

impl Principal {
    /// A principal with no grants at any scope.
    pub fn new(id: PrincipalId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_active: true,
            platform_grant: PlatformGrant::default(),
            customer_grants: Vec::new(),
            tenant_grants: Vec::new(),
            resource_grants: Vec::new(),
        }
    }

    pub fn with_platform_roles(mut self, roles: Vec<Role>) -> Self {
        self.platform_grant = PlatformGrant { roles };
        self
    }

    pub fn with_customer_grant(mut self, customer_id: CustomerId, roles: Vec<Role>) -> Self {
        self.customer_grants.push(CustomerGrant { customer_id, roles });
        self
    }

    pub fn with_tenant_grant(
        mut self,
        customer_id: CustomerId,
        tenant_id: TenantId,
        roles: Vec<Role>,
    ) -> Self {
        self.tenant_grants.push(TenantGrant {
            customer_id,
            tenant_id,
            roles,
        });
        self
    }

    pub fn with_resource_grant(
        mut self,
        customer_id: CustomerId,
        tenant_id: TenantId,
        resource_id: ResourceId,
        permissions: Vec<Permission>,
    ) -> Self {
        self.resource_grants.push(ResourceGrant {
            customer_id,
            tenant_id,
            resource_id,
            permissions,
        });
        self
    }
}
