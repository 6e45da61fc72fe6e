//! Pure access resolver over a [`Principal`]'s grant set.
//!
//! Every operation here is a total function: absent principals and unknown
//! scope ids yield `false` or an empty set, never an error. Callers pass
//! `Option`s straight through without null-checking.
//!
//! # Precedence chain
//!
//! Higher scopes always imply lower-scope *access*; a lower-scope grant alone
//! never implies a higher one. The full order, applied one level deeper at
//! each step:
//!
//! 1. `SUPER_ADMIN` at platform scope → access to every customer, tenant and
//!    resource.
//! 2. `CUSTOMER_ADMIN` at a customer → access to every tenant and resource
//!    under that customer.
//! 3. `TENANT_ADMIN` at a tenant → access to every resource under that tenant.
//! 4. A direct grant at the exact scope.
//!
//! This order is encoded *only* in [`has_customer_access`],
//! [`has_tenant_access`] and [`has_resource_access`]; nothing else re-derives
//! it. Role *listing* operations (`customer_roles` etc.) report direct grants
//! at the named scope and do not inherit from above.

use std::collections::HashSet;

use scopegate_core::{CustomerId, ResourceId, TenantId};

use crate::principal::{CustomerGrant, ResourceGrant, TenantGrant};
use crate::{Permission, Principal, Role};

/// Roles held at platform scope. Returns a fresh set; callers may mutate it
/// without touching principal internals.
pub fn platform_roles(principal: Option<&Principal>) -> HashSet<Role> {
    principal
        .map(|p| p.platform_grant.roles.iter().cloned().collect())
        .unwrap_or_default()
}

pub fn has_platform_role(principal: Option<&Principal>, role: &Role) -> bool {
    principal.is_some_and(|p| p.platform_grant.roles.contains(role))
}

pub fn is_super_admin(principal: Option<&Principal>) -> bool {
    has_platform_role(principal, &Role::SUPER_ADMIN)
}

// First match by scan order wins when the source data carried duplicate
// customer grants (decoding already collapses them, this keeps the resolver
// safe regardless).
fn customer_grant<'a>(principal: &'a Principal, customer_id: &CustomerId) -> Option<&'a CustomerGrant> {
    principal
        .customer_grants
        .iter()
        .find(|g| g.customer_id == *customer_id)
}

fn tenant_grant<'a>(
    principal: &'a Principal,
    customer_id: &CustomerId,
    tenant_id: &TenantId,
) -> Option<&'a TenantGrant> {
    principal
        .tenant_grants
        .iter()
        .find(|g| g.customer_id == *customer_id && g.tenant_id == *tenant_id)
}

fn resource_grant<'a>(
    principal: &'a Principal,
    customer_id: &CustomerId,
    tenant_id: &TenantId,
    resource_id: &ResourceId,
) -> Option<&'a ResourceGrant> {
    principal.resource_grants.iter().find(|g| {
        g.customer_id == *customer_id
            && g.tenant_id == *tenant_id
            && g.resource_id == *resource_id
    })
}

/// Roles granted directly within the given customer (no inheritance).
pub fn customer_roles(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
) -> HashSet<Role> {
    match (principal, customer_id) {
        (Some(p), Some(c)) => customer_grant(p, c)
            .map(|g| g.roles.iter().cloned().collect())
            .unwrap_or_default(),
        _ => HashSet::new(),
    }
}

pub fn has_customer_role(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    role: &Role,
) -> bool {
    match (principal, customer_id) {
        (Some(p), Some(c)) => customer_grant(p, c).is_some_and(|g| g.roles.contains(role)),
        _ => false,
    }
}

/// Level 1 of the precedence chain: super admin, or any direct customer grant.
pub fn has_customer_access(principal: Option<&Principal>, customer_id: Option<&CustomerId>) -> bool {
    if is_super_admin(principal) {
        return true;
    }
    match (principal, customer_id) {
        (Some(p), Some(c)) => customer_grant(p, c).is_some(),
        _ => false,
    }
}

/// Roles granted directly within the given tenant (no inheritance).
pub fn tenant_roles(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
) -> HashSet<Role> {
    match (principal, customer_id, tenant_id) {
        (Some(p), Some(c), Some(t)) => tenant_grant(p, c, t)
            .map(|g| g.roles.iter().cloned().collect())
            .unwrap_or_default(),
        _ => HashSet::new(),
    }
}

pub fn has_tenant_role(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
    role: &Role,
) -> bool {
    match (principal, customer_id, tenant_id) {
        (Some(p), Some(c), Some(t)) => tenant_grant(p, c, t).is_some_and(|g| g.roles.contains(role)),
        _ => false,
    }
}

/// Level 2 of the precedence chain: super admin, customer admin at the
/// enclosing customer, or any direct tenant grant.
pub fn has_tenant_access(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
) -> bool {
    if is_super_admin(principal) {
        return true;
    }
    if has_customer_role(principal, customer_id, &Role::CUSTOMER_ADMIN) {
        return true;
    }
    match (principal, customer_id, tenant_id) {
        (Some(p), Some(c), Some(t)) => tenant_grant(p, c, t).is_some(),
        _ => false,
    }
}

/// Permissions granted directly on the given resource (no inheritance;
/// permissions are independent of roles).
pub fn resource_permissions(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
    resource_id: Option<&ResourceId>,
) -> HashSet<Permission> {
    match (principal, customer_id, tenant_id, resource_id) {
        (Some(p), Some(c), Some(t), Some(r)) => resource_grant(p, c, t, r)
            .map(|g| g.permissions.iter().cloned().collect())
            .unwrap_or_default(),
        _ => HashSet::new(),
    }
}

pub fn has_resource_permission(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
    resource_id: Option<&ResourceId>,
    permission: &Permission,
) -> bool {
    match (principal, customer_id, tenant_id, resource_id) {
        (Some(p), Some(c), Some(t), Some(r)) => {
            resource_grant(p, c, t, r).is_some_and(|g| g.permissions.contains(permission))
        }
        _ => false,
    }
}

/// Level 3 of the precedence chain: super admin, customer admin, tenant admin
/// at the enclosing tenant, or any direct resource grant.
pub fn has_resource_access(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
    tenant_id: Option<&TenantId>,
    resource_id: Option<&ResourceId>,
) -> bool {
    if is_super_admin(principal) {
        return true;
    }
    if has_customer_role(principal, customer_id, &Role::CUSTOMER_ADMIN) {
        return true;
    }
    if has_tenant_role(principal, customer_id, tenant_id, &Role::TENANT_ADMIN) {
        return true;
    }
    match (principal, customer_id, tenant_id, resource_id) {
        (Some(p), Some(c), Some(t), Some(r)) => resource_grant(p, c, t, r).is_some(),
        _ => false,
    }
}

/// Customer ids the principal holds a *direct* grant for, in stored order.
///
/// Super admins do not get "all customers" here: enumerating every customer
/// requires a directory lookup and belongs to the caller, not the resolver.
pub fn accessible_customer_ids(principal: Option<&Principal>) -> Vec<CustomerId> {
    let Some(p) = principal else {
        return Vec::new();
    };

    let mut seen: HashSet<&CustomerId> = HashSet::new();
    p.customer_grants
        .iter()
        .filter(|g| seen.insert(&g.customer_id))
        .map(|g| g.customer_id.clone())
        .collect()
}

/// Tenant ids with a direct grant under the given customer, in stored order.
pub fn accessible_tenant_ids(
    principal: Option<&Principal>,
    customer_id: Option<&CustomerId>,
) -> Vec<TenantId> {
    let (Some(p), Some(c)) = (principal, customer_id) else {
        return Vec::new();
    };

    let mut seen: HashSet<&TenantId> = HashSet::new();
    p.tenant_grants
        .iter()
        .filter(|g| g.customer_id == *c)
        .filter(|g| seen.insert(&g.tenant_id))
        .map(|g| g.tenant_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrincipalId;
    use proptest::prelude::*;

    fn cid(s: &str) -> CustomerId {
        CustomerId::new(s).unwrap()
    }

    fn tid(s: &str) -> TenantId {
        TenantId::new(s).unwrap()
    }

    fn rid(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn principal() -> Principal {
        Principal::new(PrincipalId::new(), "Test Operator")
    }

    #[test]
    fn null_principal_fails_closed_everywhere() {
        assert!(platform_roles(None).is_empty());
        assert!(!has_platform_role(None, &Role::SUPER_ADMIN));
        assert!(!is_super_admin(None));
        assert!(customer_roles(None, Some(&cid("A"))).is_empty());
        assert!(!has_customer_access(None, Some(&cid("A"))));
        assert!(!has_tenant_access(None, Some(&cid("A")), Some(&tid("T1"))));
        assert!(resource_permissions(None, Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1"))).is_empty());
        assert!(!has_resource_access(None, Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1"))));
        assert!(accessible_customer_ids(None).is_empty());
        assert!(accessible_tenant_ids(None, Some(&cid("A"))).is_empty());
    }

    #[test]
    fn missing_scope_ids_fail_closed() {
        let p = principal()
            .with_customer_grant(cid("A"), vec![Role::USER])
            .with_tenant_grant(cid("A"), tid("T1"), vec![Role::USER]);

        assert!(!has_customer_access(Some(&p), None));
        assert!(customer_roles(Some(&p), None).is_empty());
        assert!(!has_tenant_access(Some(&p), None, Some(&tid("T1"))));
        assert!(!has_tenant_access(Some(&p), Some(&cid("A")), None));
        assert!(!has_resource_access(Some(&p), Some(&cid("A")), Some(&tid("T1")), None));
    }

    #[test]
    fn no_grants_means_no_access() {
        let p = principal();
        assert!(!has_customer_access(Some(&p), Some(&cid("A"))));
        assert!(!has_tenant_access(Some(&p), Some(&cid("A")), Some(&tid("T1"))));
        assert!(!has_resource_access(Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1"))));
    }

    #[test]
    fn role_match_is_case_sensitive() {
        let p = principal().with_platform_roles(vec![Role::new("super_admin")]);
        assert!(!is_super_admin(Some(&p)));
    }

    #[test]
    fn tenant_grant_implies_tenant_but_not_customer_access() {
        // A tenant admin with no customer-level grant sees the tenant only.
        let p = principal().with_tenant_grant(cid("A"), tid("T1"), vec![Role::TENANT_ADMIN]);

        assert!(has_tenant_access(Some(&p), Some(&cid("A")), Some(&tid("T1"))));
        assert!(!has_customer_access(Some(&p), Some(&cid("A"))));
        assert!(!has_tenant_access(Some(&p), Some(&cid("A")), Some(&tid("T2"))));
    }

    #[test]
    fn customer_admin_reaches_any_tenant_under_the_customer() {
        let p = principal().with_customer_grant(cid("A"), vec![Role::CUSTOMER_ADMIN]);

        assert!(has_tenant_access(Some(&p), Some(&cid("A")), Some(&tid("T1"))));
        assert!(has_tenant_access(Some(&p), Some(&cid("A")), Some(&tid("T99"))));
        assert!(!has_tenant_access(Some(&p), Some(&cid("B")), Some(&tid("T1"))));
        // Listing stays direct: no tenant roles materialize from the customer grant.
        assert!(tenant_roles(Some(&p), Some(&cid("A")), Some(&tid("T1"))).is_empty());
    }

    #[test]
    fn tenant_admin_reaches_any_resource_under_the_tenant() {
        let p = principal().with_tenant_grant(cid("A"), tid("T1"), vec![Role::TENANT_ADMIN]);

        assert!(has_resource_access(Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1"))));
        assert!(!has_resource_access(Some(&p), Some(&cid("A")), Some(&tid("T2")), Some(&rid("R1"))));
    }

    #[test]
    fn resource_permissions_are_exact_and_role_independent() {
        let p = principal().with_resource_grant(
            cid("A"),
            tid("T1"),
            rid("R1"),
            vec![Permission::READ, Permission::WRITE],
        );

        assert!(has_resource_permission(
            Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1")), &Permission::READ,
        ));
        assert!(has_resource_permission(
            Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1")), &Permission::WRITE,
        ));
        assert!(!has_resource_permission(
            Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1")), &Permission::DELETE,
        ));
        // The direct grant also satisfies the access check.
        assert!(has_resource_access(Some(&p), Some(&cid("A")), Some(&tid("T1")), Some(&rid("R1"))));
        // Holding permissions grants no roles anywhere.
        assert!(tenant_roles(Some(&p), Some(&cid("A")), Some(&tid("T1"))).is_empty());
    }

    #[test]
    fn accessible_customer_ids_lists_direct_memberships_only() {
        let p = principal()
            .with_platform_roles(vec![Role::SUPER_ADMIN])
            .with_customer_grant(cid("A"), vec![Role::USER])
            .with_customer_grant(cid("B"), vec![Role::CUSTOMER_ADMIN]);

        // Super admin does not expand the list to "all customers".
        assert_eq!(accessible_customer_ids(Some(&p)), vec![cid("A"), cid("B")]);
    }

    #[test]
    fn accessible_tenant_ids_filters_by_customer_and_keeps_order() {
        let p = principal()
            .with_tenant_grant(cid("A"), tid("T2"), vec![Role::USER])
            .with_tenant_grant(cid("B"), tid("T9"), vec![Role::USER])
            .with_tenant_grant(cid("A"), tid("T1"), vec![Role::TENANT_ADMIN]);

        assert_eq!(
            accessible_tenant_ids(Some(&p), Some(&cid("A"))),
            vec![tid("T2"), tid("T1")]
        );
    }

    #[test]
    fn duplicate_customer_grants_resolve_to_first_match() {
        let p = principal()
            .with_customer_grant(cid("A"), vec![Role::USER])
            .with_customer_grant(cid("A"), vec![Role::CUSTOMER_ADMIN]);

        // First grant by scan order wins.
        assert!(!has_customer_role(Some(&p), Some(&cid("A")), &Role::CUSTOMER_ADMIN));
        assert!(has_customer_role(Some(&p), Some(&cid("A")), &Role::USER));
        assert_eq!(accessible_customer_ids(Some(&p)), vec![cid("A")]);
    }

    #[test]
    fn role_sets_are_fresh_containers() {
        let p = principal().with_customer_grant(cid("A"), vec![Role::USER]);

        let mut roles = customer_roles(Some(&p), Some(&cid("A")));
        roles.insert(Role::CUSTOMER_ADMIN);

        // Mutating the returned set must not leak into the principal.
        assert!(!has_customer_role(Some(&p), Some(&cid("A")), &Role::CUSTOMER_ADMIN));
    }

    // Arbitrary scope ids for the precedence matrix.
    fn any_id() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,12}"
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a platform super admin dominates every check at every
        /// scope, whatever the rest of the grant set looks like.
        #[test]
        fn super_admin_dominates_every_scope(
            c in any_id(),
            t in any_id(),
            r in any_id(),
            extra_customer in any_id(),
        ) {
            let p = principal()
                .with_platform_roles(vec![Role::SUPER_ADMIN])
                .with_customer_grant(cid(&extra_customer), vec![Role::USER]);

            prop_assert!(has_customer_access(Some(&p), Some(&cid(&c))));
            prop_assert!(has_tenant_access(Some(&p), Some(&cid(&c)), Some(&tid(&t))));
            prop_assert!(has_resource_access(
                Some(&p), Some(&cid(&c)), Some(&tid(&t)), Some(&rid(&r)),
            ));
        }

        /// Property: a customer admin reaches every tenant and resource under
        /// that customer regardless of tenant grants, and nothing under any
        /// other customer without its own grant.
        #[test]
        fn customer_admin_dominates_below_its_customer(
            c in any_id(),
            other in any_id(),
            t in any_id(),
            r in any_id(),
        ) {
            prop_assume!(c != other);

            let p = principal().with_customer_grant(cid(&c), vec![Role::CUSTOMER_ADMIN]);

            prop_assert!(has_tenant_access(Some(&p), Some(&cid(&c)), Some(&tid(&t))));
            prop_assert!(has_resource_access(
                Some(&p), Some(&cid(&c)), Some(&tid(&t)), Some(&rid(&r)),
            ));
            prop_assert!(!has_tenant_access(Some(&p), Some(&cid(&other)), Some(&tid(&t))));
        }

        /// Property: a lower-scope grant alone never implies higher-scope
        /// access.
        #[test]
        fn lower_grants_never_escalate(
            c in any_id(),
            t in any_id(),
            r in any_id(),
        ) {
            let p = principal()
                .with_tenant_grant(cid(&c), tid(&t), vec![Role::TENANT_ADMIN])
                .with_resource_grant(cid(&c), tid(&t), rid(&r), vec![Permission::WRITE]);

            prop_assert!(!is_super_admin(Some(&p)));
            prop_assert!(!has_customer_access(Some(&p), Some(&cid(&c))));
            prop_assert!(!has_platform_role(Some(&p), &Role::CUSTOMER_ADMIN));
        }
    }
}
