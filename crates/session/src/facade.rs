//! Scope-aware facade.
//!
//! Composes the access resolver with the session scope store so callers ask
//! "am I an admin for the *currently selected* customer" instead of threading
//! `(principal, customer, tenant)` themselves. The facade owns the ambient
//! principal for the session and is the component that triggers scope
//! auto-initialization and tenant-directory fetches.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use scopegate_auth::{resolver, Principal, Role};
use scopegate_core::{CustomerId, TenantId};

use crate::directory::{TenantDirectory, TenantPage, TenantPageRequest};
use crate::guard::SessionState;
use crate::scope::{ScopeError, SessionScope};

const TENANT_PAGE_SIZE: usize = 50;

/// Read-only snapshot of the current scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSnapshot {
    pub customer_id: Option<CustomerId>,
    pub tenant_id: Option<TenantId>,
    pub tenant_name: Option<String>,
}

/// Per-session composition of principal, scope store and tenant directory.
///
/// Single-threaded owner: all transitions run on discrete caller events, so
/// no two of them are ever concurrent within a session.
pub struct ScopeFacade {
    principal: Option<Principal>,
    scope: SessionScope,
    directory: Arc<dyn TenantDirectory>,
    tenants: Option<TenantPage>,
}

impl ScopeFacade {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            principal: None,
            scope: SessionScope::new(),
            directory,
            tenants: None,
        }
    }

    /// Install the principal for this session and attempt scope
    /// auto-initialization.
    ///
    /// This is the explicit lifecycle hook for "a principal became
    /// available": auto-initialization fires here, once, only from the empty
    /// scope. First read after sign-in already reflects the auto-selected
    /// customer where one exists.
    pub fn sign_in(&mut self, principal: Principal) {
        tracing::info!(principal = %principal.id, "session established");
        self.principal = Some(principal);

        let initialized = match self.principal.as_ref() {
            Some(principal) => self.scope.initialize_from_principal(principal),
            None => None,
        };
        if let Some(customer) = initialized {
            self.refresh_tenants(&customer);
        }
    }

    /// Drop the principal and clear the scope, atomically together.
    ///
    /// Leaving one without the other is the session-desynchronization bug
    /// class; routing every sign-out through here rules it out.
    pub fn sign_out(&mut self) {
        if let Some(principal) = self.principal.take() {
            tracing::info!(principal = %principal.id, "session ended");
        }
        self.scope.clear();
        self.tenants = None;
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Session state as the route guard sees it.
    pub fn session_state(&self) -> SessionState<'_> {
        match &self.principal {
            Some(p) => SessionState::Authenticated(p),
            None => SessionState::Anonymous,
        }
    }

    pub fn current_scope(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            customer_id: self.scope.customer_id().cloned(),
            tenant_id: self.scope.tenant_id().cloned(),
            tenant_name: self.scope.tenant_name().map(str::to_string),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        resolver::is_super_admin(self.principal.as_ref())
    }

    pub fn has_platform_role(&self, role: &Role) -> bool {
        resolver::has_platform_role(self.principal.as_ref(), role)
    }

    /// Roles at the currently selected customer; empty while no customer is
    /// selected.
    pub fn current_customer_roles(&self) -> HashSet<Role> {
        resolver::customer_roles(self.principal.as_ref(), self.scope.customer_id())
    }

    pub fn has_current_customer_role(&self, role: &Role) -> bool {
        resolver::has_customer_role(self.principal.as_ref(), self.scope.customer_id(), role)
    }

    pub fn accessible_customer_ids(&self) -> Vec<CustomerId> {
        resolver::accessible_customer_ids(self.principal.as_ref())
    }

    /// Select a customer; a changed selection re-fetches its tenant
    /// directory page.
    pub fn switch_customer(&mut self, customer_id: CustomerId) {
        let changed = self.scope.customer_id() != Some(&customer_id);
        self.scope.set_customer(customer_id.clone());
        if changed {
            self.refresh_tenants(&customer_id);
        }
    }

    /// Select a tenant (or `None` for all tenants) under the current
    /// customer.
    ///
    /// When a directory page has been fetched, only tenants listed there with
    /// `Enabled` status are eligible; with no page yet the directory is still
    /// populating and the selection is taken as-is.
    pub fn switch_tenant(&mut self, selection: Option<(TenantId, String)>) -> Result<(), ScopeError> {
        if let (Some((tenant_id, _)), Some(page)) = (&selection, &self.tenants) {
            if !page.is_eligible(tenant_id) {
                return Err(ScopeError::TenantNotEligible(tenant_id.clone()));
            }
        }
        self.scope.set_tenant(selection)
    }

    pub fn clear_scope(&mut self) {
        self.scope.clear();
        self.tenants = None;
    }

    /// Last fetched tenant-directory page for the selected customer.
    pub fn tenants(&self) -> Option<&TenantPage> {
        self.tenants.as_ref()
    }

    fn refresh_tenants(&mut self, customer_id: &CustomerId) {
        // The core never blocks on the directory; this is the signal, the
        // directory impl owns latency and caching.
        self.tenants = Some(self.directory.fetch(&TenantPageRequest {
            customer_id: customer_id.clone(),
            page: 1,
            page_size: TENANT_PAGE_SIZE,
        }));
    }
}
