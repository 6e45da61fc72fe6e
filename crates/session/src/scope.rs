//! Session scope state machine.
//!
//! Tracks the currently *selected* customer/tenant — distinct from what the
//! principal is *entitled* to, which is the resolver's business.

use thiserror::Error;

use scopegate_auth::{Principal, Role};
use scopegate_core::{CustomerId, TenantId};

/// Conceptual state of the scope machine.
///
/// `CustomerScoped` means "all tenants under this customer".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeState {
    Empty,
    CustomerScoped,
    TenantScoped,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// `set_tenant` was called before any customer was selected.
    #[error("no customer selected")]
    NoCustomerSelected,

    /// The requested tenant is not an enabled entry in the current directory
    /// page.
    #[error("tenant '{0}' is not eligible for selection")]
    TenantNotEligible(TenantId),
}

/// The session scope record and its four transitions.
///
/// # Invariants
/// - `selected_tenant_id` and `selected_tenant_name` are set and cleared
///   together, never separately.
/// - Selecting a *different* customer clears both tenant fields; selecting
///   the same customer again changes nothing.
/// - Auto-initialization only ever fires from the empty state.
/// - The four transitions are the only mutation path (fields are private).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScope {
    selected_customer_id: Option<CustomerId>,
    selected_tenant_id: Option<TenantId>,
    selected_tenant_name: Option<String>,
}

impl SessionScope {
    /// Empty scope, as at application start.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScopeState {
        match (&self.selected_customer_id, &self.selected_tenant_id) {
            (None, _) => ScopeState::Empty,
            (Some(_), None) => ScopeState::CustomerScoped,
            (Some(_), Some(_)) => ScopeState::TenantScoped,
        }
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.selected_customer_id.as_ref()
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.selected_tenant_id.as_ref()
    }

    /// Display cache only; the directory stays authoritative for names.
    pub fn tenant_name(&self) -> Option<&str> {
        self.selected_tenant_name.as_deref()
    }

    /// Select a customer.
    ///
    /// A different customer narrows the scope and clears the tenant fields so
    /// a tenant selection can never leak across customers. The same customer
    /// is an identity transition: no tenant reset.
    pub fn set_customer(&mut self, customer_id: CustomerId) {
        if self.selected_customer_id.as_ref() == Some(&customer_id) {
            return;
        }

        tracing::debug!(customer = %customer_id, "scope: customer selected");
        self.selected_customer_id = Some(customer_id);
        self.selected_tenant_id = None;
        self.selected_tenant_name = None;
    }

    /// Select a tenant under the current customer, or `None` for "all
    /// tenants".
    ///
    /// Calling this with no customer selected is a precondition violation and
    /// is rejected before any field is touched.
    pub fn set_tenant(
        &mut self,
        selection: Option<(TenantId, String)>,
    ) -> Result<(), ScopeError> {
        if self.selected_customer_id.is_none() {
            return Err(ScopeError::NoCustomerSelected);
        }

        match selection {
            Some((tenant_id, tenant_name)) => {
                tracing::debug!(tenant = %tenant_id, "scope: tenant selected");
                self.selected_tenant_id = Some(tenant_id);
                self.selected_tenant_name = Some(tenant_name);
            }
            None => {
                tracing::debug!("scope: widened to all tenants");
                self.selected_tenant_id = None;
                self.selected_tenant_name = None;
            }
        }

        Ok(())
    }

    /// One-shot auto-initialization from a freshly supplied principal.
    ///
    /// No-op unless the scope is empty. Scans the principal's customer grants
    /// in stored order and selects the first carrying `CUSTOMER_ADMIN`; with
    /// no qualifying grant the scope stays empty. Returns the selected
    /// customer, if any.
    pub fn initialize_from_principal(&mut self, principal: &Principal) -> Option<CustomerId> {
        if self.selected_customer_id.is_some() {
            return None;
        }

        let selected = principal
            .customer_grants
            .iter()
            .find(|g| g.roles.contains(&Role::CUSTOMER_ADMIN))
            .map(|g| g.customer_id.clone())?;

        tracing::debug!(customer = %selected, "scope: auto-initialized from principal");
        self.selected_customer_id = Some(selected.clone());
        Some(selected)
    }

    /// Unconditional reset to the empty state (sign-out path).
    pub fn clear(&mut self) {
        tracing::debug!("scope: cleared");
        self.selected_customer_id = None;
        self.selected_tenant_id = None;
        self.selected_tenant_name = None;
    }
}
