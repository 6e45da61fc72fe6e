//! `scopegate-session` — session scope store, scope-aware facade, route guard.
//!
//! The [`scope::SessionScope`] state machine tracks which customer/tenant the
//! signed-in principal is currently operating within; the
//! [`facade::ScopeFacade`] composes it with the access resolver so callers
//! never thread `(principal, customer, tenant)` by hand; the [`guard`] module
//! turns the two into navigation decisions for protected regions.

pub mod directory;
pub mod facade;
pub mod guard;
pub mod scope;

pub use directory::{
    InMemoryTenantDirectory, PageMeta, TenantDirectory, TenantPage, TenantPageRequest,
    TenantStatus, TenantSummary,
};
pub use facade::{ScopeFacade, ScopeSnapshot};
pub use guard::{GuardConfig, GuardDecision, Redirect, Requirement, SessionState};
pub use scope::{ScopeError, ScopeState, SessionScope};
