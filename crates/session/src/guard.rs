//! Route-guard decision core.
//!
//! A pure three-state gate: while the session is still resolving nothing
//! navigates; an anonymous visitor is sent to sign-in with the requested
//! location preserved; an authenticated principal failing a requirement is
//! sent to the unauthorized destination. The transport mapping (HTTP
//! redirects, pending indicator) lives with the embedding, not here — the
//! guard never surfaces raw denial details.

use scopegate_auth::{resolver, Principal, Role};
use scopegate_core::{CustomerId, TenantId};

/// One capability requirement a protected region declares.
///
/// A guard may declare any number of these; all must pass. Zero requirements
/// means "authenticated is sufficient".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Platform {
        role: Role,
    },
    Customer {
        customer_id: CustomerId,
        role: Role,
    },
    Tenant {
        customer_id: CustomerId,
        tenant_id: TenantId,
        role: Role,
    },
}

impl Requirement {
    fn precedence(&self) -> u8 {
        match self {
            Requirement::Platform { .. } => 0,
            Requirement::Customer { .. } => 1,
            Requirement::Tenant { .. } => 2,
        }
    }

    fn is_satisfied_by(&self, principal: &Principal) -> bool {
        match self {
            Requirement::Platform { role } => {
                resolver::has_platform_role(Some(principal), role)
            }
            Requirement::Customer { customer_id, role } => {
                resolver::has_customer_role(Some(principal), Some(customer_id), role)
            }
            Requirement::Tenant {
                customer_id,
                tenant_id,
                role,
            } => resolver::has_tenant_role(
                Some(principal),
                Some(customer_id),
                Some(tenant_id),
                role,
            ),
        }
    }
}

/// Guard configuration, supplied by the embedding application per protected
/// region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Destination for unauthenticated visitors.
    pub sign_in_path: String,
    /// Destination for authenticated principals failing a requirement.
    pub unauthorized_path: String,
    pub requirements: Vec<Requirement>,
}

impl GuardConfig {
    pub fn new(sign_in_path: impl Into<String>, unauthorized_path: impl Into<String>) -> Self {
        Self {
            sign_in_path: sign_in_path.into(),
            unauthorized_path: unauthorized_path.into(),
            requirements: Vec::new(),
        }
    }

    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }
}

/// What the guard knows about the session at evaluation time.
#[derive(Debug, Copy, Clone)]
pub enum SessionState<'a> {
    /// Principal not yet determined (sign-in flow still in flight).
    Resolving,
    /// No principal: the visitor is unauthenticated.
    Anonymous,
    Authenticated(&'a Principal),
}

/// Redirect instruction for the navigation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Originally requested location, preserved so a post-authentication
    /// flow can return to it.
    pub return_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render a neutral pending indicator; no navigation.
    Resolving,
    /// Render the protected region.
    Granted,
    Denied { redirect: Redirect },
}

/// Evaluate a guard against the session.
///
/// Requirements are checked platform-first, then customer, then tenant —
/// the same order as the resolver's precedence chain — and all of them must
/// pass.
pub fn evaluate(
    config: &GuardConfig,
    session: SessionState<'_>,
    requested_path: &str,
) -> GuardDecision {
    let principal = match session {
        SessionState::Resolving => return GuardDecision::Resolving,
        SessionState::Anonymous => {
            return GuardDecision::Denied {
                redirect: Redirect {
                    to: config.sign_in_path.clone(),
                    return_to: Some(requested_path.to_string()),
                },
            };
        }
        SessionState::Authenticated(p) => p,
    };

    let mut requirements: Vec<&Requirement> = config.requirements.iter().collect();
    requirements.sort_by_key(|r| r.precedence());

    for requirement in requirements {
        if !requirement.is_satisfied_by(principal) {
            tracing::debug!(
                principal = %principal.id,
                path = requested_path,
                "guard denied: requirement not met"
            );
            return GuardDecision::Denied {
                redirect: Redirect {
                    to: config.unauthorized_path.clone(),
                    return_to: None,
                },
            };
        }
    }

    GuardDecision::Granted
}
