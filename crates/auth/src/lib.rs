//! `scopegate-auth` — principal model and pure access resolver.
//!
//! This crate is intentionally decoupled from transport and UI state. A
//! [`Principal`] is decoded once per sign-in at the trust boundary
//! ([`decode`]) and never mutated afterwards; the [`resolver`] answers
//! capability questions against it as total, fail-closed functions.

pub mod decode;
pub mod permissions;
pub mod principal;
pub mod resolver;
pub mod roles;

pub use decode::{decode_principal, PrincipalDoc};
pub use permissions::Permission;
pub use principal::{
    CustomerGrant, PlatformGrant, Principal, PrincipalId, ResourceGrant, TenantGrant,
};
pub use roles::Role;
