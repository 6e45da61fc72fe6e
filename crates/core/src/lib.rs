//! `scopegate-core` — foundation types for the access-control engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the strongly-typed scope identifiers and the domain error model.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ResourceId, TenantId};
