//! `scopegate-api` — HTTP embedding of the access-control and session-scope
//! engine.
//!
//! Sessions are opaque bearer tokens mapped to per-session scope facades;
//! protected regions are gated by the route guard before their handlers run.

pub mod app;
pub mod config;
pub mod registry;
