//! `scopegate-observability` — process-level tracing setup.

mod tracing_init;

pub use tracing_init::init;
