//! Observability for pipeline runs.

mod tracing;

pub use tracing::init_tracing;
