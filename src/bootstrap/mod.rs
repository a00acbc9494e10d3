//! Logging setup for binaries embedding this crate.

mod tracing_init;

pub use tracing_init::{init_tracing, DEFAULT_FILTER};
