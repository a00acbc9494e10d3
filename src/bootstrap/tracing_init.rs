//! Tracing initialization utilities.

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

/// Filter used when the caller has no preference: nonce events at info.
///
/// Validation misses are logged at debug and issuance at trace, so
/// `nonce_core=debug` is the usual setting while chasing rejected forms.
pub const DEFAULT_FILTER: &str = "nonce_core=info";

/// Initialize tracing with the given default filter.
///
/// The filter can be overridden by the `RUST_LOG` environment variable.
/// Returns an error instead of panicking when a global subscriber is already
/// installed, so libraries and tests can call it unconditionally.
///
/// # Example
///
/// ```rust
/// use nonce_core::{init_tracing, DEFAULT_FILTER};
///
/// // Ignore the error if the host application already set up logging.
/// let _ = init_tracing(DEFAULT_FILTER);
/// ```
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .try_init()
}
