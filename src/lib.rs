//! Nonce Core - Action-scoped, tenant-scoped nonces for CSRF protection.
//!
//! This crate issues short-lived credentials bound to an action and a tenant,
//! embeds them in URLs or form fields, and validates them against request data:
//!
//! - **nonce**: [`HostNonce`] issues (`to_string()`) and validates credentials
//! - **context**: Read-only sources the credential is looked up in
//! - **host**: Hashing, credential and lifetime primitives behind [`NonceHost`]
//! - **helpers**: Hidden form fields and URLs carrying a nonce
//! - **config**: Configuration from environment variables
//! - **guard**: axum middleware rejecting requests without a valid nonce
//! - **bootstrap**: Tracing initialization utilities
//!
//! # Features
//!
//! - `config` - Configuration utilities (enabled by default)
//! - `hmac-host` - Standalone HMAC-SHA256 host (enabled by default)
//! - `axum` - Request extractor and guard middleware (enabled by default)
//! - `bootstrap` - Tracing setup (enabled by default)
//! - `full` - All features
//!
//! # Example
//!
//! ```rust,ignore
//! use nonce_core::{form_field, init_tracing, HmacHost, HostNonce, Nonce, NonceConfig};
//!
//! fn main() {
//!     init_tracing("my_site=debug,nonce_core=info").ok();
//!     let host = Arc::new(HmacHost::from_config(&NonceConfig::from_env())?);
//!
//!     // Issue
//!     let nonce = HostNonce::new(host.clone(), "delete-post-42");
//!     let field = form_field(&nonce);
//!
//!     // Validate against the request the host is serving
//!     host.set_request(params_of_next_request);
//!     assert!(nonce.validate(None));
//! }
//! ```

pub mod context;
pub mod error;
pub mod helpers;
pub mod host;
pub mod life;
pub mod nonce;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "axum")]
pub mod guard;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use context::{ArrayContext, NonceContext, RequestContext, RequestParams};
pub use error::NonceError;
pub use helpers::{add_query_arg, esc_attr, form_field, nonce_url, sanitize_url};
pub use host::{Clock, ManualClock, NonceHost, SystemClock, NONCE_SCHEME};
pub use life::{parse_life, parse_life_or, LifeOverride, NonceLife, DEFAULT_NONCE_LIFE, DEFAULT_PLATFORM_LIFE};
pub use nonce::{HostNonce, Nonce};

#[cfg(feature = "hmac-host")]
pub use host::{CredentialAge, HmacHost, CREDENTIAL_LEN};

#[cfg(feature = "config")]
pub use config::NonceConfig;

#[cfg(feature = "axum")]
pub use guard::{NonceGuardLayer, NonceGuardService};

#[cfg(feature = "bootstrap")]
pub use bootstrap::{init_tracing, DEFAULT_FILTER};
