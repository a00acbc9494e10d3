//! Primitives a nonce relies on.
//!
//! A [`NonceHost`] owns the secret, the tenant, the ambient lifetime and access
//! to the current request. Embedders with their own platform implement it;
//! [`HmacHost`] is a standalone implementation.

mod clock;
#[cfg(feature = "hmac-host")]
mod hmac_host;

pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "hmac-host")]
pub use hmac_host::{CredentialAge, HmacHost, CREDENTIAL_LEN};

use crate::context::RequestParams;
use crate::life::{NonceLife, DEFAULT_NONCE_LIFE};

/// Scheme label used when hashing nonce actions.
pub const NONCE_SCHEME: &str = "nonce";

/// Host platform primitives.
///
/// `create_credential` and `verify_credential` must read the lifetime from
/// [`nonce_life`](Self::nonce_life) at call time. Failures inside these
/// primitives are not recovered from; a panic propagates to the caller.
pub trait NonceHost: Send + Sync {
    /// Identifier of the tenant (site, workspace) currently served.
    fn current_tenant_id(&self) -> String;

    /// Deterministic, salted hash of `input` under `scheme`.
    fn keyed_hash(&self, input: &str, scheme: &str) -> String;

    /// Produce a time-limited credential bound to `hashed_action`.
    fn create_credential(&self, hashed_action: &str) -> String;

    /// Whether `candidate` is a valid, unexpired credential for `hashed_action`.
    fn verify_credential(&self, candidate: &str, hashed_action: &str) -> bool;

    /// The ambient lifetime setting.
    fn nonce_life(&self) -> &NonceLife;

    /// Life given to nonces created without an explicit one.
    fn default_nonce_life(&self) -> u64 {
        DEFAULT_NONCE_LIFE
    }

    /// Parameters of the request being served.
    fn current_request(&self) -> RequestParams;

    /// Base URL of the site, without trailing slash requirements.
    fn home_url(&self) -> String;
}

impl<H: NonceHost + ?Sized> NonceHost for std::sync::Arc<H> {
    fn current_tenant_id(&self) -> String {
        (**self).current_tenant_id()
    }

    fn keyed_hash(&self, input: &str, scheme: &str) -> String {
        (**self).keyed_hash(input, scheme)
    }

    fn create_credential(&self, hashed_action: &str) -> String {
        (**self).create_credential(hashed_action)
    }

    fn verify_credential(&self, candidate: &str, hashed_action: &str) -> bool {
        (**self).verify_credential(candidate, hashed_action)
    }

    fn nonce_life(&self) -> &NonceLife {
        (**self).nonce_life()
    }

    fn default_nonce_life(&self) -> u64 {
        (**self).default_nonce_life()
    }

    fn current_request(&self) -> RequestParams {
        (**self).current_request()
    }

    fn home_url(&self) -> String {
        (**self).home_url()
    }
}
