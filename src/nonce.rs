//! Action-scoped, tenant-scoped nonces.

use crate::context::{NonceContext, RequestContext};
use crate::host::{NonceHost, NONCE_SCHEME};
use crate::life::parse_life_or;
use std::fmt;
use std::sync::Arc;

/// A nonce: an action label plus a credential that can be checked later.
///
/// The credential is the [`Display`](fmt::Display) output, so `to_string()`
/// returns the value to embed in a URL or form.
pub trait Nonce: fmt::Display {
    /// The protected action. Also the parameter name the credential travels under.
    fn action(&self) -> &str;

    /// Validate against `context`, or against the current request when `None`.
    ///
    /// Never fails: a missing, empty, wrong or expired value answers `false`.
    fn validate(&self, context: Option<&dyn NonceContext>) -> bool;
}

/// Nonce whose credential is created and verified by a [`NonceHost`].
///
/// Credentials are bound to the action and to the tenant current at the time
/// of the call. The action is hashed before it reaches the host so it cannot be
/// traced back from the credential. The life only bounds how long a credential
/// is accepted; it does not take part in the hash.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use nonce_core::{ArrayContext, HmacHost, HostNonce, Nonce};
///
/// let host = Arc::new(HmacHost::new("salt"));
/// let nonce = HostNonce::new(host, "delete-post");
/// let credential = nonce.to_string();
///
/// let context = ArrayContext::from(vec![("delete-post", credential)]);
/// assert!(nonce.validate(Some(&context)));
/// ```
pub struct HostNonce<H: NonceHost + ?Sized> {
    action: String,
    life: u64,
    host: Arc<H>,
}

impl<H: NonceHost + ?Sized> HostNonce<H> {
    /// Nonce for `action` with the host's default life (30 minutes unless
    /// configured otherwise).
    pub fn new(host: Arc<H>, action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            life: host.default_nonce_life(),
            host,
        }
    }

    /// Build from loosely typed input such as request or config values.
    ///
    /// A missing action becomes the empty action. A missing or non-numeric life
    /// becomes the host's default life.
    pub fn from_input(host: Arc<H>, action: Option<&str>, life: Option<&str>) -> Self {
        let nonce = Self::new(host, action.unwrap_or_default());
        match life {
            Some(life) => {
                let life = parse_life_or(life, nonce.life);
                nonce.with_life(life)
            }
            None => nonce,
        }
    }

    /// Replace the life, in seconds.
    pub fn with_life(mut self, life: u64) -> Self {
        self.life = life;
        self
    }

    pub fn life(&self) -> u64 {
        self.life
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn hashed_action(&self) -> String {
        let input = format!("{}{}", self.action, self.host.current_tenant_id());
        self.host.keyed_hash(&input, NONCE_SCHEME)
    }

    fn validate_against(&self, context: &dyn NonceContext) -> bool {
        let value = match context.get(&self.action) {
            Some(value) if !value.is_empty() => value,
            _ => {
                tracing::debug!(action = %self.action, "nonce missing from context");
                return false;
            }
        };

        let hashed = self.hashed_action();
        let valid = {
            let _life = self.host.nonce_life().install(self.life);
            self.host.verify_credential(value, &hashed)
        };

        if !valid {
            tracing::debug!(action = %self.action, life = self.life, "nonce rejected");
        }
        valid
    }
}

impl<H: NonceHost + ?Sized> Nonce for HostNonce<H> {
    fn action(&self) -> &str {
        &self.action
    }

    fn validate(&self, context: Option<&dyn NonceContext>) -> bool {
        match context {
            Some(context) => self.validate_against(context),
            None => {
                let request = RequestContext::new(&self.host.current_request());
                self.validate_against(&request)
            }
        }
    }
}

impl<H: NonceHost + ?Sized> fmt::Display for HostNonce<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hashed = self.hashed_action();
        let credential = {
            let _life = self.host.nonce_life().install(self.life);
            self.host.create_credential(&hashed)
        };
        tracing::trace!(action = %self.action, life = self.life, "issued nonce");
        f.write_str(&credential)
    }
}

impl<H: NonceHost + ?Sized> Clone for HostNonce<H> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            life: self.life,
            host: Arc::clone(&self.host),
        }
    }
}

impl<H: NonceHost + ?Sized> fmt::Debug for HostNonce<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostNonce")
            .field("action", &self.action)
            .field("life", &self.life)
            .finish_non_exhaustive()
    }
}
