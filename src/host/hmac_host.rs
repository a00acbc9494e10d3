//! Standalone host built on HMAC-SHA256.
//!
//! Credentials are tick based: the lifetime is split in two halves and a
//! credential minted during tick `t` verifies during ticks `t` and `t + 1`.
//! A credential therefore stays valid for between half and all of its
//! lifetime, depending on when in the tick it was created.

use super::{Clock, NonceHost, SystemClock, NONCE_SCHEME};
use crate::context::RequestParams;
use crate::life::{NonceLife, DEFAULT_NONCE_LIFE};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type HmacSha256 = Hmac<Sha256>;

/// Length of a credential in hex characters.
pub const CREDENTIAL_LEN: usize = 10;

const CREDENTIAL_BYTES: usize = CREDENTIAL_LEN / 2;

/// Which tick a credential was matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialAge {
    /// Minted during the current tick.
    Fresh,
    /// Minted during the previous tick.
    Aging,
}

/// [`NonceHost`] keeping its secret salt, tenant and current request in memory.
///
/// # Example
///
/// ```rust
/// use nonce_core::{HmacHost, NonceHost};
///
/// let host = HmacHost::new("a long random salt");
/// let hashed = host.keyed_hash("delete-post1", "nonce");
/// let credential = host.create_credential(&hashed);
/// assert!(host.verify_credential(&credential, &hashed));
/// ```
pub struct HmacHost {
    salt: Vec<u8>,
    tenant: RwLock<String>,
    request: RwLock<RequestParams>,
    home_url: String,
    life: NonceLife,
    default_life: u64,
    clock: Arc<dyn Clock>,
}

impl HmacHost {
    /// Create a host for tenant `1` at `http://localhost` using the wall clock.
    pub fn new(salt: impl Into<Vec<u8>>) -> Self {
        Self {
            salt: salt.into(),
            tenant: RwLock::new("1".to_string()),
            request: RwLock::new(RequestParams::default()),
            home_url: "http://localhost".to_string(),
            life: NonceLife::default(),
            default_life: DEFAULT_NONCE_LIFE,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a host from configuration, generating a salt when none is set.
    #[cfg(feature = "config")]
    pub fn from_config(config: &crate::config::NonceConfig) -> Result<Self, crate::NonceError> {
        let (salt, generated) = config.get_or_generate_salt()?;
        if generated {
            tracing::warn!("no NONCE_SALT configured, nonces will not survive a restart");
        }
        Ok(Self::new(salt)
            .with_tenant(config.tenant_id.clone())
            .with_home_url(config.home_url.clone())
            .with_platform_life(config.platform_life)
            .with_default_life(config.nonce_life))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
        self.home_url = home_url.into();
        self
    }

    pub fn with_tenant(self, tenant: impl Into<String>) -> Self {
        self.set_tenant(tenant);
        self
    }

    /// Lifetime in effect when no nonce has installed its own.
    pub fn with_platform_life(mut self, life: u64) -> Self {
        self.life = NonceLife::new(life);
        self
    }

    /// Life given to nonces that do not set their own.
    pub fn with_default_life(mut self, life: u64) -> Self {
        self.default_life = life;
        self
    }

    /// Switch the tenant subsequent hashes are scoped to.
    pub fn set_tenant(&self, tenant: impl Into<String>) {
        let tenant = tenant.into();
        tracing::debug!(%tenant, "switching tenant");
        *self.tenant.write().unwrap_or_else(PoisonError::into_inner) = tenant;
    }

    /// Record the request being served.
    pub fn set_request(&self, request: RequestParams) {
        *self.request.write().unwrap_or_else(PoisonError::into_inner) = request;
    }

    /// Match `candidate` against the current and the previous tick.
    pub fn check_credential(&self, candidate: &str, hashed_action: &str) -> Option<CredentialAge> {
        if candidate.len() != CREDENTIAL_LEN {
            return None;
        }
        let provided = hex::decode(candidate).ok()?;
        let tick = self.tick();

        if self.tick_mac(tick, hashed_action).verify_truncated_left(&provided).is_ok() {
            return Some(CredentialAge::Fresh);
        }
        let previous = tick.checked_sub(1)?;
        self.tick_mac(previous, hashed_action)
            .verify_truncated_left(&provided)
            .ok()
            .map(|()| CredentialAge::Aging)
    }

    fn tick(&self) -> u64 {
        let half = (self.life.current() / 2).max(1);
        self.clock.now().div_ceil(half)
    }

    fn tick_mac(&self, tick: u64, hashed_action: &str) -> HmacSha256 {
        let mut mac = keyed(&self.scheme_key(NONCE_SCHEME));
        mac.update(tick.to_string().as_bytes());
        mac.update(b"|");
        mac.update(hashed_action.as_bytes());
        mac
    }

    fn scheme_key(&self, scheme: &str) -> Vec<u8> {
        let mut mac = keyed(&self.salt);
        mac.update(scheme.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn keyed(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts any key length")
}

impl NonceHost for HmacHost {
    fn current_tenant_id(&self) -> String {
        self.tenant
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn keyed_hash(&self, input: &str, scheme: &str) -> String {
        let mut mac = keyed(&self.scheme_key(scheme));
        mac.update(input.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn create_credential(&self, hashed_action: &str) -> String {
        let digest = self.tick_mac(self.tick(), hashed_action).finalize().into_bytes();
        hex::encode(&digest[..CREDENTIAL_BYTES])
    }

    fn verify_credential(&self, candidate: &str, hashed_action: &str) -> bool {
        self.check_credential(candidate, hashed_action).is_some()
    }

    fn nonce_life(&self) -> &NonceLife {
        &self.life
    }

    fn default_nonce_life(&self) -> u64 {
        self.default_life
    }

    fn current_request(&self) -> RequestParams {
        self.request
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn home_url(&self) -> String {
        self.home_url.clone()
    }
}

impl fmt::Debug for HmacHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacHost")
            .field("salt", &"<redacted>")
            .field("tenant", &self.current_tenant_id())
            .field("home_url", &self.home_url)
            .field("life", &self.life)
            .field("default_life", &self.default_life)
            .finish_non_exhaustive()
    }
}
