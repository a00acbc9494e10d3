//! Ambient nonce lifetime and its scoped override.
//!
//! Credential creation and verification read a single, host-wide lifetime.
//! Nonces carry their own lifetime, so each create or verify call installs an
//! override for exactly the duration of that call. The returned guard removes
//! the override when dropped, on every exit path including unwinding.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default nonce life in seconds (30 minutes).
pub const DEFAULT_NONCE_LIFE: u64 = 1800;

/// Ambient lifetime used when no override is installed (one day).
pub const DEFAULT_PLATFORM_LIFE: u64 = 86_400;

/// Parse a lifetime given as text.
///
/// Integers are used as is, decimals are truncated toward zero. Anything that
/// is not a non-negative number yields [`DEFAULT_NONCE_LIFE`].
///
/// ```rust
/// use nonce_core::parse_life;
///
/// assert_eq!(parse_life("60"), 60);
/// assert_eq!(parse_life(" 90.7 "), 90);
/// assert_eq!(parse_life("x"), 1800);
/// ```
pub fn parse_life(input: &str) -> u64 {
    parse_life_or(input, DEFAULT_NONCE_LIFE)
}

/// Like [`parse_life`], falling back to `default` for unusable input.
pub fn parse_life_or(input: &str, default: u64) -> u64 {
    let input = input.trim();
    if let Ok(life) = input.parse::<u64>() {
        return life;
    }
    match input.parse::<f64>() {
        Ok(life) if life.is_finite() && life >= 0.0 => life.trunc() as u64,
        _ => default,
    }
}

/// The host's single lifetime setting.
#[derive(Debug)]
pub struct NonceLife {
    platform: u64,
    value: Mutex<Option<u64>>,
    section: Mutex<()>,
}

impl NonceLife {
    /// Create a setting whose un-overridden value is `platform` seconds.
    pub fn new(platform: u64) -> Self {
        Self {
            platform,
            value: Mutex::new(None),
            section: Mutex::new(()),
        }
    }

    /// The lifetime currently in effect.
    pub fn current(&self) -> u64 {
        self.value().unwrap_or(self.platform)
    }

    /// The un-overridden lifetime.
    pub fn platform(&self) -> u64 {
        self.platform
    }

    /// Whether an override is installed right now.
    pub fn is_overridden(&self) -> bool {
        self.value().is_some()
    }

    /// Install `life` as the ambient lifetime until the guard is dropped.
    ///
    /// Holding the guard keeps other overrides out: a second `install` blocks
    /// until the first guard is gone. Do not call `install` again while holding
    /// a guard on the same thread.
    pub fn install(&self, life: u64) -> LifeOverride<'_> {
        let section = self.section.lock().unwrap_or_else(PoisonError::into_inner);
        *self.slot() = Some(life);
        tracing::trace!(life, "installed nonce life override");
        LifeOverride {
            life: self,
            _section: section,
        }
    }

    fn value(&self) -> Option<u64> {
        *self.slot()
    }

    fn slot(&self) -> MutexGuard<'_, Option<u64>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NonceLife {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM_LIFE)
    }
}

/// Guard returned by [`NonceLife::install`].
#[must_use = "the override is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LifeOverride<'a> {
    life: &'a NonceLife,
    _section: MutexGuard<'a, ()>,
}

impl Drop for LifeOverride<'_> {
    fn drop(&mut self) {
        *self.life.slot() = None;
    }
}
