//! Nonce configuration.

use super::salt::{decode_salt, generate_random_salt};
use crate::error::NonceError;
use crate::life::{parse_life, DEFAULT_NONCE_LIFE, DEFAULT_PLATFORM_LIFE};

/// Configuration for issuing and validating nonces.
///
/// Reads from environment variables with sensible defaults:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `NONCE_SALT` | (none) | Secret salt, `base64:` prefix for binary salts |
/// | `NONCE_LIFE` | `1800` | Default life of new nonces in seconds |
/// | `NONCE_PLATFORM_LIFE` | `86400` | Ambient lifetime when no nonce overrides it |
/// | `HOME_URL` | `http://localhost` | Site base URL |
/// | `TENANT_ID` | `1` | Tenant nonces are scoped to |
///
/// # Example
///
/// ```rust
/// use nonce_core::NonceConfig;
///
/// let config = NonceConfig::from_env();
/// let (salt, was_generated) = config.get_or_generate_salt().unwrap();
///
/// if was_generated {
///     println!("Generated a {} byte salt", salt.len());
/// }
/// ```
#[derive(Clone)]
pub struct NonceConfig {
    /// Secret salt as configured, not yet decoded
    pub salt: Option<String>,
    /// Default nonce life in seconds (default: 1800)
    pub nonce_life: u64,
    /// Lifetime when no override is installed (default: 86400)
    pub platform_life: u64,
    /// Site base URL (default: http://localhost)
    pub home_url: String,
    /// Initial tenant (default: 1)
    pub tenant_id: String,
}

impl NonceConfig {
    /// Create a new config from environment variables.
    pub fn from_env() -> Self {
        Self {
            salt: std::env::var("NONCE_SALT").ok().filter(|s| !s.is_empty()),
            nonce_life: std::env::var("NONCE_LIFE")
                .map(|life| parse_life(&life))
                .unwrap_or(DEFAULT_NONCE_LIFE),
            platform_life: std::env::var("NONCE_PLATFORM_LIFE")
                .ok()
                .and_then(|life| life.trim().parse().ok())
                .unwrap_or(DEFAULT_PLATFORM_LIFE),
            home_url: std::env::var("HOME_URL").unwrap_or_else(|_| "http://localhost".to_string()),
            tenant_id: std::env::var("TENANT_ID").unwrap_or_else(|_| "1".to_string()),
        }
    }

    /// Check if a salt is configured.
    pub fn has_salt(&self) -> bool {
        self.salt.is_some()
    }

    /// Get the configured salt or generate a new one.
    ///
    /// Returns a tuple of (salt, was_generated).
    pub fn get_or_generate_salt(&self) -> Result<(Vec<u8>, bool), NonceError> {
        match &self.salt {
            Some(raw) => Ok((decode_salt(raw)?, false)),
            None => Ok((generate_random_salt(), true)),
        }
    }
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for NonceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceConfig")
            .field("salt", &self.salt.as_ref().map(|_| "<redacted>"))
            .field("nonce_life", &self.nonce_life)
            .field("platform_life", &self.platform_life)
            .field("home_url", &self.home_url)
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(salt: Option<&str>) -> NonceConfig {
        NonceConfig {
            salt: salt.map(str::to_string),
            nonce_life: DEFAULT_NONCE_LIFE,
            platform_life: DEFAULT_PLATFORM_LIFE,
            home_url: "http://localhost".to_string(),
            tenant_id: "1".to_string(),
        }
    }

    #[test]
    fn test_default_values() {
        // Clear env vars to test defaults
        std::env::remove_var("NONCE_SALT");
        std::env::remove_var("NONCE_LIFE");
        std::env::remove_var("NONCE_PLATFORM_LIFE");
        std::env::remove_var("HOME_URL");
        std::env::remove_var("TENANT_ID");

        let config = NonceConfig::from_env();
        assert!(config.salt.is_none());
        assert!(!config.has_salt());
        assert_eq!(config.nonce_life, 1800);
        assert_eq!(config.platform_life, 86_400);
        assert_eq!(config.home_url, "http://localhost");
        assert_eq!(config.tenant_id, "1");
    }

    #[test]
    fn test_get_or_generate_salt_with_existing() {
        let (salt, generated) = config(Some("pepper")).get_or_generate_salt().unwrap();
        assert_eq!(salt, b"pepper".to_vec());
        assert!(!generated);
    }

    #[test]
    fn test_get_or_generate_salt_without_existing() {
        let (salt, generated) = config(None).get_or_generate_salt().unwrap();
        assert_eq!(salt.len(), 32);
        assert!(generated);
    }

    #[test]
    fn test_invalid_salt_is_reported() {
        let result = config(Some("base64:not base64!")).get_or_generate_salt();
        assert!(matches!(result, Err(NonceError::InvalidSalt(_))));
    }

    #[test]
    fn test_debug_redacts_salt() {
        let rendered = format!("{:?}", config(Some("pepper")));
        assert!(!rendered.contains("pepper"));
    }

    #[cfg(feature = "hmac-host")]
    #[test]
    fn test_host_from_config() {
        use crate::host::{HmacHost, NonceHost};

        let mut config = config(Some("pepper"));
        config.tenant_id = "42".to_string();
        config.home_url = "https://example.org/blog".to_string();
        config.platform_life = 600;
        config.nonce_life = 300;

        let host = std::sync::Arc::new(HmacHost::from_config(&config).unwrap());
        assert_eq!(host.current_tenant_id(), "42");
        assert_eq!(host.home_url(), "https://example.org/blog");
        assert_eq!(host.nonce_life().current(), 600);
        assert_eq!(host.default_nonce_life(), 300);
        assert_eq!(crate::nonce::HostNonce::new(host, "save").life(), 300);
    }
}
