//! Error types.

/// Errors surfaced by this crate.
///
/// Validation misses are not errors: [`Nonce::validate`](crate::Nonce::validate)
/// answers `false` for them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NonceError {
    /// A mutation was attempted on a read-only context.
    #[error("can't call {operation}, {context} is read only")]
    ReadOnlyContext {
        operation: &'static str,
        context: &'static str,
    },

    /// A configured salt could not be decoded.
    #[error("invalid nonce salt: {0}")]
    InvalidSalt(String),
}

impl NonceError {
    pub(crate) fn read_only(operation: &'static str, context: &'static str) -> Self {
        Self::ReadOnlyContext { operation, context }
    }
}
