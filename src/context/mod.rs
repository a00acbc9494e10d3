//! Read-only sources a nonce value is looked up in.
//!
//! A context maps parameter names to values. Nonces use their action as the key,
//! so validating a nonce means asking a context for `action` and checking the
//! value found there.

mod array;
mod request;

pub use array::ArrayContext;
pub use request::{RequestContext, RequestParams};

/// Read-only key/value lookup consulted during validation.
///
/// There is deliberately no way to mutate a context through this trait.
pub trait NonceContext {
    /// Whether `key` is present, even with a null value.
    fn exists(&self, key: &str) -> bool;

    /// The value stored for `key`. Absent keys and null values both yield `None`.
    fn get(&self, key: &str) -> Option<&str>;
}

impl<C: NonceContext + ?Sized> NonceContext for &C {
    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}
