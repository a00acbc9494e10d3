//! Nonce checking for axum applications.
//!
//! [`NonceGuardLayer`] rejects state-changing requests that do not carry a
//! valid nonce. [`RequestContext`](crate::RequestContext) can also be taken as a
//! handler argument to validate by hand.

mod extract;
mod middleware;

pub use extract::request_params;
pub use middleware::{NonceGuardLayer, NonceGuardService, DEFAULT_BODY_LIMIT};
