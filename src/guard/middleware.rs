//! Nonce guard middleware implementation.

use super::extract::{is_form, request_params};
use crate::context::RequestContext;
use crate::host::NonceHost;
use crate::nonce::{HostNonce, Nonce};
use axum::{
    body::Body,
    http::{request::Parts, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use std::{
    error::Error as StdError,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Largest request body buffered while looking for a nonce (64 KiB).
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Layer that requires a valid nonce on state-changing requests.
///
/// GET, HEAD, OPTIONS and TRACE requests pass through. Any other request must
/// carry the credential for the guarded action, either in the query string or
/// in a form-encoded body, or it is answered with `403 Forbidden`. Only
/// form-encoded bodies are buffered; other bodies are forwarded untouched and
/// the nonce must then be in the query string.
///
/// # Example
///
/// ```rust,ignore
/// use nonce_core::{HmacHost, NonceGuardLayer};
///
/// let host = Arc::new(HmacHost::new(salt));
/// let router = Router::new()
///     .route("/settings", post(save_settings))
///     .layer(NonceGuardLayer::new(host, "save-settings"));
/// ```
pub struct NonceGuardLayer<H: NonceHost + ?Sized> {
    nonce: HostNonce<H>,
    body_limit: usize,
}

impl<H: NonceHost + ?Sized> NonceGuardLayer<H> {
    /// Guard with a nonce for `action` and the default life.
    pub fn new(host: Arc<H>, action: impl Into<String>) -> Self {
        Self::from_nonce(HostNonce::new(host, action))
    }

    /// Guard with an already configured nonce.
    pub fn from_nonce(nonce: HostNonce<H>) -> Self {
        Self {
            nonce,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Change how many body bytes are buffered before giving up.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<H: NonceHost + ?Sized> Clone for NonceGuardLayer<H> {
    fn clone(&self) -> Self {
        Self {
            nonce: self.nonce.clone(),
            body_limit: self.body_limit,
        }
    }
}

impl<S, H: NonceHost + ?Sized> Layer<S> for NonceGuardLayer<H> {
    type Service = NonceGuardService<S, H>;

    fn layer(&self, inner: S) -> Self::Service {
        NonceGuardService {
            inner,
            nonce: self.nonce.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// Service that validates the nonce before calling the inner service.
pub struct NonceGuardService<S, H: NonceHost + ?Sized> {
    inner: S,
    nonce: HostNonce<H>,
    body_limit: usize,
}

impl<S: Clone, H: NonceHost + ?Sized> Clone for NonceGuardService<S, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            nonce: self.nonce.clone(),
            body_limit: self.body_limit,
        }
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn reject(action: &str, parts: &Parts) -> Response {
    tracing::warn!(
        action,
        method = %parts.method,
        path = parts.uri.path(),
        "rejected request with invalid nonce"
    );
    (StatusCode::FORBIDDEN, "Invalid nonce").into_response()
}

fn exceeds_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<LengthLimitError>() {
            return true;
        }
        current = err.source();
    }
    false
}

impl<S, H> Service<Request<Body>> for NonceGuardService<S, H>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    H: NonceHost + ?Sized + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let nonce = self.nonce.clone();
        let body_limit = self.body_limit;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_safe(req.method()) {
                return inner.call(req).await;
            }

            let (parts, body) = req.into_parts();
            if !is_form(&parts) {
                let context = RequestContext::new(&request_params(&parts, &[]));
                if !nonce.validate(Some(&context)) {
                    return Ok(reject(nonce.action(), &parts));
                }
                return inner.call(Request::from_parts(parts, body)).await;
            }

            let bytes = match axum::body::to_bytes(body, body_limit).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let err = err.into_inner();
                    if exceeds_limit(&*err) {
                        tracing::warn!(
                            action = nonce.action(),
                            "request body too large for nonce check"
                        );
                        return Ok(
                            (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
                                .into_response(),
                        );
                    }
                    tracing::warn!(
                        action = nonce.action(),
                        error = %err,
                        "failed to read request body"
                    );
                    return Ok(
                        (StatusCode::BAD_REQUEST, "Failed to read request body").into_response(),
                    );
                }
            };

            let context = RequestContext::new(&request_params(&parts, &bytes));
            if !nonce.validate(Some(&context)) {
                return Ok(reject(nonce.action(), &parts));
            }

            inner.call(Request::from_parts(parts, Body::from(bytes))).await
        })
    }
}
