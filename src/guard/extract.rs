//! Building request contexts from axum requests.

use crate::context::{RequestContext, RequestParams};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};

/// Snapshot the method, URI, query and form body of a request.
///
/// The body only counts when it is declared as
/// `application/x-www-form-urlencoded`.
pub fn request_params(parts: &Parts, body: &[u8]) -> RequestParams {
    let uri = parts
        .uri
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());
    let request = RequestParams::parse_query(parts.method.as_str(), uri);

    if is_form(parts) {
        request.with_form_body(&String::from_utf8_lossy(body))
    } else {
        request
    }
}

/// Whether the request declares an `application/x-www-form-urlencoded` body.
pub(crate) fn is_form(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = Bytes::from_request(Request::from_parts(parts.clone(), body), state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(RequestContext::new(&request_params(&parts, &bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NonceContext;
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::util::ServiceExt;

    async fn echo(context: RequestContext) -> String {
        context.get("a").unwrap_or("-").to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_post_form_overrides_query() {
        let app = Router::new().route("/", post(echo));

        let request = Request::builder()
            .method("POST")
            .uri("/?a=1")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from("a=2"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "2");
    }

    #[tokio::test]
    async fn test_non_form_body_is_ignored() {
        let app = Router::new().route("/", post(echo));

        let request = Request::builder()
            .method("POST")
            .uri("/?a=1")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"a":"2"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "1");
    }

    #[test]
    fn test_request_params_from_parts() {
        let (parts, _) = Request::builder()
            .method("PUT")
            .uri("http://example.com/p?x=%20y")
            .body(())
            .unwrap()
            .into_parts();

        let params = request_params(&parts, b"ignored=1");
        assert_eq!(params.method, "PUT");
        assert_eq!(params.uri, "/p?x=%20y");
        assert_eq!(params.query, vec![("x".to_string(), Some(" y".to_string()))]);
        assert!(params.body.is_empty());
    }
}
