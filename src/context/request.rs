//! Context derived from the parameters of an inbound request.

use super::{ArrayContext, NonceContext};
use crate::error::NonceError;

type Params = Vec<(String, Option<String>)>;

/// Snapshot of the parameters carried by one request.
///
/// Hosts build this from whatever their HTTP layer exposes. Query and body
/// parameters are kept apart so that [`RequestContext`] can apply its own
/// precedence rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// HTTP method as received, any case.
    pub method: String,
    /// Request URI: path plus optional query string.
    pub uri: String,
    /// Parameters from the query string.
    pub query: Params,
    /// Parameters from a form-encoded body.
    pub body: Params,
    /// Platform-provided merge of all parameter sources, if the platform has one.
    pub combined: Option<Params>,
}

impl RequestParams {
    /// Build params for `method` and `uri`, parsing the query string out of `uri`.
    pub fn parse_query(method: impl Into<String>, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query = uri
            .split_once('?')
            .map(|(_, query)| {
                let query = query.split_once('#').map_or(query, |(q, _)| q);
                parse_urlencoded(query)
            })
            .unwrap_or_default();
        Self {
            method: method.into(),
            uri,
            query,
            body: Vec::new(),
            combined: None,
        }
    }

    /// Attach an `application/x-www-form-urlencoded` body.
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.body = parse_urlencoded(body);
        self
    }

    /// Attach the platform's own combined parameter set.
    pub fn with_combined(mut self, combined: Params) -> Self {
        self.combined = Some(combined);
        self
    }

    /// Whether the method is POST, ignoring case.
    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }

    /// The request path without query string or fragment.
    pub fn path(&self) -> &str {
        self.uri
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
    }
}

/// Parse `a=1&b=2` pairs. `+` decodes as a space; a key without `=` gets an
/// empty value. Undecodable pairs are kept raw.
pub(crate) fn parse_urlencoded(input: &str) -> Params {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), Some(decode_component(value)))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Context populated from the query and body parameters of a request.
///
/// For POST requests, query parameters are merged with body parameters and body
/// parameters win on collision. For every other method the platform's combined
/// parameter set is used; when the platform has none, that set is the query
/// overlaid by the body.
///
/// Storage is computed once, at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    context: ArrayContext,
}

impl RequestContext {
    pub fn new(request: &RequestParams) -> Self {
        let entries: Params = match (&request.combined, request.is_post()) {
            (Some(combined), false) => combined.clone(),
            _ => request
                .query
                .iter()
                .chain(request.body.iter())
                .cloned()
                .collect(),
        };
        tracing::trace!(
            method = %request.method,
            params = entries.len(),
            "built request context"
        );
        Self {
            context: ArrayContext::new(entries),
        }
    }

    /// Delegates to the encapsulated context, so always fails.
    pub fn set(&self, key: &str, value: &str) -> Result<(), NonceError> {
        self.context
            .set(key, value)
            .map_err(|_| NonceError::read_only("RequestContext::set", "RequestContext"))
    }

    /// Delegates to the encapsulated context, so always fails.
    pub fn unset(&self, key: &str) -> Result<(), NonceError> {
        self.context
            .unset(key)
            .map_err(|_| NonceError::read_only("RequestContext::unset", "RequestContext"))
    }

    /// Consume the context, returning the merged parameters in storage order.
    pub fn into_entries(self) -> Params {
        self.context.into_entries()
    }
}

impl From<RequestParams> for RequestContext {
    fn from(request: RequestParams) -> Self {
        Self::new(&request)
    }
}

impl NonceContext for RequestContext {
    fn exists(&self, key: &str) -> bool {
        self.context.exists(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.context.get(key)
    }
}
