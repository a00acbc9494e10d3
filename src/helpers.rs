//! Embedding nonces in URLs and forms.

use crate::host::NonceHost;
use crate::nonce::{HostNonce, Nonce};

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Hidden form field carrying the nonce action as name and credential as value.
///
/// ```rust
/// use std::sync::Arc;
/// use nonce_core::{form_field, HmacHost, HostNonce};
///
/// let nonce = HostNonce::new(Arc::new(HmacHost::new("salt")), "edit");
/// assert!(form_field(&nonce).starts_with(r#"<input type="hidden" name="edit" value=""#));
/// ```
pub fn form_field(nonce: &dyn Nonce) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}" />"#,
        esc_attr(nonce.action()),
        esc_attr(&nonce.to_string())
    )
}

/// Add the nonce to `url` as a query parameter.
///
/// When `url` is `None` or empty the current request URL is used, rebuilt from
/// the host's home URL so that a site living in a sub directory does not get
/// that directory twice.
pub fn nonce_url<H: NonceHost + ?Sized>(nonce: &HostNonce<H>, url: Option<&str>) -> String {
    let url = match url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => current_url(nonce.host()),
    };
    sanitize_url(&add_query_arg(nonce.action(), &nonce.to_string(), &url))
}

/// Canonical URL of the request the host is serving.
///
/// The path is percent-decoded; the query string is kept as sent so encoded
/// delimiters such as `%26` keep their meaning.
pub fn current_url<H: NonceHost + ?Sized>(host: &H) -> String {
    let home = host.home_url();
    let home_path = url_path(&home).trim_matches('/');
    let request = host.current_request();
    let mut current = request.uri.trim_matches('/');

    if !home_path.is_empty() {
        if let Some(rest) = current.strip_prefix(home_path) {
            if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
                current = rest;
            }
        }
    }

    let (path, query) = match current.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (current, None),
    };
    let mut decoded = urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string());
    if let Some(query) = query {
        decoded.push('?');
        decoded.push_str(query);
    }
    join_url(&home, &decoded)
}

/// Append `path` to `base` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.starts_with('?') {
        return format!("{}{}", base.trim_end_matches('/'), path);
    }
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Set query parameter `key` to `value`, replacing an existing `key`.
///
/// Key and value are percent-encoded. A fragment stays at the end.
///
/// ```rust
/// use nonce_core::add_query_arg;
///
/// assert_eq!(add_query_arg("a", "1", "http://h/p#top"), "http://h/p?a=1#top");
/// assert_eq!(add_query_arg("a", "2", "http://h/p?a=1&b=x"), "http://h/p?b=x&a=2");
/// ```
pub fn add_query_arg(key: &str, value: &str, url: &str) -> String {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = rest.split_once('?').unwrap_or((rest, ""));

    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(name, _)| name);
            urlencoding::decode(name).map_or(true, |name| name != key)
        })
        .map(str::to_string)
        .collect();
    pairs.push(format!(
        "{}={}",
        urlencoding::encode(key),
        urlencoding::encode(value)
    ));

    let mut out = format!("{}?{}", base, pairs.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Drop characters that cannot appear in a URL and refuse unknown schemes.
///
/// Returns an empty string for schemes other than http and https.
pub fn sanitize_url(url: &str) -> String {
    let cleaned: String = url.chars().filter(|c| is_url_char(*c)).collect();

    if let Some((scheme, _)) = cleaned.split_once(':') {
        let looks_like_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if looks_like_scheme
            && !ALLOWED_SCHEMES
                .iter()
                .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
        {
            tracing::debug!(%scheme, "refusing url with disallowed scheme");
            return String::new();
        }
    }
    cleaned
}

fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(c)
}

/// Escape text for use inside an HTML attribute value.
pub fn esc_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn url_path(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = after_scheme
        .find('/')
        .map_or("", |start| &after_scheme[start..]);
    path.split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
}
