//! Request plumbing shared by every provider client.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds the shared HTTP client. Clones share one connection pool.
///
/// # Errors
///
/// Returns [`PlacesError::Http`] if the TLS backend cannot be initialised.
pub fn build_client(timeout_secs: u64) -> Result<Client, PlacesError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

/// Percent-encode one path segment or free-text value.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Join `path` onto `base_url`, keeping any path prefix the base carries.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, PlacesError> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|e| PlacesError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Sends the request, asserts a 2xx status, and returns the body text.
///
/// `context` names the call in errors; it must not contain credentials.
pub(crate) async fn send_text(request: RequestBuilder, context: &str) -> Result<String, PlacesError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PlacesError::UnexpectedStatus {
            status: status.as_u16(),
            context: context.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Like [`send_text`], then deserializes the body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, PlacesError> {
    let body = send_text(request, context).await?;
    serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let url = endpoint("http://127.0.0.1:9000/", "/v2/places").expect("valid");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v2/places");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = endpoint("http://proxy.local/geo", "v2/places").expect("valid");
        assert_eq!(url.path(), "/geo/v2/places");
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = endpoint("not a url", "v2/places").unwrap_err();
        assert!(matches!(err, PlacesError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("Lviv Opera (2).jpg"), "Lviv%20Opera%20(2).jpg");
        assert_eq!(encode_component("a/b&c"), "a%2Fb%26c");
        assert_eq!(encode_component("Кава"), "%D0%9A%D0%B0%D0%B2%D0%B0");
    }
}
