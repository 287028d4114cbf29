//! Request building and response decoding shared by every endpoint.

use crate::errors::{PortoneError, Result};
use crate::types::Envelope;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use url::Url;

/// Media type used for every request and response body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Appends path segments to `base`, percent-encoding each one.
///
/// # Examples
///
/// ```
/// use portone::utils::join_path;
/// use url::Url;
///
/// let base = Url::parse("https://api.iamport.kr").unwrap();
/// let url = join_path(&base, &["payments", "imp_1/2"]).unwrap();
/// assert_eq!(url.as_str(), "https://api.iamport.kr/payments/imp_1%2F2");
/// ```
pub fn join_path(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PortoneError::ConfigError(format!("base URL cannot carry paths: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Builds a JSON request, serializing `body` when one is given.
pub fn new_request<B>(
    http: &reqwest::Client,
    method: Method,
    url: Url,
    body: Option<&B>,
) -> Result<Request>
where
    B: Serialize + ?Sized,
{
    let mut builder = http
        .request(method, url)
        .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
        .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

    if let Some(body) = body {
        builder = builder.body(serde_json::to_vec(body)?);
    }

    Ok(builder.build()?)
}

/// Decodes a response body into an [`Envelope`].
///
/// The body is decoded whatever the HTTP status, since the gateway reports
/// errors inside the envelope as well.
pub async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), url = %response.url(), "Non-success HTTP status");
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Converts Unix seconds into a UTC instant.
pub fn timestamp_to_datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| PortoneError::InvalidResponse(format!("timestamp out of range: {}", secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_path_keeps_base_prefix() {
        let base = Url::parse("http://127.0.0.1:9000/v1/").unwrap();
        let url = join_path(&base, &["users", "getToken"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1/users/getToken");
    }

    #[test]
    fn test_new_request_sets_json_headers_and_body() {
        let http = reqwest::Client::new();
        let url = Url::parse("http://localhost/payments/prepare").unwrap();
        let body = json!({"merchant_uid": "m-1", "amount": 1000});

        let request = new_request(&http, Method::POST, url, Some(&body)).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(request.headers()[ACCEPT], CONTENT_TYPE_JSON);
        let sent: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn test_new_request_without_body() {
        let http = reqwest::Client::new();
        let url = Url::parse("http://localhost/payments/imp_1").unwrap();

        let request = new_request::<()>(&http, Method::GET, url, None).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let at = timestamp_to_datetime(1_700_000_000).unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert!(timestamp_to_datetime(i64::MAX).is_err());
    }
}
