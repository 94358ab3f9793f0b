//! HTTP client for provider and storage API calls.
//!
//! This module provides an async HTTP client with Bearer authentication
//! and proper error handling, shared by the model provider client and the
//! artifact store client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::shared_client::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_POOL_SIZE};

/// HTTP error details.
#[derive(Debug, Clone)]
pub struct HttpErrorDetail {
    pub status: u16,
    pub url: String,
    pub message: String,
    pub body_snippet: Option<String>,
}

impl std::fmt::Display for HttpErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} for {}: {}", self.status, self.url, self.message)?;
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0} (is_connect={}, is_timeout={})", .0.is_connect(), .0.is_timeout())]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Response(HttpErrorDetail),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("json parse error: {0}")]
    JsonParse(String),
}

impl HttpError {
    /// Create an HTTP error from a response.
    pub fn from_response(status: u16, url: &str, body: Option<&str>) -> Self {
        // Keep enough body to preserve structured JSON error payloads.
        // Display paths still truncate to 200 chars, but parsers (e.g. the
        // already-exists conflict check) need the full object.
        let body_snippet = body.map(|s| s.chars().take(4096).collect());
        HttpError::Response(HttpErrorDetail {
            status,
            url: url.to_string(),
            message: "request_failed".to_string(),
            body_snippet,
        })
    }

    /// Get the HTTP status code, if available.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Response(detail) => Some(detail.status),
            HttpError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Async HTTP client with Bearer authentication.
///
/// # Example
///
/// ```ignore
/// let client = HttpClient::new("https://api.example.com", "r8_...", 30)?;
/// let result: Value = client.get("/v1/trainings/abc", None).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for the API (without trailing slash)
    /// * `api_key` - API key for Bearer authentication (empty disables auth)
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();

        // Only add the auth header if api_key is non-empty
        if !api_key.is_empty() {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|_| HttpError::InvalidUrl("invalid api key characters".to_string()))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(DEFAULT_POOL_SIZE)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .map_err(HttpError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a relative path to an absolute URL.
    fn abs_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Make a GET request.
    ///
    /// # Arguments
    ///
    /// * `path` - API path (relative or absolute)
    /// * `params` - Optional query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<T, HttpError> {
        let url = self.abs_url(path);
        let mut req = self.client.get(&url);

        if let Some(p) = params {
            req = req.query(p);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        self.parse_json(status, &url, &body)
    }

    /// Make a POST request with JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - API path
    /// * `body` - JSON body to send
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, HttpError> {
        let url = self.abs_url(path);
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status().as_u16();
        let body_bytes = resp.bytes().await?;
        self.parse_json(status, &url, &body_bytes)
    }

    /// Make a POST request with a raw byte body and explicit content type.
    ///
    /// Used for object storage uploads, where the payload is the object
    /// itself rather than a JSON document.
    pub async fn post_bytes(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), HttpError> {
        let url = self.abs_url(path);
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let status = resp.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = resp.bytes().await?;
        let text = String::from_utf8_lossy(&body);
        Err(HttpError::from_response(
            status,
            &url,
            if text.trim().is_empty() { None } else { Some(&text) },
        ))
    }

    fn parse_json<T: DeserializeOwned>(
        &self,
        status: u16,
        url: &str,
        body: &[u8],
    ) -> Result<T, HttpError> {
        if !(200..300).contains(&status) {
            let text = String::from_utf8_lossy(body);
            return Err(HttpError::from_response(status, url, Some(&text)));
        }

        serde_json::from_slice(body).map_err(|e| {
            let text = String::from_utf8_lossy(body);
            HttpError::JsonParse(format!("{}: {}", e, &text[..text.len().min(100)]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_abs_url_relative() {
        let client = HttpClient::new("https://api.example.com", "test_key", 30).unwrap();
        assert_eq!(
            client.abs_url("/v1/trainings"),
            "https://api.example.com/v1/trainings"
        );
        assert_eq!(
            client.abs_url("v1/trainings"),
            "https://api.example.com/v1/trainings"
        );
    }

    #[test]
    fn test_abs_url_absolute() {
        let client = HttpClient::new("https://api.example.com", "test_key", 30).unwrap();
        assert_eq!(
            client.abs_url("https://other.com/path"),
            "https://other.com/path"
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::from_response(404, "https://api.example.com/test", Some("not found"));
        let msg = format!("{}", err);
        assert!(msg.contains("404"));
        assert!(msg.contains("api.example.com"));
    }

    #[tokio::test]
    async fn test_get_json_and_error_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/ok");
                then.status(200).json_body(serde_json::json!({"ok": true}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/missing");
                then.status(404).body("no such thing");
            })
            .await;

        let client = HttpClient::new(&server.base_url(), "test_key", 5).unwrap();

        let ok: Value = client.get("/v1/ok", None).await.unwrap();
        assert_eq!(ok.get("ok").and_then(|v| v.as_bool()), Some(true));

        let err = client.get::<Value>("/v1/missing", None).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_post_bytes_success_and_failure() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/object/bucket/a.bin")
                    .header("content-type", "application/octet-stream");
                then.status(200).body("{}");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/object/bucket/denied.bin");
                then.status(403).body("forbidden");
            })
            .await;

        let client = HttpClient::new(&server.base_url(), "test_key", 5).unwrap();

        client
            .post_bytes("/object/bucket/a.bin", vec![1, 2, 3], "application/octet-stream")
            .await
            .unwrap();
        upload.assert_async().await;

        let err = client
            .post_bytes("/object/bucket/denied.bin", vec![1], "application/octet-stream")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
