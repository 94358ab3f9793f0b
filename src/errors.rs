//! Core error types for the orchestrator.
//!
//! This module provides the unified error enum shared by packaging,
//! provisioning, training launch, synchronization, and inference.

use crate::http::HttpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error details for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// HTTP status code (e.g., 404, 500)
    pub status: u16,
    /// Request URL
    pub url: String,
    /// Error message
    pub message: String,
    /// First 200 chars of response body (for debugging)
    pub body_snippet: Option<String>,
}

impl std::fmt::Display for HttpErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} for {}: {}", self.status, self.url, self.message)?;
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// Training failure details.
///
/// Raised when the remote training job for a brand reaches a terminal
/// failure state. Not retryable by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingErrorInfo {
    /// Remote job handle that failed
    pub job_id: String,
    /// Error message reported by the provider (or a local summary)
    pub message: String,
}

impl std::fmt::Display for TrainingErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training job {} failed: {}", self.job_id, self.message)
    }
}

/// Unified error enum for all orchestrator errors.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Invalid input provided (unknown ids, malformed references)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing failed
    #[error("url parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP request failed (network layer)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP response error (4xx/5xx)
    #[error("{0}")]
    HttpResponse(HttpErrorInfo),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Request validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Remote training job failed
    #[error("{0}")]
    Training(TrainingErrorInfo),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Timeout error
    #[error("timeout: {0}")]
    Timeout(String),

    /// Protocol/wire format error
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ForgeError {
    /// Create an HTTP response error.
    pub fn http_response(status: u16, url: &str, message: &str, body: Option<&str>) -> Self {
        ForgeError::HttpResponse(HttpErrorInfo {
            status,
            url: url.to_string(),
            message: message.to_string(),
            body_snippet: body.map(|s| s.chars().take(200).collect()),
        })
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ForgeError::Validation(message.into())
    }

    /// Create a training failure error.
    pub fn training(job_id: &str, message: &str) -> Self {
        ForgeError::Training(TrainingErrorInfo {
            job_id: job_id.to_string(),
            message: message.to_string(),
        })
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        ForgeError::Config(message.into())
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        ForgeError::Timeout(message.into())
    }

    /// Check if this is a retryable error (5xx, timeout, network).
    pub fn is_retryable(&self) -> bool {
        match self {
            ForgeError::HttpResponse(info) => info.status >= 500,
            ForgeError::Http(_) => true,
            ForgeError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get HTTP status code if this is an HTTP error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ForgeError::HttpResponse(info) => Some(info.status),
            ForgeError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<HttpError> for ForgeError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) => ForgeError::Http(e),
            HttpError::Response(detail) => ForgeError::HttpResponse(HttpErrorInfo {
                status: detail.status,
                url: detail.url,
                message: detail.message,
                body_snippet: detail.body_snippet,
            }),
            HttpError::InvalidUrl(msg) => ForgeError::InvalidInput(msg),
            HttpError::JsonParse(msg) => ForgeError::Protocol(msg),
        }
    }
}

/// Result type alias using ForgeError.
pub type ForgeResult<T> = Result<T, ForgeError>;
