//! HTTP transport for link probes
//!
//! This module handles the raw HTTP requests issued by the validator, including:
//! - Building HTTP clients with proper user agent strings
//! - Disabling redirect following (the 3xx status is the datum of interest)
//! - Disabling caches so every probe reaches the origin
//!
//! Timeouts and cancellation are owned by the validator, not the client.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::{redirect::Policy, Client, Method};
use std::fmt;
use thiserror::Error;

/// HTTP method used for a probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    /// Lightweight existence check, no response body
    Head,
    /// Full-body-capable fallback
    Get,
}

impl ProbeMethod {
    fn as_reqwest(&self) -> Method {
        match self {
            Self::Head => Method::HEAD,
            Self::Get => Method::GET,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("HEAD"),
            Self::Get => f.write_str("GET"),
        }
    }
}

/// A transport-level failure (no HTTP response was received)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,

    /// The transport itself reported a timeout
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            Self::timeout(message)
        } else if error.is_connect() {
            Self::new(format!("Connection failed: {}", message))
        } else {
            Self::new(message)
        }
    }
}

/// Sends one probe and reports the response status
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues `method` against `url` and returns the HTTP status code
    ///
    /// Dropping the returned future must abort the in-flight request.
    async fn send(&self, url: &str, method: ProbeMethod) -> Result<u16, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// The client carries no timeout of its own; the validator bounds every
/// attempt with the configured request timeout.
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ripple_check::config::UserAgentConfig;
/// use ripple_check::checker::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, method: ProbeMethod) -> Result<u16, TransportError> {
        let response = self
            .client
            .request(method.as_reqwest(), url)
            .send()
            .await?;
        // The body is never read; dropping the response releases the connection.
        Ok(response.status().as_u16())
    }
}
