//! Status classification
//!
//! Maps an HTTP outcome to exactly one `StatusCategory` and renders a short
//! human-readable description for it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a validation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// 2xx
    Success,
    /// 3xx (redirects are never followed)
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx and above
    ServerError,
    /// The request exceeded its deadline
    Timeout,
    /// Connection failure, cancellation, or any other non-HTTP failure
    NetworkError,
}

impl StatusCategory {
    /// All categories, in report order
    pub const ALL: [StatusCategory; 6] = [
        Self::Success,
        Self::Redirect,
        Self::ClientError,
        Self::ServerError,
        Self::Timeout,
        Self::NetworkError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Redirect => "redirect",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
        }
    }

    /// Returns true for categories that count as a broken reference
    pub fn is_broken(&self) -> bool {
        !matches!(self, Self::Success | Self::Redirect)
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an HTTP status code
///
/// | Code | Category |
/// |------|----------|
/// | `[200, 300)` | success |
/// | `[300, 400)` | redirect |
/// | `[400, 500)` | client_error |
/// | `>= 500` | server_error |
/// | `< 200` or absent | network_error |
///
/// Timeouts never carry a status code, so callers detect them before classifying.
pub fn classify(status: Option<u16>) -> StatusCategory {
    match status {
        Some(200..=299) => StatusCategory::Success,
        Some(300..=399) => StatusCategory::Redirect,
        Some(400..=499) => StatusCategory::ClientError,
        Some(code) if code >= 500 => StatusCategory::ServerError,
        _ => StatusCategory::NetworkError,
    }
}

/// Describes an HTTP status code
pub fn describe(status: u16) -> String {
    let text = match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return format!("HTTP {}", status),
    };
    text.to_string()
}

/// Describes a category that has no status code
pub fn describe_category(category: StatusCategory) -> &'static str {
    match category {
        StatusCategory::Success => "Success",
        StatusCategory::Redirect => "Redirect",
        StatusCategory::ClientError => "Client Error",
        StatusCategory::ServerError => "Server Error",
        StatusCategory::Timeout => "Request Timeout",
        StatusCategory::NetworkError => "Network Error",
    }
}
