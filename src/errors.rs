//! Error types for the openpay-rs library.
//!
//! Every failed operation surfaces as one [`OpenpayError`]. Service-reported
//! failures carry an [`ApiError`] with the structure needed for programmatic
//! branching (status, service code, description, offending field).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured description of a failed call, as reported by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response
    pub http_code: u16,

    /// Service-specific numeric error code (e.g. 1005 for "not found")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,

    /// Human-readable message
    #[serde(default)]
    pub description: String,

    /// Error category reported by the service ("request", "internal", "gateway")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Identifier the service assigned to the failed request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Offending request parameter, when the service names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.http_code)?;
        if let Some(code) = self.error_code {
            write!(f, ", code {}", code)?;
        }
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        Ok(())
    }
}

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established
    Connect,
    /// The request or response did not complete in time
    Timeout,
    /// The response body could not be read or was not valid JSON
    Body,
    /// Anything else reported by the HTTP client
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Main error type for Openpay operations.
#[derive(Error, Debug)]
pub enum OpenpayError {
    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// The request was rejected as invalid (bad parameter, declined card, ...)
    #[error("Validation error: {0}")]
    Validation(ApiError),

    /// Credentials were missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(ApiError),

    /// Too many requests
    #[error("Rate limited: {0}")]
    RateLimited(ApiError),

    /// The request conflicts with existing state (e.g. duplicate order id)
    #[error("Conflict: {0}")]
    Conflict(ApiError),

    /// The service failed (5xx), possibly transient
    #[error("Service error: {0}")]
    Service(ApiError),

    /// The call never reached the service or its response was unusable
    #[error("Transport error ({kind}): {message}")]
    Transport {
        /// Failure category
        kind: TransportErrorKind,
        /// Underlying error message
        message: String,
    },

    /// A path template could not be composed from the given identifiers
    #[error("Invalid path for '{template}': {reason}")]
    InvalidPath {
        /// The template being composed
        template: String,
        /// Why composition failed
        reason: String,
    },

    /// A wire value did not match any accepted format
    #[error("Codec error: {0}")]
    Codec(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Openpay operations.
pub type Result<T> = std::result::Result<T, OpenpayError>;

impl OpenpayError {
    /// Creates a transport error of the given kind.
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        OpenpayError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// The service-reported error, if this failure came from the service.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            OpenpayError::NotFound(e)
            | OpenpayError::Validation(e)
            | OpenpayError::Authentication(e)
            | OpenpayError::RateLimited(e)
            | OpenpayError::Conflict(e)
            | OpenpayError::Service(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn http_status(&self) -> Option<u16> {
        self.api_error().map(|e| e.http_code)
    }

    /// Service error code, if the service supplied one.
    pub fn error_code(&self) -> Option<u32> {
        self.api_error().and_then(|e| e.error_code)
    }

    /// Whether repeating the call later might succeed.
    ///
    /// Nothing in this crate acts on this; it only informs a caller-side retry policy.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OpenpayError::Service(_)
                | OpenpayError::RateLimited(_)
                | OpenpayError::Transport {
                    kind: TransportErrorKind::Connect | TransportErrorKind::Timeout,
                    ..
                }
        )
    }
}

impl From<reqwest::Error> for OpenpayError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        OpenpayError::transport(kind, err.to_string())
    }
}

impl From<url::ParseError> for OpenpayError {
    fn from(err: url::ParseError) -> Self {
        OpenpayError::Config(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(http_code: u16, error_code: Option<u32>) -> ApiError {
        ApiError {
            http_code,
            error_code,
            description: "The requested resource doesn't exist".to_string(),
            category: Some("request".to_string()),
            request_id: Some("1981cdb8-19cb-4bad-8256-e95d58bc035c".to_string()),
            field: None,
        }
    }

    #[test]
    fn test_error_display() {
        let err = OpenpayError::NotFound(api_error(404, Some(1005)));
        assert_eq!(
            err.to_string(),
            "Not found: HTTP 404, code 1005: The requested resource doesn't exist"
        );

        let err = OpenpayError::transport(TransportErrorKind::Timeout, "deadline elapsed");
        assert_eq!(err.to_string(), "Transport error (timeout): deadline elapsed");
    }

    #[test]
    fn test_accessors() {
        let err = OpenpayError::Conflict(api_error(409, Some(1006)));
        assert_eq!(err.http_status(), Some(409));
        assert_eq!(err.error_code(), Some(1006));

        let err = OpenpayError::Codec("bad date".to_string());
        assert!(err.api_error().is_none());
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_is_transient() {
        assert!(OpenpayError::Service(api_error(500, Some(1000))).is_transient());
        assert!(OpenpayError::RateLimited(api_error(429, None)).is_transient());
        assert!(OpenpayError::transport(TransportErrorKind::Connect, "refused").is_transient());
        assert!(!OpenpayError::transport(TransportErrorKind::Body, "eof").is_transient());
        assert!(!OpenpayError::NotFound(api_error(404, Some(1005))).is_transient());
    }

    #[test]
    fn test_url_error_conversion() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: OpenpayError = url_err.into();
        assert!(matches!(err, OpenpayError::Config(_)));
    }

    #[test]
    fn test_api_error_deserializes_service_body() {
        let body = r#"{
            "category": "request",
            "description": "The customer with id 'xyz' does not exist",
            "http_code": 404,
            "error_code": 1005,
            "request_id": "beb6cd8c-7c9e-4c7b-9e5b-1e4b5b1d6a2e"
        }"#;
        let err: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(err.http_code, 404);
        assert_eq!(err.error_code, Some(1005));
        assert_eq!(err.field, None);
    }
}
