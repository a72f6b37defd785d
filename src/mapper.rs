//! Classification of service responses.
//!
//! The status range decides first (2xx success, 4xx client-caused, 5xx
//! service-caused); for 4xx the service error code carried in the body refines
//! the category. Nothing here retries.

use crate::errors::{ApiError, OpenpayError, Result, TransportErrorKind};
use crate::transport::RawResponse;
use serde::Deserialize;

/// Service error codes with a dedicated category.
pub mod codes {
    /// Unexpected internal error
    pub const INTERNAL_ERROR: u32 = 1000;
    /// Malformed request or invalid field
    pub const BAD_REQUEST: u32 = 1001;
    /// Missing or wrong credentials
    pub const UNAUTHORIZED: u32 = 1002;
    /// Parameter failed validation
    pub const UNPROCESSABLE_ENTITY: u32 = 1003;
    /// Service temporarily unavailable
    pub const SERVICE_UNAVAILABLE: u32 = 1004;
    /// Resource does not exist
    pub const NOT_FOUND: u32 = 1005;
    /// Duplicate order identifier or conflicting state
    pub const CONFLICT: u32 = 1006;
    /// Public key used on a private endpoint
    pub const PUBLIC_KEY_FORBIDDEN: u32 = 1010;
    /// Resource was permanently deleted
    pub const RESOURCE_DELETED: u32 = 1011;
    /// Merchant already exists
    pub const MERCHANT_EXISTS: u32 = 1016;
    /// Bank account already registered
    pub const BANK_ACCOUNT_EXISTS: u32 = 2001;
    /// Card already registered
    pub const CARD_EXISTS: u32 = 2002;
    /// Customer with the same external id exists
    pub const CUSTOMER_EXISTS: u32 = 2003;
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    http_code: Option<u16>,
    #[serde(default)]
    error_code: Option<u32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

/// Passes successful responses through and turns everything else into an error.
pub fn check(response: RawResponse) -> Result<RawResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(map_error(response.status, &response.body))
    }
}

/// Builds the structured error for a non-2xx response.
///
/// # Examples
///
/// ```
/// use openpay_rs::errors::OpenpayError;
/// use openpay_rs::mapper::map_error;
///
/// let body = r#"{
///     "category": "request",
///     "description": "The requested resource doesn't exist",
///     "http_code": 404,
///     "error_code": 1005
/// }"#;
/// let err = map_error(404, body);
/// assert!(matches!(err, OpenpayError::NotFound(_)));
/// assert_eq!(err.error_code(), Some(1005));
/// ```
pub fn map_error(status: u16, body: &str) -> OpenpayError {
    if !(400..600).contains(&status) {
        return OpenpayError::transport(
            TransportErrorKind::Other,
            format!("unexpected HTTP status {}", status),
        );
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let description = parsed
        .description
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    let mut error = ApiError {
        http_code: parsed.http_code.unwrap_or(status),
        error_code: parsed.error_code,
        description,
        category: parsed.category,
        request_id: parsed.request_id,
        field: parsed.field,
    };

    if status >= 500 {
        return OpenpayError::Service(error);
    }
    if status == 429 {
        return OpenpayError::RateLimited(error);
    }

    match error.error_code {
        Some(codes::UNAUTHORIZED | codes::PUBLIC_KEY_FORBIDDEN) => {
            OpenpayError::Authentication(error)
        }
        Some(codes::NOT_FOUND | codes::RESOURCE_DELETED) => OpenpayError::NotFound(error),
        Some(
            codes::CONFLICT
            | codes::MERCHANT_EXISTS
            | codes::BANK_ACCOUNT_EXISTS
            | codes::CARD_EXISTS
            | codes::CUSTOMER_EXISTS,
        ) => OpenpayError::Conflict(error),
        _ => match status {
            401 | 403 => OpenpayError::Authentication(error),
            404 | 410 => OpenpayError::NotFound(error),
            409 => OpenpayError::Conflict(error),
            _ => {
                if error.field.is_none() {
                    error.field = offending_field(&error.description);
                }
                OpenpayError::Validation(error)
            }
        },
    }
}

/// Extracts the parameter name from messages like `holder_name is required`.
fn offending_field(description: &str) -> Option<String> {
    const PREDICATES: [&str; 7] = ["is", "must", "length", "cannot", "can't", "should", "was"];

    let mut words = description.split_whitespace();
    let first = words.next()?.trim_matches(|c: char| c == '\'' || c == '"' || c == ':');
    let next = words.next().unwrap_or_default();

    let looks_like_field = !first.is_empty()
        && first
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
    let names_a_field = first.contains('_') || PREDICATES.contains(&next);

    (looks_like_field && names_a_field).then(|| first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(http_code: u16, error_code: u32, description: &str) -> String {
        json!({
            "category": "request",
            "description": description,
            "http_code": http_code,
            "error_code": error_code,
            "request_id": "4a7b4b1f-8a1f-4e5c-9c37-1c1c6e5a0a9d"
        })
        .to_string()
    }

    #[test]
    fn test_success_passes_through() {
        let response = RawResponse::new(200, "{}");
        assert_eq!(check(response.clone()).unwrap(), response);
        assert!(check(RawResponse::new(204, "")).is_ok());
    }

    #[test]
    fn test_not_found() {
        let err = map_error(404, &body(404, 1005, "The customer with id 'x' does not exist"));
        assert!(matches!(err, OpenpayError::NotFound(_)));
        let api = err.api_error().unwrap();
        assert_eq!(api.request_id.as_deref(), Some("4a7b4b1f-8a1f-4e5c-9c37-1c1c6e5a0a9d"));
        assert_eq!(api.category.as_deref(), Some("request"));
    }

    #[test]
    fn test_code_refines_status() {
        assert!(matches!(
            map_error(401, &body(401, 1002, "bad key")),
            OpenpayError::Authentication(_)
        ));
        assert!(matches!(
            map_error(403, &body(403, 1010, "use the private key")),
            OpenpayError::Authentication(_)
        ));
        assert!(matches!(
            map_error(409, &body(409, 1006, "The order_id has already been processed")),
            OpenpayError::Conflict(_)
        ));
        assert!(matches!(
            map_error(409, &body(409, 2002, "card exists")),
            OpenpayError::Conflict(_)
        ));
        assert!(matches!(map_error(404, &body(404, 1011, "deleted")), OpenpayError::NotFound(_)));
        assert!(matches!(
            map_error(402, &body(402, 3001, "The card was declined")),
            OpenpayError::Validation(_)
        ));
    }

    #[test]
    fn test_server_errors_are_service_errors() {
        let err = map_error(500, &body(500, 1000, "Internal server error"));
        assert!(matches!(err, OpenpayError::Service(_)));
        assert!(err.is_transient());

        let err = map_error(503, "<html>Service Unavailable</html>");
        assert!(matches!(err, OpenpayError::Service(_)));
        assert_eq!(err.http_status(), Some(503));
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_rate_limited() {
        assert!(matches!(map_error(429, ""), OpenpayError::RateLimited(_)));
    }

    #[test]
    fn test_validation_names_the_field() {
        let err = map_error(400, &body(400, 1001, "holder_name is required"));
        assert_eq!(err.api_error().unwrap().field.as_deref(), Some("holder_name"));

        let err = map_error(422, &body(422, 1003, "cvv2 length must be 3 digits"));
        assert_eq!(err.api_error().unwrap().field.as_deref(), Some("cvv2"));

        let err = map_error(400, &body(400, 1001, "The request is not valid"));
        assert_eq!(err.api_error().unwrap().field, None);
    }

    #[test]
    fn test_status_without_body() {
        assert!(matches!(map_error(404, ""), OpenpayError::NotFound(_)));
        assert!(matches!(map_error(401, "Unauthorized"), OpenpayError::Authentication(_)));
        assert!(matches!(map_error(400, "not json"), OpenpayError::Validation(_)));
    }

    #[test]
    fn test_unexpected_status_is_transport() {
        let err = map_error(302, "");
        assert!(matches!(
            err,
            OpenpayError::Transport {
                kind: TransportErrorKind::Other,
                ..
            }
        ));
    }
}
