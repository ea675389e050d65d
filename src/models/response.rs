//! Common API response model
//!
//! Defines the unified JSON envelope returned by every endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// Every endpoint returns the same shape:
/// - success: whether the request succeeded
/// - data: response payload (present on success)
/// - message: response message
/// - timestamp: response time (RFC 3339, UTC)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response payload
    pub data: Option<T>,
    /// Response message
    pub message: String,
    /// Response timestamp (ISO 8601 / RFC 3339)
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Build a success response wrapping `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Build an error response carrying `message`.
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(42u32);
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert_eq!(resp.message, "Success");
        assert!(!resp.timestamp.is_empty());
    }

    #[test]
    fn test_error_envelope() {
        let resp = ApiResponse::<()>::error("upstream unavailable".to_string());
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.message, "upstream unavailable");
    }
}
