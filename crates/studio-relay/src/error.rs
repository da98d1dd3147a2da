//! Error types for the studio relay

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for relay operations
#[derive(Error, Debug)]
pub enum StudioError {
    /// Missing credential or invalid configuration, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request failed validation before any side effect was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion API answered with a non-success status
    #[error("Upstream error: {status}")]
    Upstream { status: u16, body: String },

    /// Connection-level failure talking to the completion API
    #[error("Network error: {0}")]
    Network(String),

    /// The completion API answered successfully but without usable content
    #[error("Upstream returned an empty completion")]
    EmptyCompletion,

    /// The mail transport rejected or failed a delivery
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Failure after streaming to the client has begun
    #[error("Relay error: {0}")]
    Relay(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StudioError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            StudioError::Config(_) => "config",
            StudioError::Validation(_) => "validation",
            StudioError::Upstream { .. } | StudioError::Network(_) | StudioError::EmptyCompletion => {
                "upstream"
            }
            StudioError::Delivery(_) => "delivery",
            StudioError::Relay(_) => "relay",
            StudioError::Io(_) => "io",
            StudioError::Serialization(_) => "serialization",
        }
    }

    /// HTTP status reported to the caller for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StudioError::Validation(_) => StatusCode::BAD_REQUEST,
            StudioError::Upstream { .. } | StudioError::Network(_) | StudioError::EmptyCompletion => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Upstream bodies and internal
    /// details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            StudioError::Validation(msg) => msg.clone(),
            StudioError::Upstream { .. } | StudioError::Network(_) | StudioError::EmptyCompletion => {
                "Upstream API error".to_string()
            }
            StudioError::Delivery(_) => "Failed to send message".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_display() {
        let err = StudioError::Config("OPENAI_API_KEY is missing".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: OPENAI_API_KEY is missing"
        );

        let err = StudioError::Upstream {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream error: 503");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(StudioError::Config("x".into()).category(), "config");
        assert_eq!(StudioError::Validation("x".into()).category(), "validation");
        assert_eq!(StudioError::Network("x".into()).category(), "upstream");
        assert_eq!(StudioError::EmptyCompletion.category(), "upstream");
        assert_eq!(StudioError::Delivery("x".into()).category(), "delivery");
        assert_eq!(StudioError::Relay("x".into()).category(), "relay");
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let response =
            StudioError::Validation("Name, email, and message are required.".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Name, email, and message are required.");
    }

    #[tokio::test]
    async fn test_upstream_error_response_hides_body() {
        let response = StudioError::Upstream {
            status: 401,
            body: r#"{"error":"invalid key sk-123"}"#.to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();
        assert!(body_str.contains("Upstream API error"));
        assert!(!body_str.contains("sk-123"));
    }

    #[tokio::test]
    async fn test_delivery_error_response() {
        let response = StudioError::Delivery("smtp down".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to send message");
    }
}
