//! Error envelopes returned by the proxy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message sent for any failure that is not a backend status.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// A failed proxy request, rendered as `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The backend answered with a non-OK status; it is passed through.
    Upstream { status: u16, message: String },
    /// Network failure, exhausted retries, bad JSON or missing credential.
    Internal,
}

impl ProxyError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Upstream { message, .. } => message,
            Self::Internal => INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::upstream(404, "x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ProxyError::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ProxyError::Internal.message(), "Internal server error");
        // Out-of-range codes cannot be relayed as-is.
        assert_eq!(ProxyError::upstream(1000, "x").status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_envelope_body() {
        let response = ProxyError::upstream(503, "HTTP 503").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "success": false, "error": "HTTP 503" }));
    }
}
