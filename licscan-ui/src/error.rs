//! Error types for licscan-ui
//!
//! - [`ClientError`]: failures talking to the authentication and analysis services
//! - [`UiError`]: handler-level errors rendered as JSON responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Backend client errors
///
/// `Display` of [`ClientError::RequestFailed`] and [`ClientError::Stream`] is the
/// raw server/transport text: the analysis page shows it verbatim.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Token endpoint answered with a non-success status
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// User-creation endpoint answered with a non-success status
    #[error("Registration failed")]
    RegistrationFailed,

    /// No bearer token is held; nothing was sent
    #[error("Not logged in. Please log in and try again.")]
    MissingSession,

    /// Non-success status before the body was read; message is the server's body text
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Failure while reading the response stream
    #[error("{0}")]
    Stream(String),

    /// Connection could not be established or the request could not be sent
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum UiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. an analysis is already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request understood but rejected by local validation (422)
    #[error("{0}")]
    Unprocessable(String),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            UiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            UiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            UiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_displays_server_text_verbatim() {
        let err = ClientError::RequestFailed {
            status: 400,
            message: "requirements file is empty".to_string(),
        };
        assert_eq!(err.to_string(), "requirements file is empty");
    }

    #[test]
    fn test_stream_error_displays_verbatim() {
        assert_eq!(ClientError::Stream("boom".to_string()).to_string(), "boom");
    }

    #[test]
    fn test_ui_error_status_codes() {
        let response = UiError::Conflict("busy".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = UiError::Unprocessable("no file".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
