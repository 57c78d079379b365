//! Registration Error Types
//!
//! Recognized validation failures become HTTP 400 with a machine-readable
//! code. Anything else becomes a bare HTTP 500 so internals are not leaked.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pow::PowError;
use serde_json::json;
use thiserror::Error;

/// Registration-specific result type alias
pub type RegistrationResult<T> = Result<T, RegistrationError>;

#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Proof-of-work rejected
    #[error(transparent)]
    ProofOfWork(#[from] PowError),

    /// Submitted terms-of-service hash does not match the current terms
    #[error("Terms of service hash is outdated or invalid")]
    OutdatedOrInvalidTermsOfServiceHash,

    /// Request body does not have the registration request shape
    #[error("Invalid registration request: {0}")]
    InvalidRequest(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// Machine-readable code, present only for recognized validation failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            RegistrationError::ProofOfWork(e) => e.code(),
            RegistrationError::OutdatedOrInvalidTermsOfServiceHash => {
                Some("OutdatedOrInvalidTermsOfServiceHash")
            }
            RegistrationError::InvalidRequest(_) => Some("InvalidRegistrationRequest"),
            RegistrationError::Database(_) | RegistrationError::Internal(_) => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        if self.code().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            RegistrationError::Database(e) => {
                tracing::error!(error = %e, "Registration database error");
            }
            RegistrationError::Internal(msg) => {
                tracing::error!(message = %msg, "Registration internal error");
            }
            RegistrationError::ProofOfWork(e) if !e.is_client_error() => {
                tracing::error!(error = %e, "Registration PoW misconfiguration");
            }
            _ => {
                tracing::warn!(error = %self, code = self.code(), "Registration rejected");
            }
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        match self.code() {
            Some(code) => (
                status,
                Json(json!({ "code": code, "message": self.to_string() })),
            )
                .into_response(),
            None => (status, Json(json!({ "success": false }))).into_response(),
        }
    }
}
