//! API error types and response handling.
//!
//! Every failure leaves a handler as a JSON body with `success: false`, a
//! machine-readable `error` code and a human-readable `message`. OTP errors
//! keep the status code chosen by [`OtpError::http_status_code`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use smartbus_core::OtpError;
use utoipa::ToSchema;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// An OTP issuance or verification failure.
    Otp(OtpError),

    /// 400 Bad Request - the body could not be read or a field is missing.
    BadRequest {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },
}

/// Standard JSON failure body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "success": false,
    "error": "INVALID_CODE",
    "message": "Invalid OTP. 2 attempts remaining.",
    "remainingAttempts": 2
}))]
pub struct ErrorResponse {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,

    /// Machine-readable error code (e.g., "INVALID_CODE").
    #[schema(example = "INVALID_CODE")]
    pub error: String,

    /// Human-readable error message.
    #[schema(example = "Invalid OTP. 2 attempts remaining.")]
    pub message: String,

    /// Attempts left before the code is locked, present only for `INVALID_CODE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 2, nullable)]
    pub remaining_attempts: Option<u32>,
}

impl ApiError {
    /// 400 for a missing or empty request field.
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::BadRequest {
            error_code: OtpError::MissingFields.error_code().to_string(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Otp(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Otp(err) => ErrorResponse {
                success: false,
                error: err.error_code().to_string(),
                message: err.to_string(),
                remaining_attempts: err.remaining_attempts(),
            },
            Self::BadRequest {
                error_code,
                message,
            } => ErrorResponse {
                success: false,
                error: error_code,
                message,
                remaining_attempts: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Otp(err) => write!(f, "{}: {err}", err.error_code()),
            Self::BadRequest { message, .. } => write!(f, "Bad Request: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        Self::Otp(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            error_code: "INVALID_REQUEST_BODY".to_string(),
            message: rejection.body_text(),
        }
    }
}
