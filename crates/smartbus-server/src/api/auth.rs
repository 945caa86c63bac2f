//! Phone-number login endpoints.
//!
//! Login is two calls: `send-otp` texts a 6-digit code to the phone, and
//! `verify-otp` exchanges that code for a verified identity. Codes are valid
//! for five minutes and allow three wrong guesses.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use smartbus_core::VerifiedIdentity;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Creates the auth router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for sending a code.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "phoneNumber": "9876543210" }))]
pub struct SendOtpRequest {
    /// 10-digit phone number without country code.
    #[serde(default)]
    #[schema(example = "9876543210", pattern = "^[0-9]{10}$")]
    pub phone_number: Option<String>,
}

/// Response after a code was sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "OTP sent successfully to your phone"
}))]
pub struct SendOtpResponse {
    /// Always `true`.
    #[schema(example = true)]
    pub success: bool,

    /// Human-readable status.
    #[schema(example = "OTP sent successfully to your phone")]
    pub message: String,
}

/// Request body for verifying a code.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "phoneNumber": "9876543210", "otp": "123456" }))]
pub struct VerifyOtpRequest {
    /// The phone number the code was sent to.
    #[serde(default)]
    #[schema(example = "9876543210")]
    pub phone_number: Option<String>,

    /// The 6-digit code from the SMS.
    #[serde(default)]
    #[schema(example = "123456")]
    pub otp: Option<String>,
}

/// Response after a successful verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "OTP verified successfully",
    "identity": {
        "phoneNumber": "9876543210",
        "verifiedAt": "2025-01-15T03:30:00Z"
    }
}))]
pub struct VerifyOtpResponse {
    /// Always `true`.
    #[schema(example = true)]
    pub success: bool,

    /// Human-readable status.
    #[schema(example = "OTP verified successfully")]
    pub message: String,

    /// Who logged in and when.
    pub identity: VerifiedIdentity,
}

// ============================================================================
// Handlers
// ============================================================================

/// Send a login code by SMS.
#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    tag = "auth",
    operation_id = "sendOtp",
    summary = "Send a one-time login code",
    description = "Generates a 6-digit code and texts it to the phone number. \
        Requesting a new code replaces any earlier one and resets its attempt \
        counter. The code itself is never returned in the response.",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = SendOtpResponse),
        (status = 400, description = "Missing or malformed phone number", body = ErrorResponse),
        (status = 502, description = "SMS delivery failed", body = ErrorResponse)
    )
)]
pub async fn send_otp(
    State(state): State<SharedState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> ApiResult<Json<SendOtpResponse>> {
    let Json(request) = payload?;

    let phone_number = request.phone_number.unwrap_or_default();
    if phone_number.is_empty() {
        return Err(ApiError::missing_field("Phone number is required"));
    }

    state.otp().issue_code(&phone_number).await?;

    let message = if state.console_delivery() {
        "OTP sent (check server console)"
    } else {
        "OTP sent successfully to your phone"
    };

    Ok(Json(SendOtpResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// Exchange a login code for a verified identity.
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    tag = "auth",
    operation_id = "verifyOtp",
    summary = "Verify a one-time login code",
    description = "Checks the code sent by `sendOtp`. A code can be used once. \
        Wrong codes report how many attempts remain; after three wrong codes, \
        or five minutes, a new code must be requested.",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = VerifyOtpResponse),
        (status = 400, description = "Missing fields, wrong, expired or unknown code", body = ErrorResponse),
        (status = 429, description = "Too many wrong codes", body = ErrorResponse)
    )
)]
pub async fn verify_otp(
    State(state): State<SharedState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyOtpResponse>> {
    let Json(request) = payload?;

    let phone_number = request.phone_number.unwrap_or_default();
    let otp = request.otp.unwrap_or_default();
    let identity = state.otp().verify_code(&phone_number, &otp)?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
        identity,
    }))
}
