//! OpenAPI specification generation for the SmartBus API.
//!
//! The document is served at `/api/openapi.json`, rendered by Swagger UI at
//! `/swagger-ui`, and written to disk by the `gen-openapi` binary for client
//! generation in the mobile app.

use axum::Json;
use utoipa::OpenApi;

use super::auth::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use super::error::ErrorResponse;
use super::health::HealthResponse;
use smartbus_core::VerifiedIdentity;

/// Serve the OpenAPI specification as JSON.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a pretty-printed string.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Main OpenAPI document structure for SmartBus.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartBus API",
        version = "0.1.0",
        description = r#"
# SmartBus API

Phone-number login for the SmartBus tracking and ticketing app.

## Login flow

1. **sendOtp**: submit a 10-digit phone number. A 6-digit code is sent by SMS.
2. **verifyOtp**: submit the phone number and the code. On success the
   response carries the verified identity.

## Rules

- A code is valid for **5 minutes** and can be used **once**.
- **3** wrong codes lock the code; request a new one.
- Requesting a new code replaces the previous one and resets the counter.
- Failures always return `success: false` with an `error` code and a `message`.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local SmartBus server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks and system status"
        ),
        (
            name = "auth",
            description = "One-time-password login by phone number"
        )
    ),
    paths(
        super::health::health_check,
        super::auth::send_otp,
        super::auth::verify_otp,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            SendOtpRequest,
            SendOtpResponse,
            VerifyOtpRequest,
            VerifyOtpResponse,
            VerifiedIdentity,
        )
    )
)]
pub struct ApiDoc;
