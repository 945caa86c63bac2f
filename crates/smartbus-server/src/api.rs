//! HTTP API routes and handlers.
//!
//! - `auth` - OTP issuance and verification
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::SharedState;

pub mod auth;
pub mod error;
pub mod health;
pub mod openapi;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use openapi::get_openapi_json;

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                - Health check
/// /swagger-ui            - Interactive API docs
/// /api
/// ├── /auth/send-otp     - Send a login code
/// ├── /auth/verify-otp   - Verify a login code
/// └── /openapi.json      - OpenAPI specification
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                .route("/openapi.json", get(openapi::get_openapi_spec))
                .nest("/auth", auth::router()),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .with_state(state)
}

/// [`create_router`] wrapped in request tracing, a request timeout and permissive CORS.
pub fn create_app(state: SharedState, request_timeout: Duration) -> Router {
    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(CorsLayer::permissive()),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::{json, Value};
    use smartbus_core::{OtpPolicy, OtpStore, RecordingGateway};

    use super::*;
    use crate::state::AppState;

    fn server() -> (TestServer, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::new());
        let store = OtpStore::new(gateway.clone(), OtpPolicy::default());
        let app = create_app(
            AppState::new(Arc::new(store), false),
            Duration::from_secs(5),
        );
        (TestServer::new(app).unwrap(), gateway)
    }

    #[tokio::test]
    async fn test_health_route() {
        let (server, _) = server();

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["activeSessions"], 0);
    }

    #[tokio::test]
    async fn test_openapi_route() {
        let (server, _) = server();

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["info"]["title"], "SmartBus API");
    }

    #[tokio::test]
    async fn test_full_login_through_app() {
        let (server, gateway) = server();

        server
            .post("/api/auth/send-otp")
            .json(&json!({ "phoneNumber": "9876543210" }))
            .await
            .assert_status_ok();

        let health: Value = server.get("/health").await.json();
        assert_eq!(health["activeSessions"], 1);

        let code = gateway.last_code_for("9876543210").unwrap();
        server
            .post("/api/auth/verify-otp")
            .json(&json!({ "phoneNumber": "9876543210", "otp": code }))
            .await
            .assert_status_ok();

        let health: Value = server.get("/health").await.json();
        assert_eq!(health["activeSessions"], 0);
    }
}
