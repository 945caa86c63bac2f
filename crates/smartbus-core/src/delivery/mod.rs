//! SMS delivery gateways.
//!
//! The session store only knows the [`DeliveryGateway`] trait: hand over a
//! phone number and a message, get back success or failure. The adapters are:
//!
//! - [`TwilioGateway`] - Twilio Programmable Messaging REST API
//! - [`ConsoleGateway`] - development mode, logs the message instead of sending it
//! - [`FallbackGateway`] - tries a primary gateway, falls back to the console
//! - `RecordingGateway` - scripted gateway for tests (feature `testing`)

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ConfigError, DeliveryConfig, DeliveryMode};
use crate::phone::PhoneNumber;

mod console;
mod fallback;
#[cfg(any(test, feature = "testing"))]
mod recording;
mod twilio;

pub use console::ConsoleGateway;
pub use fallback::FallbackGateway;
#[cfg(any(test, feature = "testing"))]
pub use recording::{RecordingGateway, SentMessage};
pub use twilio::TwilioGateway;

/// Why a message could not be delivered.
///
/// These details are for server logs only. Callers of the session store
/// see a generic `DeliveryFailed`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The provider answered with a non-success status.
    #[error("provider rejected message with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Response body, usually a JSON error document.
        body: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider accepted the request but the response was unreadable.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

/// Sends a text message to a phone number.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Deliver `message` to `phone`. Implementations must not retry.
    async fn send(&self, phone: &PhoneNumber, message: &str) -> Result<(), DeliveryError>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// Build the gateway described by the delivery configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] if the console gateway or the
/// console fallback is requested in production.
pub fn build_gateway(
    config: &DeliveryConfig,
    production: bool,
) -> Result<Arc<dyn DeliveryGateway>, ConfigError> {
    if production && config.prints_codes() {
        return Err(ConfigError::ValidationError {
            field: "delivery.mode",
            message: "console delivery prints codes to the log and cannot be used in production"
                .to_string(),
        });
    }

    let primary: Arc<dyn DeliveryGateway> = match config.mode {
        DeliveryMode::Console => Arc::new(ConsoleGateway),
        DeliveryMode::Twilio => Arc::new(TwilioGateway::new(config.twilio.clone())),
    };

    if config.fallback_to_console && config.mode != DeliveryMode::Console {
        Ok(Arc::new(FallbackGateway::new(primary)))
    } else {
        Ok(primary)
    }
}
