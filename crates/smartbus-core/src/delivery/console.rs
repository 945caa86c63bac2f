//! Development-mode gateway.

use async_trait::async_trait;
use tracing::warn;

use super::{DeliveryError, DeliveryGateway};
use crate::phone::PhoneNumber;

/// Writes the message to the server log instead of sending it.
///
/// This is the only place a code is allowed to appear in logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleGateway;

#[async_trait]
impl DeliveryGateway for ConsoleGateway {
    async fn send(&self, phone: &PhoneNumber, message: &str) -> Result<(), DeliveryError> {
        warn!(phone = %phone, body = message, "[DEV MODE] SMS not sent, printing instead");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
