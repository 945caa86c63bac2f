//! Primary gateway with a console fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{ConsoleGateway, DeliveryError, DeliveryGateway};
use crate::phone::PhoneNumber;

/// Sends through `primary`; if that fails, prints the message via [`ConsoleGateway`].
///
/// Lets a developer log in while the SMS provider is misconfigured. Never
/// built when `server.production` is set.
pub struct FallbackGateway {
    primary: Arc<dyn DeliveryGateway>,
    fallback: ConsoleGateway,
}

impl FallbackGateway {
    /// Wrap `primary`.
    #[must_use]
    pub fn new(primary: Arc<dyn DeliveryGateway>) -> Self {
        Self {
            primary,
            fallback: ConsoleGateway,
        }
    }
}

#[async_trait]
impl DeliveryGateway for FallbackGateway {
    async fn send(&self, phone: &PhoneNumber, message: &str) -> Result<(), DeliveryError> {
        match self.primary.send(phone, message).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    gateway = self.primary.name(),
                    error = %err,
                    "Primary SMS gateway failed, falling back to console"
                );
                self.fallback.send(phone, message).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::RecordingGateway;

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        let primary = Arc::new(RecordingGateway::new());
        primary.fail();
        let gateway = FallbackGateway::new(primary.clone());
        let phone = PhoneNumber::parse("9876543210").unwrap();

        assert!(gateway.send(&phone, "hi").await.is_ok());
        assert_eq!(primary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_uses_primary_when_it_succeeds() {
        let primary = Arc::new(RecordingGateway::new());
        let gateway = FallbackGateway::new(primary.clone());
        let phone = PhoneNumber::parse("9876543210").unwrap();

        assert!(gateway.send(&phone, "hi").await.is_ok());
        assert_eq!(primary.sent()[0].message, "hi");
    }
}
