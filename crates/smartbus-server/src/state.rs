//! Application state shared across handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use smartbus_core::{build_gateway, OtpStore, SmartbusConfig};

/// State handed to every handler.
pub type SharedState = AppState;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    otp: Arc<OtpStore>,
    console_delivery: bool,
    started_at: Instant,
}

impl AppState {
    /// Build state from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery gateway cannot be built.
    pub fn from_config(config: &SmartbusConfig) -> anyhow::Result<Self> {
        let gateway = build_gateway(&config.delivery, config.server.production)?;
        let store = OtpStore::new(gateway, config.otp_policy());
        Ok(Self::new(Arc::new(store), config.delivery.prints_codes()))
    }

    /// Wrap an existing store. `console_delivery` changes the issue response
    /// text so developers know to look at the server log. It is set for
    /// console mode and for the console fallback.
    #[must_use]
    pub fn new(otp: Arc<OtpStore>, console_delivery: bool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                otp,
                console_delivery,
                started_at: Instant::now(),
            }),
        }
    }

    /// The OTP session store.
    #[must_use]
    pub fn otp(&self) -> &Arc<OtpStore> {
        &self.inner.otp
    }

    /// Whether codes are printed to the log instead of sent.
    #[must_use]
    pub fn console_delivery(&self) -> bool {
        self.inner.console_delivery
    }

    /// Time since the state was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use smartbus_core::DeliveryMode;

    use super::*;

    #[test]
    fn test_from_default_config() {
        let state = AppState::from_config(&SmartbusConfig::default()).unwrap();
        assert!(state.console_delivery());
        assert_eq!(state.otp().active_sessions(), 0);
        assert_eq!(state.otp().policy().max_attempts, 3);
    }

    #[test]
    fn test_console_fallback_counts_as_console_delivery() {
        let mut config = SmartbusConfig::default();
        config.delivery.mode = DeliveryMode::Twilio;
        config.delivery.fallback_to_console = true;
        config.delivery.twilio.account_sid = "AC123".to_string();
        config.delivery.twilio.auth_token = "secret".to_string();
        config.delivery.twilio.from_number = "+15550001111".to_string();

        let state = AppState::from_config(&config).unwrap();
        assert!(state.console_delivery());
    }

    #[test]
    fn test_twilio_without_fallback_is_not_console_delivery() {
        let mut config = SmartbusConfig::default();
        config.delivery.mode = DeliveryMode::Twilio;
        config.delivery.twilio.account_sid = "AC123".to_string();
        config.delivery.twilio.auth_token = "secret".to_string();
        config.delivery.twilio.from_number = "+15550001111".to_string();

        let state = AppState::from_config(&config).unwrap();
        assert!(!state.console_delivery());
    }

    #[test]
    fn test_production_console_rejected() {
        let mut config = SmartbusConfig::default();
        config.server.production = true;
        assert!(AppState::from_config(&config).is_err());
    }
}
