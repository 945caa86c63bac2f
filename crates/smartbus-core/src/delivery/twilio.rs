//! Twilio Programmable Messaging adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{DeliveryError, DeliveryGateway};
use crate::config::TwilioConfig;
use crate::phone::PhoneNumber;

/// The subset of Twilio's message resource we log.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// Sends SMS through `POST /2010-04-01/Accounts/{sid}/Messages.json`.
#[derive(Debug, Clone)]
pub struct TwilioGateway {
    client: Client,
    options: TwilioConfig,
}

impl TwilioGateway {
    /// Create a gateway using the given account settings.
    #[must_use]
    pub fn new(options: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.options.api_base.trim_end_matches('/'),
            self.options.account_sid
        )
    }

    /// Recipient in E.164 form, e.g. `+919876543210`.
    fn recipient(&self, phone: &PhoneNumber) -> String {
        format!("{}{}", self.options.country_code, phone.as_str())
    }
}

#[async_trait]
impl DeliveryGateway for TwilioGateway {
    async fn send(&self, phone: &PhoneNumber, message: &str) -> Result<(), DeliveryError> {
        let to = self.recipient(phone);
        let form = [
            ("To", to.as_str()),
            ("From", self.options.from_number.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let resource = response
            .json::<MessageResource>()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

        debug!(
            message_sid = %resource.sid,
            status = resource.status.as_deref().unwrap_or("unknown"),
            phone = %phone.masked(),
            "SMS accepted by Twilio"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}
