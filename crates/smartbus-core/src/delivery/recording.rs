//! Scripted gateway for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{DeliveryError, DeliveryGateway};
use crate::phone::PhoneNumber;

/// A message handed to [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Recipient digits.
    pub phone_number: String,
    /// Message body.
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
enum Behaviour {
    #[default]
    Succeed,
    Fail,
    Stall(Duration),
}

/// Records every call and answers as scripted.
///
/// Calls are recorded before the scripted behaviour runs, so failed and
/// stalled sends still show up in [`RecordingGateway::sent`].
#[derive(Debug, Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<SentMessage>>,
    behaviour: Mutex<Behaviour>,
}

impl RecordingGateway {
    /// A gateway that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept subsequent messages.
    pub fn succeed(&self) {
        self.set(Behaviour::Succeed);
    }

    /// Reject subsequent messages.
    pub fn fail(&self) {
        self.set(Behaviour::Fail);
    }

    /// Sleep for `delay` before accepting subsequent messages.
    pub fn stall(&self, delay: Duration) {
        self.set(Behaviour::Stall(delay));
    }

    /// Every message received so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of send attempts.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The 6-digit code from the most recent message to `phone_number`.
    #[must_use]
    pub fn last_code_for(&self, phone_number: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|m| m.phone_number == phone_number)
            .and_then(|m| extract_code(&m.message))
    }

    fn set(&self, behaviour: Behaviour) {
        *self.behaviour.lock().unwrap_or_else(|e| e.into_inner()) = behaviour;
    }
}

fn extract_code(message: &str) -> Option<String> {
    let bytes = message.as_bytes();
    bytes
        .windows(6)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|start| message[start..start + 6].to_owned())
}

#[async_trait]
impl DeliveryGateway for RecordingGateway {
    async fn send(&self, phone: &PhoneNumber, message: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentMessage {
                phone_number: phone.as_str().to_owned(),
                message: message.to_owned(),
            });

        let behaviour = *self.behaviour.lock().unwrap_or_else(|e| e.into_inner());
        match behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(DeliveryError::Rejected {
                status: 503,
                body: "scripted failure".to_owned(),
            }),
            Behaviour::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
