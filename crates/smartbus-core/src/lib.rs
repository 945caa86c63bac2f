//! # smartbus-core
//!
//! Phone-number login for the SmartBus ticketing backend.
//!
//! This crate provides:
//! - One-time code generation from a CSPRNG
//! - An in-memory OTP session store with TTL and attempt limits
//! - SMS delivery gateways (Twilio, console, fallback)
//! - Layered configuration loading and validation
//!
//! ## Architecture
//!
//! - [`code`] - 6-digit code generation
//! - [`store`] - session lifecycle: issue, verify, expire, exhaust
//! - [`delivery`] - the gateway trait and its adapters
//! - [`phone`] - phone number validation and log masking
//! - [`clock`] - injectable time source
//! - [`config`] - configuration loading and validation
//! - [`error`] - the OTP error kind shared with the HTTP layer
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use smartbus_core::{ConsoleGateway, OtpPolicy, OtpStore};
//!
//! # async fn run() -> smartbus_core::Result<()> {
//! let store = OtpStore::new(Arc::new(ConsoleGateway), OtpPolicy::default());
//! store.issue_code("9876543210").await?;
//! let identity = store.verify_code("9876543210", "123456")?;
//! println!("{} logged in at {}", identity.phone_number, identity.verified_at);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod clock;
pub mod code;
pub mod config;
pub mod delivery;
pub mod error;
pub mod phone;
pub mod store;

// Re-export primary types for convenience
#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use code::SequenceCodeGenerator;
pub use code::{CodeGenerator, OtpCode, RandomCodeGenerator, CODE_LENGTH};
pub use config::{
    ConfigError, ConfigResult, DeliveryConfig, DeliveryMode, OtpConfig, ServerConfig,
    SmartbusConfig, TwilioConfig,
};
#[cfg(any(test, feature = "testing"))]
pub use delivery::{RecordingGateway, SentMessage};
pub use delivery::{
    build_gateway, ConsoleGateway, DeliveryError, DeliveryGateway, FallbackGateway, TwilioGateway,
};
pub use error::{OtpError, Result};
pub use phone::{is_valid_phone_number, PhoneNumber};
pub use store::{OtpPolicy, OtpStore, VerifiedIdentity};
