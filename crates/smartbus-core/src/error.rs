//! Error types for OTP issuance and verification.
//!
//! [`OtpError`] is the single error kind surfaced by the session store. Every
//! variant is recoverable by the caller: the HTTP layer turns each one into a
//! structured `{ success: false, ... }` response and nothing is ever thrown
//! past that boundary.
//!
//! # Example
//!
//! ```rust
//! use smartbus_core::error::{OtpError, Result};
//!
//! fn check(remaining: u32) -> Result<()> {
//!     Err(OtpError::InvalidCode { remaining })
//! }
//!
//! let err = check(2).unwrap_err();
//! assert_eq!(err.error_code(), "INVALID_CODE");
//! assert_eq!(err.remaining_attempts(), Some(2));
//! ```

use thiserror::Error;

/// Everything that can go wrong while issuing or verifying a code.
///
/// The `Display` text of each variant is the human-readable message shown to
/// the client, so it must never contain gateway internals or the code itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    // =========================================================================
    // INPUT ERRORS
    // =========================================================================
    /// The phone number is not exactly 10 ASCII digits.
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhoneNumber,

    /// The phone number or the submitted code was missing or empty.
    #[error("Phone number and OTP are required")]
    MissingFields,

    // =========================================================================
    // SESSION STATE ERRORS
    // =========================================================================
    /// No session exists for the phone number (never issued, consumed or evicted).
    #[error("OTP expired or not found. Please request a new OTP.")]
    SessionNotFound,

    /// The session outlived its time-to-live and has been evicted.
    #[error("OTP has expired. Please request a new one.")]
    Expired,

    /// The session used up its failed attempts and has been evicted.
    #[error("Too many invalid attempts. Please request a new OTP.")]
    AttemptsExhausted,

    /// The submitted code did not match.
    #[error("Invalid OTP. {remaining} attempts remaining.")]
    InvalidCode {
        /// Failed attempts left before the session is exhausted.
        remaining: u32,
    },

    // =========================================================================
    // DELIVERY ERRORS
    // =========================================================================
    /// The delivery gateway failed or timed out. Details are logged server-side only.
    #[error("Failed to send OTP via SMS. Please try again.")]
    DeliveryFailed,
}

/// A specialized [`Result`] type for OTP operations.
pub type Result<T> = std::result::Result<T, OtpError>;

impl OtpError {
    /// Returns `true` if the error was caused by malformed client input.
    #[inline]
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidPhoneNumber | Self::MissingFields)
    }

    /// Returns `true` if the client's only way forward is to request a fresh code.
    #[inline]
    #[must_use]
    pub const fn should_request_new_code(&self) -> bool {
        matches!(
            self,
            Self::SessionNotFound | Self::Expired | Self::AttemptsExhausted | Self::DeliveryFailed
        )
    }

    /// Remaining attempts, if this error carries them.
    #[inline]
    #[must_use]
    pub const fn remaining_attempts(&self) -> Option<u32> {
        match self {
            Self::InvalidCode { remaining } => Some(*remaining),
            _ => None,
        }
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the request cannot be honoured as sent
            Self::InvalidPhoneNumber
            | Self::MissingFields
            | Self::SessionNotFound
            | Self::Expired
            | Self::InvalidCode { .. } => 400,

            // 429 Too Many Requests - brute-force guard tripped
            Self::AttemptsExhausted => 429,

            // 502 Bad Gateway - upstream SMS provider failed
            Self::DeliveryFailed => 502,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            Self::MissingFields => "MISSING_FIELDS",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::Expired => "EXPIRED",
            Self::AttemptsExhausted => "ATTEMPTS_EXHAUSTED",
            Self::InvalidCode { .. } => "INVALID_CODE",
            Self::DeliveryFailed => "DELIVERY_FAILED",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
