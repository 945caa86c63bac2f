//! One-time code generation.
//!
//! Codes are drawn uniformly from `000000`..=`999999` using the thread-local
//! CSPRNG from `rand`, which is seeded and periodically reseeded from the OS.
//! Leading zeros are kept: `42` is rendered as `"000042"`.

use std::fmt;

use rand::Rng;

/// Number of digits in every issued code.
pub const CODE_LENGTH: usize = 6;

const CODE_SPACE: u32 = 1_000_000;

/// A fixed-width numeric one-time code.
///
/// `Debug` is redacted so a session can be logged without leaking its code.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Render `value` as a zero-padded code. Values above `999999` wrap.
    #[must_use]
    pub fn from_value(value: u32) -> Self {
        Self(format!("{:0width$}", value % CODE_SPACE, width = CODE_LENGTH))
    }

    /// The code digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a submitted code.
    ///
    /// Runs in time independent of where the first differing digit is.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = self.0.as_bytes();
        let submitted = submitted.as_bytes();
        if expected.len() != submitted.len() {
            return false;
        }
        expected
            .iter()
            .zip(submitted)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh codes for the session store.
pub trait CodeGenerator: Send + Sync {
    /// Produce a new code. Must not have side effects.
    fn generate(&self) -> OtpCode;
}

/// Uniform random codes from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> OtpCode {
        OtpCode::from_value(rand::rng().random_range(0..CODE_SPACE))
    }
}

#[cfg(any(test, feature = "testing"))]
pub use self::sequence::SequenceCodeGenerator;

#[cfg(any(test, feature = "testing"))]
mod sequence {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{CodeGenerator, OtpCode};

    /// Hands out a scripted list of codes, then repeats the last one.
    #[derive(Debug)]
    pub struct SequenceCodeGenerator {
        codes: Mutex<VecDeque<u32>>,
        last: Mutex<u32>,
    }

    impl SequenceCodeGenerator {
        /// Generator that yields `codes` in order.
        #[must_use]
        pub fn new(codes: impl IntoIterator<Item = u32>) -> Self {
            Self {
                codes: Mutex::new(codes.into_iter().collect()),
                last: Mutex::new(0),
            }
        }

        /// Generator that always yields `code`.
        #[must_use]
        pub fn fixed(code: u32) -> Self {
            Self::new([code])
        }
    }

    impl CodeGenerator for SequenceCodeGenerator {
        fn generate(&self) -> OtpCode {
            let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(next) = self
                .codes
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
            {
                *last = next;
            }
            OtpCode::from_value(*last)
        }
    }
}
