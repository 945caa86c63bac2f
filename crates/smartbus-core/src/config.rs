//! Application configuration management.
//!
//! Configuration is layered with the `config` crate, later sources winning:
//!
//! 1. Built-in defaults (`#[serde(default)]` on every section)
//! 2. An optional TOML file, `smartbus.toml` or the path in `SMARTBUS_CONFIG`
//! 3. Environment variables prefixed `SMARTBUS__`, e.g.
//!    `SMARTBUS__DELIVERY__TWILIO__AUTH_TOKEN`
//!
//! Values are checked by [`SmartbusConfig::validate`], which reports every
//! problem at once.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::OtpPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SMARTBUS_CONFIG";

/// Config file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "smartbus.toml";

const ENV_PREFIX: &str = "SMARTBUS";
const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Configuration file not found at: {}", .0.display())]
    NotFound(PathBuf),

    /// A source could not be read or deserialized.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// A single field holds an unacceptable value.
    #[error("Invalid configuration for '{field}': {message}")]
    ValidationError {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Several fields failed validation.
    #[error("Configuration has {} problems: {}", .0.len(), join_errors(.0))]
    MultipleValidationErrors(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartbusConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Code lifetime and attempt limits.
    pub otp: OtpConfig,
    /// How codes reach the phone.
    pub delivery: DeliveryConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Production mode: JSON file logging, console delivery forbidden.
    pub production: bool,
    /// Upper bound on any single request.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            production: false,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `host` is not an IP address.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::ValidationError {
            field: "server.host",
            message: format!("'{}' is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Code lifetime and attempt limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Seconds a code stays valid after issuance.
    pub ttl_secs: u64,
    /// Failed verifications allowed per code.
    pub max_attempts: u32,
    /// Seconds between sweeps of stale sessions. `0` disables sweeping.
    pub sweep_interval_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_attempts: 3,
            sweep_interval_secs: 60,
        }
    }
}

impl OtpConfig {
    /// Sweep interval, or `None` when sweeping is disabled.
    #[must_use]
    pub const fn sweep_interval(&self) -> Option<Duration> {
        if self.sweep_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.sweep_interval_secs))
        }
    }
}

/// Which gateway delivers codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Print codes to the server log.
    #[default]
    Console,
    /// Send SMS through Twilio.
    Twilio,
}

/// Delivery gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Gateway to use.
    pub mode: DeliveryMode,
    /// Milliseconds to wait for the gateway before giving up.
    pub timeout_ms: u64,
    /// Print the code to the log when the primary gateway fails.
    pub fallback_to_console: bool,
    /// Twilio account settings, required when `mode = "twilio"`.
    pub twilio: TwilioConfig,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Console,
            timeout_ms: 10_000,
            fallback_to_console: false,
            twilio: TwilioConfig::default(),
        }
    }
}

impl DeliveryConfig {
    /// Whether a code can end up in the server log instead of an SMS.
    #[must_use]
    pub fn prints_codes(&self) -> bool {
        self.mode == DeliveryMode::Console || self.fallback_to_console
    }
}

/// Twilio account settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    /// Account SID (`AC...`).
    pub account_sid: String,
    /// Auth token.
    #[serde(skip_serializing)]
    pub auth_token: String,
    /// Sender number in E.164 form.
    pub from_number: String,
    /// Prefix prepended to the 10-digit national number.
    pub country_code: String,
    /// REST API base URL.
    pub api_base: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            country_code: "+91".to_string(),
            api_base: "https://api.twilio.com".to_string(),
        }
    }
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("country_code", &self.country_code)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SmartbusConfig {
    /// Load configuration from the default file location and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SMARTBUS_CONFIG` names a missing file, or if any
    /// source fails to parse.
    pub fn load() -> ConfigResult<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from(Path::new(&path), true),
            None => Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Load configuration from `path` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `required` and the file is missing.
    pub fn load_from(path: &Path, required: bool) -> ConfigResult<Self> {
        Self::build(path, required, config::Environment::default())
    }

    fn build(path: &Path, required: bool, env: config::Environment) -> ConfigResult<Self> {
        if required && !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(env.prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the single problem found, or
    /// [`ConfigError::MultipleValidationErrors`] when there are several.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();
        if let Err(err) = self.server.socket_addr() {
            errors.push(err);
        }

        let mut invalid = |field: &'static str, message: &str| {
            errors.push(ConfigError::ValidationError {
                field,
                message: message.to_string(),
            });
        };

        if self.server.request_timeout_secs == 0 {
            invalid("server.request_timeout_secs", "must be greater than zero");
        }
        if self.otp.ttl_secs == 0 {
            invalid("otp.ttl_secs", "must be greater than zero");
        }
        if self.otp.max_attempts == 0 {
            invalid("otp.max_attempts", "must be greater than zero");
        }
        if self.delivery.timeout_ms == 0 {
            invalid("delivery.timeout_ms", "must be greater than zero");
        }

        if self.server.production && self.delivery.mode == DeliveryMode::Console {
            invalid(
                "delivery.mode",
                "console delivery prints codes to the log and cannot be used in production",
            );
        }
        if self.server.production && self.delivery.fallback_to_console {
            invalid(
                "delivery.fallback_to_console",
                "the console fallback cannot be used in production",
            );
        }

        if self.delivery.mode == DeliveryMode::Twilio {
            let twilio = &self.delivery.twilio;
            if twilio.account_sid.is_empty() {
                invalid("delivery.twilio.account_sid", "required when mode is twilio");
            }
            if twilio.auth_token.is_empty() {
                invalid("delivery.twilio.auth_token", "required when mode is twilio");
            }
            if twilio.from_number.is_empty() {
                invalid("delivery.twilio.from_number", "required when mode is twilio");
            }
            if !twilio.country_code.starts_with('+') {
                invalid("delivery.twilio.country_code", "must start with '+'");
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }

    /// Session store policy derived from this configuration.
    #[must_use]
    pub const fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            ttl: Duration::from_secs(self.otp.ttl_secs),
            max_attempts: self.otp.max_attempts,
            delivery_timeout: Duration::from_millis(self.delivery.timeout_ms),
        }
    }
}
