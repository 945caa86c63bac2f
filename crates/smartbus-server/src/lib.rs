//! # smartbus-server
//!
//! HTTP server library for SmartBus phone-number login.
//!
//! This library provides the API handlers, logging setup and shared state
//! around the OTP store from `smartbus-core`.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
