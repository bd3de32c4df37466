//! Core domain + application logic for tgnotify.
//!
//! This crate is intentionally transport-agnostic. The Telegram Bot HTTP API lives behind the
//! [`ports::BotApi`] port, implemented in the `tgnotify-telegram` adapter crate.

pub mod backoff;
pub mod config;
pub mod domain;
pub mod echo;
pub mod errors;
pub mod input;
pub mod logging;
pub mod poller;
pub mod ports;
pub mod shutdown;

pub use errors::{Error, Result};
