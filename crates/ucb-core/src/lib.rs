//! Core domain + application logic for the unit-economics calculator bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind
//! the messaging port (trait) implemented in the adapter crate; the flows
//! here — subscription gate, admin notifier, payload interpreter, update
//! routing — only ever see the port.

pub mod app;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod gate;
pub mod logging;
pub mod messaging;
pub mod notify;
pub mod payload;
pub mod texts;

pub use errors::{Error, Result};
