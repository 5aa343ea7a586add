//! Core domain + application logic for the Telegraph uploader bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and telegra.ph live behind
//! ports (traits) implemented in adapter crates.

pub mod article;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod formatting;
pub mod lifecycle;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod progress;
pub mod render;
pub mod scratch;

pub use errors::{Error, Result};
