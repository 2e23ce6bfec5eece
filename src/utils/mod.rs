//! Utility modules for esp-certkit
//!
//! This module contains error types, status printers, and spinners.

pub mod error;
pub mod progress;

pub use error::{CertKitError, ConfigError, Result};
