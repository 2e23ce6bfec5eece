//! esp-certkit library
//!
//! Developer tooling for an ESP32 HTTPS project:
//! - Normalization and validation of PEM certificates and keys before upload
//! - Self-signed certificate generation through `openssl`
//! - Copying the device certificate into the companion app
//! - A pre-commit scan of the git staging area for secrets
//!
//! # Usage
//!
//! ```rust
//! use esp_certkit::cert_ops::{normalize, validate, PemKind};
//!
//! let raw = b"\xEF\xBB\xBF-----BEGIN CERTIFICATE-----\r\nMIIB\r\n-----END CERTIFICATE-----\r\n\r\n";
//! let normalized = normalize(raw)?;
//! assert_eq!(
//!     normalized.text,
//!     "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n"
//! );
//! assert_eq!(validate(&normalized.text)?, PemKind::Certificate);
//! # Ok::<(), esp_certkit::CertKitError>(())
//! ```

pub mod cert_ops;
pub mod cli;
pub mod commands;
pub mod config;
pub mod scan;
pub mod tools;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use utils::{CertKitError, Result};
