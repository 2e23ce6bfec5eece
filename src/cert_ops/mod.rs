//! Certificate file operations module
//!
//! Normalizes, validates and inspects PEM certificate and key files, and
//! writes them back without ever leaving a half-written artifact behind.

pub mod inspect;
pub mod normalize;
pub mod reader;
pub mod runner;
pub mod validate;
pub mod writer;

pub use inspect::{inspect, Inspection};
pub use normalize::{normalize, LineEndingCounts, LineEndingStyle, NormalizeReport, Normalized};
pub use validate::{detect_kind, require_kind, validate, PemKind};
