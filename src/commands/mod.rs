//! Command implementations for esp-certkit
//!
//! File-level commands (`fix`, `analyze`, `copy`) live in
//! [`crate::cert_ops::runner`]; the ones here drive external tools.

pub mod generate;
pub mod scan;

pub use generate::run_generate;
pub use scan::run_scan;
