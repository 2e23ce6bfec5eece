//! Canonical byte form for PEM artifacts
//!
//! The pipeline runs in a fixed order: BOM strip, UTF-8 decode, line-ending
//! conversion, trailing-whitespace strip, trailing blank line removal, rejoin.
//! Each step assumes the ones before it already ran.

use crate::utils::{CertKitError, Result};
use serde::Serialize;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Line terminator counts of a text.
///
/// `lf` and `cr` count only the terminators that are not part of a CRLF pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineEndingCounts {
    pub crlf: usize,
    pub lf: usize,
    pub cr: usize,
}

/// Overall line-ending style of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineEndingStyle {
    Lf,
    Crlf,
    Cr,
    Mixed,
    None,
}

impl std::fmt::Display for LineEndingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineEndingStyle::Lf => write!(f, "LF (Unix)"),
            LineEndingStyle::Crlf => write!(f, "CRLF (Windows)"),
            LineEndingStyle::Cr => write!(f, "CR (classic Mac)"),
            LineEndingStyle::Mixed => write!(f, "mixed"),
            LineEndingStyle::None => write!(f, "none"),
        }
    }
}

impl LineEndingCounts {
    pub fn count(text: &str) -> Self {
        let crlf = text.matches("\r\n").count();
        Self {
            crlf,
            lf: text.matches('\n').count() - crlf,
            cr: text.matches('\r').count() - crlf,
        }
    }

    pub fn style(&self) -> LineEndingStyle {
        match (self.crlf > 0, self.lf > 0, self.cr > 0) {
            (false, false, false) => LineEndingStyle::None,
            (false, true, false) => LineEndingStyle::Lf,
            (true, false, false) => LineEndingStyle::Crlf,
            (false, false, true) => LineEndingStyle::Cr,
            _ => LineEndingStyle::Mixed,
        }
    }
}

/// What the normalizer changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub original_size: usize,
    pub final_size: usize,
    pub bom_removed: bool,
    /// Terminators found in the input, before conversion
    pub line_endings: LineEndingCounts,
    /// Lines that had trailing whitespace removed
    pub trimmed_lines: usize,
    /// Blank lines dropped from the end of the text
    pub trailing_blank_lines: usize,
    /// Lines in the output
    pub line_count: usize,
    /// Whether the output differs from the input bytes
    pub changed: bool,
}

impl NormalizeReport {
    pub fn size_delta(&self) -> i64 {
        self.final_size as i64 - self.original_size as i64
    }
}

/// Normalizer output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub report: NormalizeReport,
}

impl Normalized {
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Normalize raw bytes into BOM-less, LF-only UTF-8 with exactly one trailing newline.
///
/// Fails only when the bytes (after the optional BOM) are not UTF-8. The
/// returned `EncodingError` is labelled `input`; use
/// [`CertKitError::for_source`] to name the real source.
pub fn normalize(raw: &[u8]) -> Result<Normalized> {
    let mut report = NormalizeReport {
        original_size: raw.len(),
        ..Default::default()
    };

    let body = match raw.strip_prefix(UTF8_BOM) {
        Some(rest) => {
            report.bom_removed = true;
            rest
        }
        None => raw,
    };

    let text = std::str::from_utf8(body).map_err(|e| CertKitError::encoding("input", &e))?;

    report.line_endings = LineEndingCounts::count(text);
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<&str> = unified
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_end();
            if trimmed.len() != line.len() {
                report.trimmed_lines += 1;
            }
            trimmed
        })
        .collect();

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
        report.trailing_blank_lines += 1;
    }

    let mut out = lines.join("\n");
    out.push('\n');

    report.line_count = lines.len();
    report.final_size = out.len();
    report.changed = out.as_bytes() != raw;

    Ok(Normalized { text: out, report })
}
