//! Read-only analysis of a certificate or key file

use crate::cert_ops::normalize::{normalize, LineEndingCounts, LineEndingStyle, UTF8_BOM};
use crate::cert_ops::validate::{detect_kind, preview, validate, PemKind};
use serde::Serialize;

const HEAD_HEX_BYTES: usize = 32;
const HEAD_TEXT_CHARS: usize = 100;

/// Findings about raw artifact bytes. Nothing is modified to produce it.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub size: usize,
    pub has_bom: bool,
    pub utf8_valid: bool,
    /// `None` when the content is not UTF-8
    pub line_endings: Option<LineEndingCounts>,
    pub line_ending_style: Option<LineEndingStyle>,
    pub kind: Option<PemKind>,
    pub end_marker_present: Option<bool>,
    /// Why the normalized text fails marker validation, if it does
    pub marker_error: Option<String>,
    /// Whether `fix` would rewrite the file
    pub needs_normalization: bool,
    pub head_hex: String,
    pub head_text: Option<String>,
}

impl Inspection {
    /// True when the file can be uploaded as-is
    pub fn is_clean(&self) -> bool {
        self.utf8_valid
            && !self.needs_normalization
            && matches!(self.kind, Some(k) if k != PemKind::Unrecognized)
            && self.end_marker_present == Some(true)
            && self.marker_error.is_none()
    }
}

/// Inspect raw bytes.
///
/// Kind detection runs on the content after a leading BOM so the report can
/// name both problems at once.
pub fn inspect(raw: &[u8]) -> Inspection {
    let has_bom = raw.starts_with(UTF8_BOM);
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let head_hex = hex_head(raw, HEAD_HEX_BYTES);

    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(_) => {
            return Inspection {
                size: raw.len(),
                has_bom,
                utf8_valid: false,
                line_endings: None,
                line_ending_style: None,
                kind: None,
                end_marker_present: None,
                marker_error: None,
                needs_normalization: true,
                head_hex,
                head_text: None,
            }
        }
    };

    let counts = LineEndingCounts::count(text);
    let kind = detect_kind(text);
    let end_marker_present = kind.end_marker().map(|end| text.contains(end));
    let (needs_normalization, marker_error) = match normalize(raw) {
        Ok(n) => (
            n.report.changed,
            validate(&n.text).err().map(|e| e.to_string()),
        ),
        Err(e) => (true, Some(e.to_string())),
    };

    Inspection {
        size: raw.len(),
        has_bom,
        utf8_valid: true,
        line_endings: Some(counts),
        line_ending_style: Some(counts.style()),
        kind: Some(kind),
        end_marker_present,
        marker_error,
        needs_normalization,
        head_hex,
        head_text: Some(preview(text, HEAD_TEXT_CHARS)),
    }
}

/// Upper-case hex of the first `n` bytes, space separated
pub fn hex_head(raw: &[u8], n: usize) -> String {
    raw.iter()
        .take(n)
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
