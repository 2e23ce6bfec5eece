//! Input sources for PEM artifacts
//!
//! Artifacts come either from a file on disk or from text pasted into the
//! terminal, terminated by a blank line.

use crate::utils::{CertKitError, Result};
use std::io::BufRead;
use std::path::Path;

/// Read an artifact file as raw bytes
pub fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CertKitError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }

    std::fs::read(path).map_err(|e| CertKitError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read pasted lines until the first blank line that follows content.
///
/// Blank lines before any content are skipped, end of input also terminates.
/// Returns `None` when nothing but blank lines was read.
pub fn read_pasted<R: BufRead>(reader: R) -> Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| CertKitError::ReadError {
            path: "<stdin>".into(),
            message: e.to_string(),
        })?;

        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }

        lines.push(line);
    }

    if lines.is_empty() {
        return Ok(None);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_paste_stops_at_blank_line() {
        let input = "\n\n-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n\nignored\n";
        let text = read_pasted(Cursor::new(input)).unwrap().unwrap();
        assert_eq!(
            text,
            "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n"
        );
    }

    #[test]
    fn test_paste_ends_at_eof() {
        let text = read_pasted(Cursor::new("line one\nline two")).unwrap();
        assert_eq!(text.as_deref(), Some("line one\nline two\n"));
    }

    #[test]
    fn test_empty_paste() {
        assert!(read_pasted(Cursor::new("\n  \n")).unwrap().is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = read_artifact(Path::new("/nonexistent/server.crt")).unwrap_err();
        assert!(matches!(err, CertKitError::MissingInputFile { .. }));
    }
}
