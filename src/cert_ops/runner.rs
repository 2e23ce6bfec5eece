//! Runner for the file-level operations
//!
//! `fix`, `analyze` and `copy` all funnel through [`prepare_artifact`], so
//! every written artifact has passed the same normalization and validation.

use crate::cert_ops::inspect::{inspect, Inspection};
use crate::cert_ops::normalize::{normalize, LineEndingCounts, Normalized};
use crate::cert_ops::reader::{read_artifact, read_pasted};
use crate::cert_ops::validate::{preview, require_kind, validate, PemKind};
use crate::cert_ops::writer::{copy_backup, write_atomic};
use crate::config::PathSettings;
use crate::utils::progress::{
    print_detail, print_fail, print_header, print_info, print_pass, print_step, print_warning,
};
use crate::utils::{CertKitError, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Normalize then validate. Nothing is written.
pub fn prepare_artifact(raw: &[u8], source_name: &str) -> Result<(Normalized, PemKind)> {
    let normalized = normalize(raw).map_err(|e| e.for_source(source_name))?;
    let kind = validate(&normalized.text)?;
    Ok((normalized, kind))
}

/// The server certificate and key in the data directory that exist.
///
/// Missing ones are reported and skipped; if neither exists the first is
/// returned as `MissingInputFile`.
pub fn default_targets(paths: &PathSettings) -> Result<Vec<PathBuf>> {
    let candidates = [paths.cert_path(), paths.key_path()];
    let existing: Vec<PathBuf> = candidates
        .iter()
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                print_warning(&format!("File not found: {}", path.display()));
            }
            exists
        })
        .cloned()
        .collect();

    if existing.is_empty() {
        print_fail(&format!(
            "Nothing to process: put {} and {} in {}",
            paths.server_cert,
            paths.server_key,
            paths.data_dir.display()
        ));
        let [first, _] = candidates;
        return Err(CertKitError::MissingInputFile { path: first });
    }

    Ok(existing)
}

/// Options for `fix`
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    /// Write here instead of back to the input (single input only)
    pub output: Option<PathBuf>,
    /// Keep a `.backup` copy of the destination before replacing it
    pub backup: bool,
    /// Report what would change without writing
    pub dry_run: bool,
}

/// Normalize, validate and write a single file
pub fn fix_file(input: &Path, options: &FixOptions) -> Result<Normalized> {
    print_step(&format!("Processing: {}", input.display()));

    let raw = read_artifact(input)?;
    print_info(&format!("Original size: {} bytes", raw.len()));

    let (normalized, kind) = prepare_artifact(&raw, &input.display().to_string())?;
    let report = &normalized.report;

    if report.bom_removed {
        print_warning("Removed UTF-8 BOM");
    }
    if report.line_endings.crlf > 0 || report.line_endings.cr > 0 {
        print_warning(&format!(
            "Converted {} CRLF and {} CR line endings to LF",
            report.line_endings.crlf, report.line_endings.cr
        ));
    }
    print_info(&format!("Lines processed: {}", report.line_count));

    match kind {
        PemKind::Unrecognized => {
            print_warning("Content does not look like a PEM certificate or key");
            print_detail(&format!("First characters: {:?}", preview(&normalized.text, 50)));
        }
        kind => print_pass(&format!("{} detected", kind)),
    }

    let destination = options.output.as_deref().unwrap_or(input);

    if options.dry_run {
        if report.changed {
            print_info(&format!(
                "Would write {} bytes to {} ({:+} bytes)",
                report.final_size,
                destination.display(),
                report.size_delta()
            ));
        } else {
            print_pass("Already normalized");
        }
        return Ok(normalized);
    }

    if !report.changed && destination == input {
        print_pass("Already normalized, nothing to write");
        return Ok(normalized);
    }

    if options.backup {
        if let Some(backup) = copy_backup(destination)? {
            print_info(&format!("Backup: {}", backup.display()));
        }
    }

    write_atomic(destination, normalized.as_bytes())?;

    print_info(&format!("Final size: {} bytes", report.final_size));
    if report.size_delta() != 0 {
        print_info(&format!("Difference: {:+} bytes", report.size_delta()));
    }
    print_pass(&format!("Saved: {}", destination.display()));

    Ok(normalized)
}

/// Fix every file, continuing past failures. Returns the first failure, if any.
pub fn run_fix(files: &[PathBuf], options: &FixOptions) -> Result<()> {
    let mut first_error = None;
    let mut succeeded = 0;

    for file in files {
        match fix_file(file, options) {
            Ok(_) => succeeded += 1,
            Err(e) => {
                print_fail(&e.to_string());
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    println!();
    println!("{}/{} files processed successfully", succeeded, files.len());

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Print the analysis of one file
pub fn print_inspection(path: &Path, report: &Inspection) {
    print_header(&format!("Analysis: {}", path.display()));
    println!("  Size: {} bytes", report.size);

    if report.has_bom {
        print_fail("UTF-8 BOM: present (will break the TLS stack)");
    } else {
        print_pass("UTF-8 BOM: absent");
    }

    if !report.utf8_valid {
        print_fail("Encoding: not valid UTF-8");
        println!("\n  First {} bytes (hex):", report.head_hex.split(' ').count());
        println!("    {}", report.head_hex);
        return;
    }
    print_pass("Encoding: valid UTF-8");

    if let (Some(counts), Some(style)) = (&report.line_endings, &report.line_ending_style) {
        println!("\n  Line endings ({}):", style);
        println!("    CRLF (\\r\\n): {}", counts.crlf);
        println!("    LF   (\\n):   {}", counts.lf);
        println!("    CR   (\\r):   {}", counts.cr);
        if counts.crlf > 0 || counts.cr > 0 {
            print_warning("Non-LF line endings found, fix will convert them to LF");
        }
    }

    println!("\n  PEM validation:");
    match report.kind {
        None | Some(PemKind::Unrecognized) => {
            print_fail("PEM format not recognized");
        }
        Some(kind) => match (report.end_marker_present, &report.marker_error) {
            (Some(false), _) => {
                print_pass(&format!("{}: BEGIN marker found", kind));
                print_fail(&format!(
                    "{}: {} NOT found",
                    kind,
                    kind.end_marker().unwrap_or_default()
                ));
            }
            (_, Some(reason)) => print_fail(reason),
            (_, None) => {
                print_pass(&format!("{}: BEGIN marker valid", kind));
                print_pass(&format!("{}: END marker valid", kind));
            }
        },
    }

    if report.needs_normalization {
        print_warning("fix would rewrite this file");
    }

    println!("\n  First {} bytes (hex):", report.head_hex.split(' ').count());
    println!("    {}", report.head_hex);
    if let Some(head) = &report.head_text {
        println!("\n  First characters:");
        for line in head.lines() {
            println!("    {}", line);
        }
    }
}

/// Analyze files without modifying them.
///
/// Unreadable files are reported and skipped; the first such failure is
/// returned after the rest have been analyzed.
pub fn run_analyze(files: &[PathBuf], json: bool) -> Result<()> {
    let mut first_error = None;
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        match read_artifact(file) {
            Ok(raw) => reports.push((file, inspect(&raw))),
            Err(e) => {
                if !json {
                    print_fail(&e.to_string());
                }
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if json {
        #[derive(serde::Serialize)]
        struct Entry<'a> {
            path: &'a Path,
            #[serde(flatten)]
            inspection: &'a Inspection,
        }
        let entries: Vec<Entry> = reports
            .iter()
            .map(|(path, inspection)| Entry {
                path: path.as_path(),
                inspection,
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries).map_err(|e| CertKitError::WriteError {
            path: "<stdout>".into(),
            message: e.to_string(),
        })?;
        println!("{}", json);
    } else {
        for (path, report) in &reports {
            print_inspection(path, report);
        }
        let clean = reports.iter().filter(|(_, r)| r.is_clean()).count();
        println!();
        println!("{}/{} files ready to upload", clean, files.len());
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Copy the server certificate into the app tree.
///
/// When `source` does not exist the certificate is read from `paste`
/// instead, e.g. text copied from the ESP32 serial monitor.
pub fn run_copy<R: BufRead>(source: &Path, destination: &Path, paste: R) -> Result<()> {
    let (raw, source_name) = if source.exists() {
        print_pass(&format!("Server certificate found: {}", source.display()));
        (read_artifact(source)?, source.display().to_string())
    } else {
        print_warning(&format!(
            "Server certificate not found at {}",
            source.display()
        ));
        println!();
        println!("  1. In the ESP32 serial monitor, run: cat server.crt");
        println!("  2. Copy everything from -----BEGIN to -----END");
        println!("  3. Paste it below and press ENTER on an empty line");
        println!();

        match read_pasted(paste)? {
            Some(text) => (text.into_bytes(), "pasted certificate".to_string()),
            None => {
                print_fail("No certificate was pasted");
                return Err(CertKitError::UserCancelled);
            }
        }
    };

    print_step("Normalizing format");
    let (normalized, kind) = prepare_artifact(&raw, &source_name)?;
    require_kind(kind, &[PemKind::Certificate], &normalized.text)?;
    if normalized.report.bom_removed {
        print_info("Removed UTF-8 BOM");
    }

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| CertKitError::WriteError {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
            print_pass(&format!("Created directory: {}", parent.display()));
        }
    }

    write_atomic(destination, normalized.as_bytes())?;

    print_pass(&format!("Certificate saved to: {}", destination.display()));
    print_detail(&format!("Size: {} bytes", normalized.report.final_size));
    print_detail(&format!("Lines: {}", normalized.report.line_count));

    let counts = LineEndingCounts::count(&normalized.text);
    print_detail(&format!(
        "Terminators: CRLF={}, LF={}, CR={}",
        counts.crlf, counts.lf, counts.cr
    ));

    println!();
    println!("Next steps:");
    println!("  1. Rebuild the Android app");
    println!("  2. Install it on the device");
    println!("  3. Test the connection to the ESP32");
    println!();
    print_info(&format!(
        "{} must not be committed (keep it in .gitignore)",
        destination.display()
    ));

    Ok(())
}
