//! Self-signed certificate generation command

use crate::cert_ops::runner::prepare_artifact;
use crate::cert_ops::writer::{move_to_backup, write_atomic};
use crate::config::Settings;
use crate::tools::openssl::{certificate_highlights, INSTALL_HINTS};
use crate::tools::OpenSsl;
use crate::utils::progress::{
    create_spinner, print_detail, print_fail, print_header, print_info, print_pass, print_step,
    print_warning,
};
use crate::utils::{CertKitError, Result};
use std::path::Path;

/// Generate `server.key` and a self-signed `server.crt` in `dir`, then
/// normalize both for upload
pub async fn run_generate(settings: &Settings, dir: &Path, verify: bool) -> Result<()> {
    let openssl = OpenSsl::new(&settings.generate, &settings.tools);
    let generate = &settings.generate;

    print_header("Certificate generator for ESP32");

    let version = match openssl.version().await {
        Ok(version) => version,
        Err(e) => {
            print_fail(&format!("{} not found", openssl.binary()));
            println!("  Install OpenSSL:");
            for hint in INSTALL_HINTS {
                println!("    {}", hint);
            }
            return Err(e);
        }
    };
    print_pass(&format!("OpenSSL found: {}", version));

    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| CertKitError::WriteError {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        print_pass(&format!("Created directory: {}", dir.display()));
    }

    // paths handed to openssl are absolute
    let dir = std::path::absolute(dir).map_err(|e| CertKitError::WriteError {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;
    let key = dir.join(&settings.paths.server_key);
    let cert = dir.join(&settings.paths.server_cert);
    print_info(&format!("Directory: {}", dir.display()));

    for path in [&cert, &key] {
        if let Some(backup) = move_to_backup(path)? {
            print_info(&format!(
                "Backup: {} -> {}",
                file_name(path),
                file_name(&backup)
            ));
        }
    }

    print_step(&format!(
        "Generating {}-bit RSA private key",
        generate.key_bits
    ));
    let spinner = create_spinner("Running openssl genrsa...");
    let result = openssl.generate_rsa_key(&key, generate.key_bits).await;
    spinner.finish_and_clear();
    result?;
    print_pass("Private key generated");

    print_step("Generating self-signed certificate");
    let spinner = create_spinner("Running openssl req...");
    let result = openssl
        .self_signed_certificate(&key, &cert, generate.days, &generate.subject)
        .await;
    spinner.finish_and_clear();
    result?;
    print_pass(&format!("Certificate generated (valid for {} days)", generate.days));

    print_step("Normalizing file format");
    for path in [&cert, &key] {
        let size = normalize_in_place(path)?;
        print_pass(&format!("{} normalized ({} bytes)", file_name(path), size));
    }

    if verify {
        verify_outputs(&openssl, &cert, &key).await;
    }

    print_header("Certificates generated");
    println!("  Next steps:");
    println!("    1. Arduino IDE: Tools > ESP32 Sketch Data Upload");
    println!("    2. Or format LittleFS on the ESP32 (serial monitor: 'format')");
    println!("    3. Upload the files in '{}'", dir.display());
    println!("    4. Restart the ESP32");
    println!();
    println!("  Files:");
    for path in [&cert, &key] {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        println!("    {}: {} bytes", file_name(path), size);
    }

    Ok(())
}

/// Rewrite a freshly generated file in normalized form; returns the new size
fn normalize_in_place(path: &Path) -> Result<usize> {
    let raw = std::fs::read(path).map_err(|e| CertKitError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let (normalized, _) = prepare_artifact(&raw, &path.display().to_string())?;
    if normalized.report.bom_removed {
        print_info(&format!("Removed BOM from {}", file_name(path)));
    }
    if normalized.report.changed {
        write_atomic(path, normalized.as_bytes())?;
    }
    Ok(normalized.report.final_size)
}

/// Re-check the generated files with openssl. Failures are warnings only.
async fn verify_outputs(openssl: &OpenSsl, cert: &Path, key: &Path) {
    print_step("Validating generated files");

    let out = openssl.describe_certificate(cert).await;
    if out.success {
        print_pass("Certificate is valid");
        for line in certificate_highlights(&out.stdout) {
            print_detail(line);
        }
    } else {
        print_warning(&format!("Warning: {}", out.stderr.trim()));
    }

    let out = openssl.check_rsa_key(key).await;
    if out.success {
        print_pass("Private key is valid");
    } else {
        print_warning(&format!("Warning: {}", out.stderr.trim()));
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
