//! `openssl` wrapper for self-signed certificate generation
//!
//! All file arguments are passed as explicit paths; the working directory of
//! this process is never changed.

use crate::config::{GenerateSettings, ToolSettings};
use crate::tools::command::{run_tool, ToolOutput};
use crate::utils::Result;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Handle to the configured `openssl` binary
#[derive(Debug, Clone)]
pub struct OpenSsl {
    binary: String,
    timeout: Option<Duration>,
}

impl OpenSsl {
    pub fn new(generate: &GenerateSettings, tools: &ToolSettings) -> Self {
        Self {
            binary: generate.openssl.clone(),
            timeout: tools.timeout(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn run(&self, args: Vec<OsString>) -> ToolOutput {
        run_tool(&self.binary, args, self.timeout).await
    }

    /// `openssl version`, trimmed
    pub async fn version(&self) -> Result<String> {
        let out = self
            .run(vec!["version".into()])
            .await
            .require_success(&self.binary, "report its version")?;
        Ok(out.stdout.trim().to_string())
    }

    /// `openssl genrsa -out <key> <bits>`
    pub async fn generate_rsa_key(&self, key: &Path, bits: u32) -> Result<()> {
        self.run(vec![
            "genrsa".into(),
            "-out".into(),
            key.into(),
            bits.to_string().into(),
        ])
        .await
        .require_success(&self.binary, "generate the private key")?;
        Ok(())
    }

    /// `openssl req -new -x509` signed with `key`, valid for `days`
    pub async fn self_signed_certificate(
        &self,
        key: &Path,
        cert: &Path,
        days: u32,
        subject: &str,
    ) -> Result<()> {
        self.run(vec![
            "req".into(),
            "-new".into(),
            "-x509".into(),
            "-key".into(),
            key.into(),
            "-out".into(),
            cert.into(),
            "-days".into(),
            days.to_string().into(),
            "-subj".into(),
            subject.into(),
        ])
        .await
        .require_success(&self.binary, "generate the certificate")?;
        Ok(())
    }

    /// `openssl x509 -text -noout`; callers treat failure as a warning
    pub async fn describe_certificate(&self, cert: &Path) -> ToolOutput {
        self.run(vec![
            "x509".into(),
            "-in".into(),
            cert.into(),
            "-text".into(),
            "-noout".into(),
        ])
        .await
    }

    /// `openssl rsa -check -noout`; callers treat failure as a warning
    pub async fn check_rsa_key(&self, key: &Path) -> ToolOutput {
        self.run(vec![
            "rsa".into(),
            "-in".into(),
            key.into(),
            "-check".into(),
            "-noout".into(),
        ])
        .await
    }
}

/// Subject and validity lines from `openssl x509 -text` output
pub fn certificate_highlights(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| {
            line.contains("Subject:") || line.contains("Not Before") || line.contains("Not After")
        })
        .map(str::trim)
        .collect()
}

/// Where to get `openssl` when it is missing
pub const INSTALL_HINTS: &[&str] = &[
    "Windows: https://slproweb.com/products/Win32OpenSSL.html",
    "Linux: sudo apt-get install openssl",
    "macOS: brew install openssl",
];
