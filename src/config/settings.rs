//! Application settings configuration
//!
//! Defines project paths, certificate generation parameters and external
//! tool limits.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the settings file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Project layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory uploaded to the ESP32 filesystem
    pub data_dir: PathBuf,
    pub server_cert: String,
    pub server_key: String,
    /// Certificate served by the ESP32 HTTPS server
    pub copy_source: PathBuf,
    /// Certificate bundled into the Android app
    pub copy_destination: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            server_cert: "server.crt".to_string(),
            server_key: "server.key".to_string(),
            copy_source: PathBuf::from("elevox-server/https_server/data/server.crt"),
            copy_destination: PathBuf::from("elevox-app/app/src/main/res/raw/esp.crt"),
        }
    }
}

impl PathSettings {
    pub fn cert_path(&self) -> PathBuf {
        self.data_dir.join(&self.server_cert)
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join(&self.server_key)
    }
}

/// Self-signed certificate generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateSettings {
    /// `openssl` binary name or path
    pub openssl: String,
    pub key_bits: u32,
    pub days: u32,
    pub subject: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            openssl: "openssl".to_string(),
            key_bits: 2048,
            days: 3650,
            subject: "/C=BR/ST=State/L=City/O=ESP32/OU=IoT/CN=esp32.local".to_string(),
        }
    }
}

/// External tool execution
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Upper bound on a single external command; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

impl ToolSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub generate: GenerateSettings,
    pub tools: ToolSettings,
}

impl Settings {
    /// Load settings from the default config file, falling back to built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_PATH);
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.generate.key_bits < 1024 {
            return Err(ConfigError::InvalidValue {
                key: "generate.key_bits".to_string(),
                message: format!("{} is too small", self.generate.key_bits),
            });
        }
        if self.generate.days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generate.days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.tools.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "tools.timeout_secs".to_string(),
                message: "must be at least 1 (omit it to wait indefinitely)".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.paths.cert_path(), PathBuf::from("data/server.crt"));
        assert_eq!(settings.paths.key_path(), PathBuf::from("data/server.key"));
        assert_eq!(settings.generate.key_bits, 2048);
        assert_eq!(settings.generate.days, 3650);
        assert!(settings.tools.timeout().is_none());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let shipped = Settings::load_from_file(path).unwrap();
        let defaults = Settings::default();
        assert_eq!(shipped.paths.cert_path(), defaults.paths.cert_path());
        assert_eq!(shipped.paths.copy_destination, defaults.paths.copy_destination);
        assert_eq!(shipped.generate.subject, defaults.generate.subject);
        assert_eq!(shipped.generate.key_bits, defaults.generate.key_bits);
        assert_eq!(shipped.tools.timeout(), None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generate]\ndays = 365\n\n[tools]\ntimeout_secs = 30").unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.generate.days, 365);
        assert_eq!(settings.generate.key_bits, 2048);
        assert_eq!(settings.tools.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.paths.server_cert, "server.crt");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generate]\nkey_bits = 512").unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        assert!(matches!(
            Settings::load_from_file("/nonexistent/esp-certkit.toml"),
            Err(ConfigError::FileNotFound { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generate\ndays = ").unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
