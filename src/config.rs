//! Configuration module for Attika.

use serde::Deserialize;
use std::path::Path;

use crate::{AttikaError, Result};

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory where attachments are stored (flat, one file per
    /// stored name).
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    /// Replace uploaded file names with a random token before storing.
    #[serde(default = "default_obfuscate")]
    pub obfuscate: bool,
    /// When obfuscating, drop the original extension from the stored name.
    #[serde(default)]
    pub hide_extension: bool,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_base_dir() -> String {
    "data/attachments".to_string()
}

fn default_obfuscate() -> bool {
    true
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            obfuscate: default_obfuscate(),
            hide_extension: false,
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Content-type detector selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorKind {
    /// General-purpose content recognition (`file_format` crate).
    Sniffer,
    /// Magic-number signature matching (`infer` crate).
    MagicBytes,
}

fn default_detector() -> DetectorKind {
    DetectorKind::Sniffer
}

/// Content gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Enable the detected-type allow-list check after the bytes are written.
    #[serde(default)]
    pub enabled: bool,
    /// MIME types accepted by the gate.
    #[serde(default)]
    pub allowed_types: Vec<String>,
    /// Which detector inspects the stored bytes.
    #[serde(default = "default_detector")]
    pub detector: DetectorKind,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_types: Vec::new(),
            detector: default_detector(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console-only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Content gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AttikaError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AttikaError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ATTIKA_BASE_DIR`: Override the storage base directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_dir) = std::env::var("ATTIKA_BASE_DIR") {
            if !base_dir.is_empty() {
                self.storage.base_dir = base_dir;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The content gate is enabled but the allow-list is empty
    /// - The upload size limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.gate.enabled && self.gate.allowed_types.is_empty() {
            return Err(AttikaError::Validation(
                "content gate is enabled but allowed_types is empty. \
                 Every upload would be rejected."
                    .to_string(),
            ));
        }
        if self.storage.max_upload_size_mb == 0 {
            return Err(AttikaError::Validation(
                "max_upload_size_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.base_dir, "data/attachments");
        assert!(config.storage.obfuscate);
        assert!(!config.storage.hide_extension);
        assert_eq!(config.storage.max_upload_size_mb, 10);

        assert!(!config.gate.enabled);
        assert!(config.gate.allowed_types.is_empty());
        assert_eq!(config.gate.detector, DetectorKind::Sniffer);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[storage]
base_dir = "custom/files"
obfuscate = false
hide_extension = true
max_upload_size_mb = 20

[gate]
enabled = true
allowed_types = ["image/png", "image/jpeg", "application/pdf"]
detector = "magic-bytes"

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.storage.base_dir, "custom/files");
        assert!(!config.storage.obfuscate);
        assert!(config.storage.hide_extension);
        assert_eq!(config.storage.max_upload_size_mb, 20);

        assert!(config.gate.enabled);
        assert_eq!(config.gate.allowed_types.len(), 3);
        assert_eq!(config.gate.allowed_types[0], "image/png");
        assert_eq!(config.gate.detector, DetectorKind::MagicBytes);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("custom/logs/app.log"));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[storage]
base_dir = "uploads"
"#;

        let config = Config::parse(toml).unwrap();

        // Specified values
        assert_eq!(config.storage.base_dir, "uploads");

        // Default values
        assert!(config.storage.obfuscate);
        assert!(!config.gate.enabled);
        assert_eq!(config.gate.detector, DetectorKind::Sniffer);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.storage.base_dir, "data/attachments");
        assert_eq!(config.storage.max_upload_size_mb, 10);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(AttikaError::Validation(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_parse_unknown_detector() {
        let toml = r#"
[gate]
detector = "tea-leaves"
"#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(result.is_err());
        assert!(matches!(result, Err(AttikaError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides_base_dir() {
        let original = std::env::var("ATTIKA_BASE_DIR").ok();

        std::env::set_var("ATTIKA_BASE_DIR", "/srv/attachments");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.storage.base_dir, "/srv/attachments");

        if let Some(val) = original {
            std::env::set_var("ATTIKA_BASE_DIR", val);
        } else {
            std::env::remove_var("ATTIKA_BASE_DIR");
        }
    }

    #[test]
    fn test_apply_env_overrides_empty_value() {
        let original = std::env::var("ATTIKA_BASE_DIR").ok();

        std::env::set_var("ATTIKA_BASE_DIR", "");

        let mut config = Config::default();
        config.storage.base_dir = "original/dir".to_string();
        config.apply_env_overrides();

        // Should not override with empty string
        assert_eq!(config.storage.base_dir, "original/dir");

        if let Some(val) = original {
            std::env::set_var("ATTIKA_BASE_DIR", val);
        } else {
            std::env::remove_var("ATTIKA_BASE_DIR");
        }
    }

    #[test]
    fn test_validate_gate_enabled_empty_allow_list() {
        let mut config = Config::default();
        config.gate.enabled = true;

        let result = config.validate();
        assert!(result.is_err());
        if let Err(AttikaError::Validation(msg)) = result {
            assert!(msg.contains("allowed_types"));
        }
    }

    #[test]
    fn test_validate_gate_enabled_with_allow_list() {
        let mut config = Config::default();
        config.gate.enabled = true;
        config.gate.allowed_types = vec!["image/png".to_string()];

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_upload_limit() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }
}
