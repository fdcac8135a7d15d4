//! Configuration file management.
//!
//! Settings live in `bt-inquiry/config.toml` under the platform config
//! directory. Every field has a default, so a missing file, or a file that
//! sets only a few keys, is valid.
//!
//! ```toml
//! [discovery]
//! interval_secs = 10
//! adapter = "hci0"
//!
//! [logging]
//! level = "debug"
//! console = true
//! directory = "log"
//! file_name = "bt-inquiry.log"
//! max_file_size_mb = 10
//! compress = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest pause allowed between discovery cycles.
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discovery loop settings.
    pub discovery: DiscoveryConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration, reporting every invalid field at once.
    ///
    /// # Example
    ///
    /// ```
    /// use inquiry_cli::config::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.discovery.validate());
        errors.extend(self.logging.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Discovery loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Seconds to wait between discovery cycles.
    pub interval_secs: u64,
    /// Adapter name filter (e.g. `hci0`); the first adapter when unset.
    pub adapter: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            adapter: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval_secs == 0 || self.interval_secs > MAX_INTERVAL_SECS {
            errors.push(ValidationError {
                field: "discovery.interval_secs".to_string(),
                message: format!(
                    "interval {} is out of range: expected 1..={}",
                    self.interval_secs, MAX_INTERVAL_SECS
                ),
            });
        }

        if let Some(adapter) = &self.adapter
            && adapter.trim().is_empty()
        {
            errors.push(ValidationError {
                field: "discovery.adapter".to_string(),
                message: "adapter name cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `"info"`).
    pub level: String,
    /// Also log to the console.
    pub console: bool,
    /// Directory holding the log file.
    pub directory: PathBuf,
    /// Name of the active log file.
    pub file_name: String,
    /// Rotate once the file would exceed this many megabytes.
    pub max_file_size_mb: u64,
    /// Gzip rotated files.
    pub compress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            console: true,
            directory: PathBuf::from("log"),
            file_name: "bt-inquiry.log".to_string(),
            max_file_size_mb: 10,
            compress: true,
        }
    }
}

impl LoggingConfig {
    /// Rotation threshold in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Full path of the active log file.
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.level.trim().is_empty() {
            errors.push(ValidationError {
                field: "logging.level".to_string(),
                message: "log level cannot be empty".to_string(),
            });
        } else if let Err(e) = self.level.parse::<tracing_subscriber::EnvFilter>() {
            errors.push(ValidationError {
                field: "logging.level".to_string(),
                message: format!("invalid filter '{}': {}", self.level, e),
            });
        }

        if self.file_name.trim().is_empty() {
            errors.push(ValidationError {
                field: "logging.file_name".to_string(),
                message: "file name cannot be empty".to_string(),
            });
        } else if self.file_name.contains(['/', '\\']) {
            errors.push(ValidationError {
                field: "logging.file_name".to_string(),
                message: format!(
                    "file name '{}' must not contain a path separator",
                    self.file_name
                ),
            });
        }

        if self.directory.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "logging.directory".to_string(),
                message: "log directory cannot be empty".to_string(),
            });
        }

        if self.max_file_size_mb == 0 {
            errors.push(ValidationError {
                field: "logging.max_file_size_mb".to_string(),
                message: "max file size must be at least 1 MB".to_string(),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `logging.file_name`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bt-inquiry")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: Result<(), ConfigError>) -> Vec<String> {
        match result {
            Err(ConfigError::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.discovery.interval_secs, 10);
        assert_eq!(config.discovery.adapter, None);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.console);
        assert_eq!(config.logging.directory, PathBuf::from("log"));
        assert_eq!(config.logging.file_name, "bt-inquiry.log");
        assert_eq!(config.logging.max_file_size_mb, 10);
        assert!(config.logging.compress);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_derived_values() {
        let config = Config::default();
        assert_eq!(config.discovery.interval(), Duration::from_secs(10));
        assert_eq!(config.logging.max_file_size(), 10 * 1024 * 1024);
        assert_eq!(
            config.logging.file_path(),
            PathBuf::from("log").join("bt-inquiry.log")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [discovery]
            interval_secs = 30
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.discovery.interval_secs, 30);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_config_full_toml() {
        let toml = r#"
            [discovery]
            interval_secs = 5
            adapter = "hci1"

            [logging]
            level = "info,btleplug=warn"
            console = false
            directory = "/var/log/bt-inquiry"
            file_name = "inquiry.log"
            max_file_size_mb = 50
            compress = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.discovery.adapter.as_deref(), Some("hci1"));
        assert_eq!(config.logging.level, "info,btleplug=warn");
        assert!(!config.logging.console);
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/bt-inquiry"));
        assert_eq!(config.logging.max_file_size_mb, 50);
        assert!(!config.logging.compress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialized_file_loads_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.discovery.interval_secs = 42;
        config.discovery.adapter = Some("hci0".to_string());
        config.logging.compress = false;

        std::fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("bt-inquiry/config.toml"));
    }

    #[test]
    fn test_interval_bounds() {
        let mut config = Config::default();

        config.discovery.interval_secs = 0;
        assert_eq!(fields(config.validate()), vec!["discovery.interval_secs"]);

        config.discovery.interval_secs = MAX_INTERVAL_SECS + 1;
        assert_eq!(fields(config.validate()), vec!["discovery.interval_secs"]);

        config.discovery.interval_secs = 1;
        assert!(config.validate().is_ok());
        config.discovery.interval_secs = MAX_INTERVAL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_adapter_rejected() {
        let mut config = Config::default();
        config.discovery.adapter = Some("  ".to_string());
        assert_eq!(fields(config.validate()), vec!["discovery.adapter"]);
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = Config::default();
        config.discovery.interval_secs = 0;
        config.logging.level = String::new();
        config.logging.file_name = "logs/inquiry.log".to_string();
        config.logging.max_file_size_mb = 0;

        assert_eq!(
            fields(config.validate()),
            vec![
                "discovery.interval_secs",
                "logging.level",
                "logging.file_name",
                "logging.max_file_size_mb",
            ]
        );
    }

    #[test]
    fn test_invalid_level_directive() {
        let mut config = Config::default();
        config.logging.level = "inquiry=notalevel".to_string();
        assert_eq!(fields(config.validate()), vec!["logging.level"]);
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "discovery.interval_secs".to_string(),
                message: "too small".to_string(),
            },
            ValidationError {
                field: "logging.file_name".to_string(),
                message: "empty".to_string(),
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("Configuration validation failed:"));
        assert!(text.contains("  - discovery.interval_secs: too small"));
        assert!(text.contains("  - logging.file_name: empty"));
    }
}
