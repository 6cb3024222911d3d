// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Runtime configuration loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    Parse { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionPreferences {
    /// Pretty-print the JSON output with a 2-space indent
    pub pretty: bool,

    /// Text encoding label for the output file
    pub encoding: String,

    /// Write every non-ASCII character as a \uXXXX escape
    pub escape_non_ascii: bool,

    /// Whether to require a .xml extension on the input report
    pub require_xml_extension: bool,

    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,
}

impl Default for ConversionPreferences {
    /// Built-in values overridden by any `XCCDF_*` variables that are set
    fn default() -> Self {
        Self {
            pretty: env::var(env_vars::PRETTY)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            encoding: env::var(env_vars::ENCODING)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "utf-8".to_string()),
            escape_non_ascii: env::var(env_vars::ESCAPE_NON_ASCII)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            require_xml_extension: env::var(env_vars::REQUIRE_XML_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl ConversionPreferences {
    /// Preferences for `convert(input, output, encoding, pretty)`.
    /// Independent of the environment.
    pub fn new(encoding: impl Into<String>, pretty: bool) -> Self {
        Self {
            pretty,
            encoding: encoding.into(),
            escape_non_ascii: false,
            require_xml_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn with_escape_non_ascii(mut self, enabled: bool) -> Self {
        self.escape_non_ascii = enabled;
        self
    }

    pub fn with_xml_extension_required(mut self, required: bool) -> Self {
        self.require_xml_extension = required;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub conversion: ConversionPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections and keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Conversion
    pub const PRETTY: &str = "XCCDF_PRETTY";
    pub const ENCODING: &str = "XCCDF_ENCODING";
    pub const ESCAPE_NON_ASCII: &str = "XCCDF_ESCAPE_NON_ASCII";
    pub const REQUIRE_XML_EXTENSION: &str = "XCCDF_REQUIRE_XML_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "XCCDF_ENABLE_PERFORMANCE_LOGGING";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "XCCDF_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "XCCDF_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "XCCDF_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_convert_contract_preferences() {
        let prefs = ConversionPreferences::new("latin1", false);
        assert_eq!(prefs.encoding, "latin1");
        assert!(!prefs.pretty);
        assert!(!prefs.escape_non_ascii);
        assert!(!prefs.require_xml_extension);
    }

    #[test]
    fn test_toml_overrides_selected_keys() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [conversion]
            pretty = false
            encoding = "utf-16le"

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(!config.conversion.pretty);
        assert_eq!(config.conversion.encoding, "utf-16le");
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = RuntimeConfig::from_toml_str("[conversion]\npretty = \"sometimes\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xccdf2json.toml");

        let mut config = RuntimeConfig::default();
        config.conversion.escape_non_ascii = true;
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = RuntimeConfig::from_file(&path).unwrap();
        assert!(loaded.conversion.escape_non_ascii);
    }

    #[test]
    fn test_missing_config_file() {
        let result = RuntimeConfig::from_file(Path::new("/nonexistent/xccdf2json.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
