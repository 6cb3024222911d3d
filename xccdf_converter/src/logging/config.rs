//! Logging configuration
//!
//! Buffer limits come from compile-time constants; level and backend are
//! user preferences captured once at startup. Until preferences are
//! installed, the environment defaults apply.

use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Where library events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// JSON lines on stderr
    Structured,
    /// Human-readable lines on stderr
    Console,
    /// Forwarded to the `log` facade
    LogCrate,
}

impl Backend {
    fn from_preferences(preferences: &LoggingPreferences) -> Self {
        if preferences.use_structured_logging {
            Backend::Structured
        } else if preferences.enable_console_logging {
            Backend::Console
        } else {
            Backend::LogCrate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Structured => "structured",
            Backend::Console => "console",
            Backend::LogCrate => "log",
        }
    }
}

/// Install preferences; only the first call takes effect
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> EventsLogLevel {
    preferences().min_log_level.to_events_log_level()
}

pub fn backend() -> Backend {
    Backend::from_preferences(&preferences())
}

/// Capacity of the in-memory test logger
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Sanity-check the compiled-in limits
pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside 100..=100000",
            LOG_BUFFER_SIZE
        ));
    }
    if MAX_LOG_MESSAGE_LENGTH == 0 {
        return Err("Max log message length must be positive".to_string());
    }
    Ok(())
}

/// Configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = preferences();

    format!(
        "Logging Configuration:\n\
         - Backend: {}\n\
         - Min log level: {}\n\
         - Log buffer size: {}\n\
         - Max message length: {}",
        Backend::from_preferences(&preferences).as_str(),
        preferences.min_log_level.as_str(),
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
    )
}
