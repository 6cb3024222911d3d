//! Logging service and logger backends

use super::codes::Code;
use super::config::{self, Backend};
use super::events::{LogEvent, LogLevel};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service with the configured backend and level
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = match config::backend() {
            Backend::Structured => Arc::new(StructuredLogger::new(min_level)),
            Backend::Console => Arc::new(ConsoleLogger::new(min_level)),
            Backend::LogCrate => Arc::new(LogCrateLogger::new()),
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&truncate_message(event));
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

}

fn truncate_message(mut event: LogEvent) -> LogEvent {
    let limit = config::get_max_log_message_length();
    if event.message.len() > limit {
        let mut cut = limit;
        while !event.message.is_char_boundary(cut) {
            cut -= 1;
        }
        event.message.truncate(cut);
        event.message.push_str("...");
    }
    event
}

/// Plain text lines on stderr; stdout is left to the converter's own output
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }
        if event.is_error() {
            eprintln!("{}", event.format_detailed());
        } else {
            eprintln!("{}", event.format());
        }
    }
}

/// One JSON object per line on stderr
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let line = event.format_json().unwrap_or_else(|_| event.format());
            eprintln!("{}", line);
        }
    }
}

/// Forwards events to the `log` facade so the host binary's logger
/// (env_logger in the CLI) decides filtering and formatting.
pub struct LogCrateLogger {
    target: &'static str,
}

impl LogCrateLogger {
    pub fn new() -> Self {
        Self {
            target: "xccdf_converter",
        }
    }
}

impl Default for LogCrateLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for LogCrateLogger {
    fn log(&self, event: &LogEvent) {
        let level = event.level.to_log_level();
        if !log::log_enabled!(target: self.target, level) {
            return;
        }

        if event.context.is_empty() {
            log::log!(target: self.target, level, "{}", event.format());
        } else {
            let context = event
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            log::log!(target: self.target, level, "{} ({})", event.format(), context);
        }
    }
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    /// Events logged while `path` was the current file context
    pub fn events_for_file(&self, path: &Path) -> Vec<LogEvent> {
        let file = path.display().to_string();
        self.lock()
            .iter()
            .filter(|e| e.context.get("file") == Some(&file))
            .cloned()
            .collect()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();

        let max_events = config::get_error_buffer_size();
        if events.len() >= max_events {
            let remove_count = events.len() - max_events + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Create logging service based on current configuration
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

/// Create testing logger (memory-based, all events captured)
pub fn create_test_logger() -> Arc<MemoryLogger> {
    Arc::new(MemoryLogger::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    fn codes_of(events: &[LogEvent]) -> Vec<&str> {
        events.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_memory_logger_scopes_events_by_file() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("unscoped"));
        logger.log(
            &LogEvent::error(codes::stream::MALFORMED_XML, "Error message")
                .with_context("file", "scan.xml"),
        );

        assert_eq!(logger.get_events().len(), 2);
        let scoped = logger.events_for_file(Path::new("scan.xml"));
        assert_eq!(codes_of(&scoped), vec!["E020"]);
        assert!(logger.events_for_file(Path::new("other.xml")).is_empty());
    }

    #[test]
    fn test_logging_service() {
        let logger = create_test_logger();
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_error(codes::output::UNSUPPORTED_ENCODING, "Test error");
        service.log_event(LogEvent::success(codes::success::OUTPUT_WRITTEN, "Test success"));
        service.log_event(LogEvent::info("Test info"));

        let events = logger.get_events();
        assert_eq!(events.len(), 3);
        assert!(events[0].is_error());
        assert_eq!(codes_of(&events[..2]), vec!["E061", "I040"]);
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = create_test_logger();
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::info("Info message"));
        service.log_event(LogEvent::warning("Warning message"));
        service.log_error(codes::system::INTERNAL_ERROR, "Error message");

        let events = logger.get_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code, codes::system::INTERNAL_ERROR);
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let logger = create_test_logger();
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        let long = "é".repeat(config::get_max_log_message_length());
        service.log_event(LogEvent::info(&long));

        let events = logger.get_events();
        assert!(events[0].message.ends_with("..."));
        assert!(events[0].message.len() <= config::get_max_log_message_length() + 3);
    }

    #[test]
    fn test_backends_do_not_panic() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "Test error")
            .with_context("key", "value");

        ConsoleLogger::new(LogLevel::Info).log(&event);
        StructuredLogger::new(LogLevel::Debug).log(&event);
        LogCrateLogger::new().log(&event);
    }
}
