//! Global logging module for the XCCDF converter
//!
//! Provides thread-safe global logging with per-report context and a
//! macro interface. Events carry registry codes so every failure maps to
//! a category, a severity and a recommended action.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, LogCrateLogger, Logger, LoggingService, MemoryLogger, StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileContext>> = const { RefCell::new(None) };
}

/// The report currently being converted on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    install(logging_service.clone())?;

    let event = LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    logging_service.log_event(event);

    Ok(())
}

/// Initialize with custom service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    install(service)
}

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::stream::MALFORMED_XML,
        codes::interpreter::STRUCTURAL_MISMATCH,
        codes::output::WRITE_FAILED,
    ] {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// True when a debug event would reach a backend
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileContext { file_path, file_id });
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn dispatch(mut event: LogEvent, context: Vec<(&str, &str)>) {
    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(file_ctx) = get_current_file_context() {
        event = event.with_context("file", &file_ctx.file_path.display().to_string());
        event = event.with_context("file_id", &file_ctx.file_id.to_string());
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    position: Option<u64>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(p) = position {
        event = event.with_position(p);
    }
    dispatch(event, context);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::success(code, message), context);
}

/// Log a prepared event with context (used by info, warning and debug macros)
pub fn log_with_context(event: LogEvent, context: Vec<(&str, &str)>) {
    dispatch(event, context);
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("{}\n", crate::config::build_info::source_info()));
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Service level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Error logging that falls back to stderr before initialization
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Install a shared in-memory service for the whole test binary
#[cfg(test)]
pub(crate) fn install_test_logger() -> Arc<MemoryLogger> {
    static TEST_LOGGER: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

    TEST_LOGGER
        .get_or_init(|| {
            let logger = service::create_test_logger();
            let service = Arc::new(LoggingService::new(logger.clone(), LogLevel::Debug));
            if let Err(e) = init_global_logging_with_service(service) {
                panic!("test logger could not be installed: {}", e);
            }
            logger
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{log_debug, log_error, log_info, log_success, log_warning};

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("scan.xml");

        clear_file_context();
        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context().unwrap();
        assert_eq!(context.file_path, file_path);
        assert_eq!(context.file_id, 1);

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("scan.xml");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context().unwrap();
            assert_eq!(context.file_path, file_path);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_macros_do_not_panic_without_initialization() {
        log_error!(codes::stream::MALFORMED_XML, "bad xml", position = Some(10));
        log_success!(codes::success::OUTPUT_WRITTEN, "written", "bytes" => 12);
        log_info!("converting", "path" => "scan.xml");
        log_warning!("odd input");
        log_debug!("event", "depth" => 3);
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
