//! Configuration module for the XCCDF converter
//!
//! Security limits are compile-time constants; user preferences are
//! resolved at runtime from environment variables or a TOML file.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConversionPreferences, LogLevel, LoggingPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the crate version baked in at compile time
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!(
            "xccdf_converter {} (limits compiled in, preferences from XCCDF_* environment)",
            version()
        )
    }
}
