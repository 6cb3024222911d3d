//! # xccdf2json
//!
//! Converts an XCCDF 1.2 scan report into a JSON summary document.

use clap::Parser;
use std::path::{Path, PathBuf};
use xccdf_converter::config::runtime::{LogLevel, RuntimeConfig};
use xccdf_converter::{log_info, logging, pipeline, PipelineError};

/// Convert an XCCDF 1.2 scan report to JSON
#[derive(Parser, Debug)]
#[command(name = "xccdf2json")]
#[command(version, about, long_about = None)]
struct Cli {
    /// XCCDF report to convert
    input: PathBuf,

    /// Output file (default: input path with a .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write compact JSON instead of indented output
    #[arg(long)]
    compact: bool,

    /// Output text encoding label (utf-8, latin1, utf-16le, shift_jis, ...)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Escape every non-ASCII character as \uXXXX
    #[arg(long)]
    ascii: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit library log events as JSON lines
    #[arg(long)]
    structured_logs: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and suppress the summary
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Apply command line flags over file and environment settings
    fn apply_to(&self, config: &mut RuntimeConfig) {
        if self.compact {
            config.conversion.pretty = false;
        }
        if let Some(encoding) = &self.encoding {
            config.conversion.encoding = encoding.clone();
        }
        if self.ascii {
            config.conversion.escape_non_ascii = true;
        }
        if self.structured_logs {
            config.logging.use_structured_logging = true;
        }
        if self.verbose {
            config.logging.min_log_level = LogLevel::Debug;
        } else if self.quiet {
            config.logging.min_log_level = LogLevel::Error;
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// `scan.xml` becomes `scan.json`; an input already named `.json` gets a suffix instead
fn default_output_path(input: &Path) -> PathBuf {
    let candidate = input.with_extension("json");
    if candidate == input {
        let mut name = input.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    } else {
        candidate
    }
}

fn level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    cli.apply_to(&mut config);
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    env_logger::Builder::new()
        .filter_level(level_filter(config.logging.min_log_level))
        .parse_default_env()
        .init();

    // Initialize global logging system
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    // Validate pipeline configuration
    pipeline::validate_pipeline()?;

    if cli.verbose {
        eprintln!("{}", logging::get_system_diagnostics());
    }

    let output = cli.output_path();
    log_info!("xccdf2json starting",
        "version" => env!("CARGO_PKG_VERSION"),
        "input" => cli.input.display(),
        "output" => output.display()
    );

    match pipeline::convert_with_preferences(&cli.input, &output, &config.conversion) {
        Ok(result) => {
            if !cli.quiet {
                println!("SUCCESS: {} -> {}", cli.input.display(), output.display());
                println!("  {}", result.summary());
            }
        }
        Err(error) => {
            logging::safe_log_error(error.error_code(), &error.to_string());
            eprintln!("FAILED: {}", error);
            print_detailed_error(&error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_detailed_error(error: &PipelineError) {
    let code = error.error_code();
    eprintln!("  code: {} ({})", code, error.category());
    if let Some(position) = error.position() {
        eprintln!("  at byte offset: {}", position);
    }
    let action = logging::codes::get_action(code.as_str());
    if !action.is_empty() {
        eprintln!("  action: {}", action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("scans/report.xml")),
            PathBuf::from("scans/report.json")
        );
        assert_eq!(
            default_output_path(Path::new("report")),
            PathBuf::from("report.json")
        );
        assert_eq!(
            default_output_path(Path::new("report.json")),
            PathBuf::from("report.json.json")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "xccdf2json",
            "in.xml",
            "--compact",
            "--encoding",
            "latin1",
            "--ascii",
            "-v",
        ]);
        let mut config = RuntimeConfig::default();
        cli.apply_to(&mut config);

        assert!(!config.conversion.pretty);
        assert!(config.conversion.escape_non_ascii);
        assert_eq!(config.conversion.encoding, "latin1");
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(cli.output_path(), PathBuf::from("in.json"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["xccdf2json", "in.xml", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xccdf.toml");
        fs::write(&path, "[conversion]\nencoding = \"utf-16le\"\npretty = false\n").unwrap();

        let cli = Cli::parse_from([
            "xccdf2json",
            "in.xml",
            "--config",
            path.to_str().unwrap(),
            "-o",
            "out.json",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.conversion.encoding, "utf-16le");
        assert!(!config.conversion.pretty);
        assert_eq!(cli.output_path(), PathBuf::from("out.json"));
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Warning), log::LevelFilter::Warn);
        assert_eq!(level_filter(LogLevel::Debug), log::LevelFilter::Debug);
    }
}
