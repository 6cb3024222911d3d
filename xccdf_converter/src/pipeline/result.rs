use crate::file_processor::FileMetadata;
use std::time::Duration;

/// Summary of one completed conversion
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub input_metadata: Option<FileMetadata>,
    pub profile_count: usize,
    pub selection_count: usize,
    pub rule_count: usize,
    pub result_count: usize,
    pub has_score: bool,
    pub bytes_written: u64,
    pub encoding: String,
    pub processing_duration: Duration,
}

impl ConversionResult {
    pub fn log_success(&self, input: &str, output: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let input_bytes = self.input_metadata.as_ref().map_or(0, |m| m.size);

        crate::log_success!(
            crate::logging::codes::success::CONVERSION_COMPLETE,
            "Conversion completed",
            "input" => input,
            "output" => output,
            "profiles" => self.profile_count,
            "rules" => self.rule_count,
            "results" => self.result_count,
            "bytes_written" => self.bytes_written,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                if seconds > 0.0 { input_bytes as f64 / seconds } else { 0.0 })
        );
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} profiles, {} rules, {} results{}; {} bytes ({}) in {:.2} ms",
            self.profile_count,
            self.rule_count,
            self.result_count,
            if self.has_score { ", scored" } else { "" },
            self.bytes_written,
            self.encoding,
            self.processing_duration.as_secs_f64() * 1000.0
        )
    }
}
