//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// StudentDash - student analytics dashboard API
///
/// Serves aggregate statistics and LLM-condensed insights over a
/// synthetically generated student cohort.
///
/// Examples:
///   studentdash
///   studentdash --port 9000 --students 250
///   studentdash --model mistral:7b --summarizer-url http://localhost:11434
///   studentdash --report-only
///   studentdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "127.0.0.1", value_name = "ADDR")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "STUDENTDASH_PORT")]
    pub port: u16,

    /// Number of student records to generate at startup
    #[arg(short, long, default_value = "100", value_name = "COUNT")]
    pub students: u32,

    /// Summarization model to use
    ///
    /// Any model served by the summarizer backend works; smaller models
    /// respond faster. Can also be set via .studentdash.toml config.
    #[arg(short, long, default_value = "llama3.2:latest", env = "STUDENTDASH_MODEL")]
    pub model: String,

    /// Summarizer API endpoint URL
    #[arg(long, default_value = "http://localhost:11434", env = "SUMMARIZER_URL")]
    pub summarizer_url: String,

    /// Path to configuration file
    ///
    /// If not specified, looks for .studentdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Summarizer request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Disable the summarizer entirely
    ///
    /// Analytics endpoints return the full narrative text instead of a
    /// condensed summary. No model backend is required.
    #[arg(long)]
    pub no_summarizer: bool,

    /// Print the cohort narrative report to stdout and exit
    ///
    /// No server is started and no summarizer call is made.
    #[arg(long)]
    pub report_only: bool,

    /// Generate a default .studentdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate summarizer URL format (not needed when disabled)
        if !self.no_summarizer && !self.report_only {
            if !self.summarizer_url.starts_with("http://")
                && !self.summarizer_url.starts_with("https://")
            {
                return Err("Summarizer URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate config path if provided
        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
