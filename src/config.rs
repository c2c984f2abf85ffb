//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.studentdash.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Summarizer settings.
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            verbose: false,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Synthetic data generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of student records to generate at startup.
    #[serde(default = "default_students")]
    pub students: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            students: default_students(),
        }
    }
}

fn default_students() -> u32 {
    100
}

/// Summarization backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Whether summarization is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Summarizer API URL.
    #[serde(default = "default_summarizer_url")]
    pub url: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Minimum summary length in words.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Maximum summary length in words.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_summarizer_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_summarizer_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_min_length() -> usize {
    100
}

fn default_max_length() -> usize {
    250
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".studentdash.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Network settings - always override since they have defaults in CLI
        self.general.bind = args.bind.clone();
        self.general.port = args.port;

        // Generator size
        self.generator.students = args.students;

        // Summarizer settings
        self.summarizer.url = args.summarizer_url.clone();
        self.summarizer.model = args.model.clone();

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.summarizer.timeout_seconds = timeout;
        }

        if args.no_summarizer {
            self.summarizer.enabled = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
