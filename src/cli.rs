//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// rivalscope - competitive-intelligence reports from a multi-agent AI workflow
///
/// Sends a competitor to the remote orchestrator, prints the normalized
/// report with a derived threat level, and exports it as JSON.
///
/// Examples:
///   rivalscope "Acme Corp" --agent-id ci-workflow
///   rivalscope "Acme Corp" --endpoint https://agents.example.com/run --format json
///   rivalscope "Acme Corp" --replay saved-response.json --no-export
///   rivalscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Name of the competitor to analyze
    #[arg(value_name = "COMPETITOR", required_unless_present = "init_config")]
    pub competitor: Option<String>,

    /// Orchestrator endpoint URL
    ///
    /// Can also be set via RIVALSCOPE_ENDPOINT or .rivalscope.toml.
    #[arg(long, value_name = "URL", env = "RIVALSCOPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Identifier of the multi-agent workflow to run
    #[arg(long, value_name = "ID", env = "RIVALSCOPE_AGENT_ID")]
    pub agent_id: Option<String>,

    /// User id sent with the request
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory the exported report is written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not write the exported JSON report
    #[arg(long)]
    pub no_export: bool,

    /// Terminal output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Include the orchestrator's final output in the Markdown view
    #[arg(long)]
    pub raw_output: bool,

    /// Load a saved orchestrator response instead of calling the orchestrator
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .rivalscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .rivalscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the terminal view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The competitor as typed; emptiness is checked when the analysis is submitted.
    pub fn competitor(&self) -> &str {
        self.competitor.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref replay) = self.replay {
            if !replay.is_file() {
                return Err(format!("Replay file does not exist: {}", replay.display()));
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
