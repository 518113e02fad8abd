//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.rivalscope.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::client::orchestrator::{OrchestratorConfig, DEFAULT_INSTRUCTION_TEMPLATE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".rivalscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Orchestrator connection settings.
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory exported reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Write the exported JSON document after each analysis.
    #[serde(default = "default_true")]
    pub export: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            export: true,
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

/// Remote orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// URL the analysis request is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Opaque identifier of the multi-agent workflow.
    #[serde(default)]
    pub agent_id: String,

    /// User id sent as session metadata.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Instruction sent to the workflow; `{competitor}` is replaced.
    #[serde(default = "default_instruction_template")]
    pub instruction_template: String,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            agent_id: String::new(),
            user_id: default_user_id(),
            timeout_seconds: default_timeout(),
            instruction_template: default_instruction_template(),
        }
    }
}

fn default_endpoint() -> String {
    OrchestratorConfig::default().endpoint
}

fn default_user_id() -> String {
    OrchestratorConfig::default().user_id
}

fn default_timeout() -> u64 {
    300 // multi-agent runs routinely take minutes
}

fn default_instruction_template() -> String {
    DEFAULT_INSTRUCTION_TEMPLATE.to_string()
}

impl From<&OrchestratorSettings> for OrchestratorConfig {
    fn from(settings: &OrchestratorSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            agent_id: settings.agent_id.clone(),
            user_id: settings.user_id.clone(),
            timeout_seconds: settings.timeout_seconds,
            instruction_template: settings.instruction_template.clone(),
        }
    }
}

/// Report display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Terminal view format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Append the orchestrator's final output to the Markdown view.
    #[serde(default)]
    pub include_raw_output: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            include_raw_output: false,
        }
    }
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when they were given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.orchestrator.endpoint = endpoint.clone();
        }
        if let Some(ref agent_id) = args.agent_id {
            self.orchestrator.agent_id = agent_id.clone();
        }
        if let Some(ref user_id) = args.user_id {
            self.orchestrator.user_id = user_id.clone();
        }
        if let Some(timeout) = args.timeout {
            self.orchestrator.timeout_seconds = timeout;
        }

        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.display().to_string();
        }
        if args.no_export {
            self.general.export = false;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags always override
        if args.raw_output {
            self.report.include_raw_output = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
