//! rivalscope - competitive-intelligence reports from a multi-agent AI workflow
//!
//! Submits a competitor to a remote orchestrator, normalizes the returned
//! sub-agent results, derives a threat level, prints the report and
//! exports it as JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Validation, analysis or runtime error

mod analysis;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{OrchestratorClient, OrchestratorConfig, ReplayBackend};
use config::{Config, CONFIG_FILE_NAME};
use error::SubmitError;
use indicatif::{ProgressBar, ProgressStyle};
use session::{validate_competitor, Session};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("rivalscope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .rivalscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Set [orchestrator] endpoint and agent_id before running an analysis.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the report on stdout can be piped.
fn init_logging(args: &Args) {
    let filter = log_filter(args, &std::env::var("RUST_LOG").unwrap_or_default());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Build the log filter. `RUST_LOG` directives, when present, replace the
/// level chosen by `-v` / `-q`.
fn log_filter(args: &Args, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .parse_lossy(directives)
}

/// Run one analysis and display/export the result. Returns the exit code.
async fn run_analysis(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let competitor = match preflight(&args, &config) {
        Ok(competitor) => competitor,
        Err(e) if e.is::<SubmitError>() => {
            eprintln!("\n❌ {}", e);
            return Ok(1);
        }
        Err(e) => return Err(e),
    };

    let show_progress = !args.quiet;
    let mut session = Session::new();

    let spinner = if show_progress {
        Some(loading_spinner(&competitor))
    } else {
        None
    };

    let outcome = match args.replay {
        Some(ref path) => {
            let backend = ReplayBackend::new(path.clone());
            session.submit(&competitor, &backend).await.map(|_| ())
        }
        None => {
            let client = OrchestratorClient::new(OrchestratorConfig::from(&config.orchestrator))?;
            session.submit(&competitor, &client).await.map(|_| ())
        }
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if outcome.is_err() {
        eprintln!("\n❌ {}", session.error().unwrap_or(crate::error::GENERIC_FAILURE));
        return Ok(1);
    }

    // Sampled once so the displayed and exported timestamps agree.
    let timestamp = Utc::now();
    let exported = session
        .export(timestamp)
        .context("Analysis finished without a report")?;

    let view = match config.report.format {
        OutputFormat::Markdown => {
            report::generate_markdown_report(&exported, config.report.include_raw_output)
        }
        OutputFormat::Json => report::generate_json_report(&exported)?,
    };
    println!("{}", view);

    if config.general.export {
        let artifact = report::prepare_export(&exported, timestamp)?;
        let path = report::write_artifact(&artifact, Path::new(&config.general.output_dir))?;
        if show_progress {
            eprintln!("💾 Report exported to: {}", path.display());
        }
    }

    if show_progress {
        eprintln!(
            "{} Threat level for {}: {}",
            exported.threat_level.emoji(),
            exported.competitor_name,
            exported.threat_level
        );
    }

    Ok(0)
}

/// Checks that must pass before anything is sent or shown as loading.
///
/// The competitor name is validated first, so an empty name is reported
/// as such even when the orchestrator is not configured.
fn preflight(args: &Args, config: &Config) -> Result<String> {
    let competitor = validate_competitor(args.competitor())?;

    if args.replay.is_none() && config.orchestrator.agent_id.is_empty() {
        anyhow::bail!(
            "No agent id configured. Use --agent-id or set [orchestrator] agent_id in {}",
            CONFIG_FILE_NAME
        );
    }

    Ok(competitor)
}

/// Spinner shown while the request is in flight.
fn loading_spinner(competitor: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Analyzing {}...", competitor));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
