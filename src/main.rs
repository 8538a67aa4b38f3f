//! Ocean Leaderboard - challenge round dashboard
//!
//! A CLI tool that queries the Ocean Data Farming df-sql service for a
//! challenge round and renders summary metrics, the ranked leaderboard,
//! wallet lookups and repeat submitters.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch failure, unknown round or wallet, config, etc.)

mod analysis;
mod cache;
mod cli;
mod client;
mod config;
mod dashboard;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{ClientConfig, DfSqlClient, ScoreSource};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::{console, Command, Dashboard, Event};
use report::{RenderOptions, Report, ReportMetadata};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Ocean Leaderboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings. Logs go to stderr so the
/// dashboard on stdout can be piped.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the dashboard in the mode selected by the arguments.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    debug!("Effective config: {:?}", config);
    config.validate().context("Invalid configuration")?;

    let client = DfSqlClient::new(ClientConfig {
        api_url: config.service.api_url.clone(),
        timeout_seconds: config.service.timeout_seconds,
        show_progress: !args.quiet,
    })?;

    let mut dashboard = Dashboard::open(client)
        .await
        .context("Failed to fetch the available challenge rounds")?;

    if args.list_rounds {
        print_rounds(&dashboard);
        return Ok(());
    }

    if let Some(round) = args.round {
        dashboard.apply(Event::SelectRound(round)).await?;
    }
    if let Some(ref wallet) = args.wallet {
        dashboard.apply(Event::SelectWallet(wallet.clone())).await?;
    }

    if args.interactive {
        return run_console(&mut dashboard, &config).await;
    }

    let output = render(&mut dashboard, &config).await?;

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            info!("Dashboard saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Render the current dashboard state in the configured format.
async fn render<S: ScoreSource>(dashboard: &mut Dashboard<S>, config: &Config) -> Result<String> {
    let view = dashboard.render().await?;

    let report = Report {
        metadata: ReportMetadata {
            api_url: config.service.api_url.clone(),
            generated_at: Utc::now(),
            round_range: *dashboard.range(),
        },
        dashboard: view,
    };

    let options = RenderOptions {
        precision: config.display.precision,
        top: config.display.top,
    };

    match config.display.format {
        OutputFormat::Json => report::generate_json_report(&report),
        OutputFormat::Markdown => Ok(report::generate_markdown_report(&report, &options)),
    }
}

fn print_rounds<S: ScoreSource>(dashboard: &Dashboard<S>) {
    if dashboard.range().is_empty() {
        println!("No challenge rounds available.");
        return;
    }

    for round in dashboard.range().rounds() {
        println!("{}", round);
    }
}

/// Interactive console: each line is one event, followed by a re-render.
///
/// A failing command is reported and the previous selection stays in place.
async fn run_console<S: ScoreSource>(dashboard: &mut Dashboard<S>, config: &Config) -> Result<()> {
    println!("{}", render(dashboard, config).await?);
    println!("{}\n", console::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("⚠️  {}", msg);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", console::HELP),
            Command::Rounds => print_rounds(dashboard),
            Command::Show => show(dashboard, config).await,
            Command::Apply(event) => match dashboard.apply(event).await {
                Ok(()) => {
                    debug!("Dashboard state: {:?}", dashboard.state());
                    show(dashboard, config).await
                }
                Err(e) => {
                    warn!("Command failed: {}", e);
                    eprintln!("⚠️  {}", e);
                }
            },
        }
    }

    info!("Console closed");
    Ok(())
}

async fn show<S: ScoreSource>(dashboard: &mut Dashboard<S>, config: &Config) {
    match render(dashboard, config).await {
        Ok(output) => {
            println!("{}", output);
            debug!("{} round(s) cached", dashboard.cached_rounds());
        }
        Err(e) => {
            warn!("Render failed: {:#}", e);
            eprintln!("⚠️  {:#}", e);
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

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
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
