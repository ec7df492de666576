//! RagLens CLI — terminal client for explainable RAG backends.
//!
//! Provides one-shot subcommands and an interactive panel-driven session.

mod commands;
mod panels;
mod repl;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use raglens_core::client::{BackendClient, ExportKind};
use raglens_core::config::RagLensConfig;

use crate::panels::Style;

/// RagLens: inspect RAG answers next to their evidence
#[derive(Parser, Debug)]
#[command(name = "raglens", version, about, long_about = None)]
struct Cli {
    /// Query to submit (starts interactive mode if omitted)
    query: Option<String>,

    /// Backend base URL (overrides configuration)
    #[arg(short, long)]
    backend: Option<String>,

    /// Index/session id for one-shot queries
    #[arg(short, long)]
    index: Option<String>,

    /// Workspace directory (for `.raglens/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Upload documents and wait for indexing to finish
    Upload {
        /// Files to upload
        files: Vec<PathBuf>,
    },
    /// Check backend health
    Status,
    /// Download a server-side export artifact
    Export {
        /// Artifact kind: chunks, entities, graph, or trace
        kind: String,
        /// Session/index id
        session: String,
    },
    /// Clear a backend session
    Clear {
        /// Session/index id
        session: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default workspace configuration file
    Init,
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "raglens", "raglens")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "raglens.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Load configuration and apply CLI overrides
    let mut config = raglens_core::config::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(backend) = &cli.backend {
        config.backend.base_url = backend.clone();
    }
    if cli.no_color {
        config.ui.color = false;
    }

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &config, &workspace).await;
    }

    // One-shot query or interactive session
    if let Some(query) = cli.query {
        let client = BackendClient::new(&config.backend)?;
        let style = Style::new(config.ui.color);
        commands::query(&client, &config, &query, cli.index, style).await?;
        Ok(())
    } else {
        repl::run_interactive(config).await
    }
}

async fn handle_command(
    command: Commands,
    config: &RagLensConfig,
    workspace: &std::path::Path,
) -> anyhow::Result<()> {
    match command {
        Commands::Upload { files } => {
            if files.is_empty() {
                anyhow::bail!("nothing to upload");
            }
            let client = BackendClient::new(&config.backend)?;
            commands::upload(&client, &files).await?;
            Ok(())
        }
        Commands::Status => {
            let client = BackendClient::new(&config.backend)?;
            commands::status(&client).await
        }
        Commands::Export { kind, session } => {
            let kind: ExportKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let client = BackendClient::new(&config.backend)?;
            let out_dir = std::env::current_dir()?;
            commands::export(&client, kind, &session, &out_dir).await?;
            Ok(())
        }
        Commands::Clear { session } => {
            let client = BackendClient::new(&config.backend)?;
            commands::clear(&client, &session).await
        }
        Commands::Config { action } => handle_config(action, config, workspace),
    }
}

fn handle_config(
    action: ConfigAction,
    config: &RagLensConfig,
    workspace: &std::path::Path,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".raglens");
            std::fs::create_dir_all(&config_dir)?;
            let path = config_dir.join("config.toml");
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            let rendered = toml::to_string_pretty(&RagLensConfig::default())?;
            std::fs::write(&path, rendered)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}
