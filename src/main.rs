// Spend Arena - Gateway and terminal watcher entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spend_arena::watch::{render_board, watch_session, WatchOptions};
use spend_arena::{AppState, ConfigService};

#[derive(Parser)]
#[command(name = "spend-arena")]
#[command(about = "Spend Arena - three agents compete to cut procurement spend", long_about = None)]
struct Cli {
    /// JSON configuration file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway (default)
    Serve,
    /// Follow a session's analysis from a running gateway
    Watch {
        /// Session to analyse
        #[arg(required_unless_present = "demo")]
        session_id: Option<String>,
        /// Create a demo session and analyse it
        #[arg(long, conflicts_with = "session_id")]
        demo: bool,
        /// Gateway origin
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        base_url: String,
    },
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn run_server(config_path: Option<PathBuf>) -> Result<()> {
    let config = ConfigService::load(config_path.as_deref())
        .context("failed to load configuration")?
        .into_config();
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let state = AppState::from_config(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    spend_arena::serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

async fn run_watch(options: WatchOptions) -> Result<()> {
    let board = watch_session(&options, |session_id, board| {
        println!("{}\n", render_board(session_id, board));
    })
    .await?;

    if !board.all_complete() {
        anyhow::bail!("analysis did not complete");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(cli.config).await,
        Commands::Watch {
            session_id,
            demo: _,
            base_url,
        } => {
            run_watch(WatchOptions {
                base_url,
                session_id,
            })
            .await
        }
    }
}
