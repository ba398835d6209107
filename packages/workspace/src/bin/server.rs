use anyhow::Context;
use clap::Parser;
use pagekit_editor::{MemoryStore, ProjectStore};
use pagekit_workspace::{router, AppState, Config, FileStore, TemplateGenerator, TokenAuth};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pagekit server - landing page projects over HTTP
#[derive(Parser, Debug)]
#[command(name = "pagekit-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing pagekit.config.json (default: current dir)
    root_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// HTTP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Store projects as JSON files in this directory
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let root_dir = match args.root_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut config = Config::load(&root_dir)
        .with_context(|| format!("failed to load config from {}", root_dir.display()))?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.data_dir.is_some() {
        config.data_dir = args.data_dir;
    }

    let default_filter = config.log_level.as_deref().unwrap_or("info,pagekit=debug");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let store: Arc<dyn ProjectStore> = match config.data_dir(&root_dir) {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using file store");
            Arc::new(FileStore::open(dir).await?)
        }
        None => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };
    if config.tokens.is_empty() {
        tracing::warn!("no tokens configured; only published pages are reachable");
    }

    let state = AppState::new(
        store,
        Arc::new(TemplateGenerator::new()),
        TokenAuth::new(config.tokens.clone()),
    )
    .with_autosave_window(config.autosave_window());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "pagekit server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
