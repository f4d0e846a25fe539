//! clipkeep CLI — user-facing binary for the clipkeep clipboard history daemon.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use clipkeep_clipboard::system::SystemClipboard;
use clipkeep_daemon::{setup, Daemon, DaemonEvent};
use clipkeep_enrich::HttpFetcher;
use clipkeep_store::{AssetCache, HistoryFile, HistoryStore};

#[derive(Parser)]
#[command(
    name = "clipkeep",
    about = "Personal clipboard history with link previews",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the clipkeep daemon in the foreground.
    Run {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the persisted history, newest first.
    History {
        /// Show at most this many items.
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Delete the whole history and its cached assets.
    ///
    /// Operates directly on the files; the daemon is the single writer while
    /// it runs, so stop it first or its next capture will rewrite the
    /// snapshot over this clear.
    Clear {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => run(config.as_deref()).await,
        Commands::History { limit, config } => history(limit, config.as_deref()),
        Commands::Clear { config } => clear(config.as_deref()),
    }
}

async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = setup::load_config(config_path)?;
    let data_dir = setup::data_dir(&config);

    let clipboard = SystemClipboard::new()?;
    let fetcher = HttpFetcher::new(&config.enrichment.user_agent)?;

    let mut daemon = Daemon::new(config, Box::new(clipboard), Arc::new(fetcher), &data_dir);
    let shutdown = daemon.event_sender();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            let _ = shutdown.send(DaemonEvent::Shutdown).await;
        }
    });

    daemon.run().await?;
    Ok(())
}

fn history(limit: usize, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = setup::load_config(config_path)?;
    let data_dir = setup::data_dir(&config);

    let items = HistoryFile::new(setup::history_path(&data_dir)).load()?;
    for item in items.iter().take(limit) {
        let summary = match item.kind {
            clipkeep_types::ItemKind::Image => format!(
                "[image {}x{}]",
                item.width.unwrap_or(0),
                item.height.unwrap_or(0)
            ),
            _ => {
                let mut text = item.content.replace('\n', " ");
                if text.chars().count() > 72 {
                    text = text.chars().take(72).collect::<String>() + "…";
                }
                text
            }
        };
        let title = item
            .title
            .as_deref()
            .map(|t| format!("  ({t})"))
            .unwrap_or_default();
        println!(
            "{}  {:<5}  {summary}{title}",
            item.copied_at.format("%Y-%m-%d %H:%M:%S"),
            item.kind.to_string()
        );
    }
    Ok(())
}

fn clear(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = setup::load_config(config_path)?;
    let data_dir = setup::data_dir(&config);

    let mut store = HistoryStore::open(
        AssetCache::new(setup::assets_dir(&data_dir)),
        HistoryFile::new(setup::history_path(&data_dir)),
        config.history.max_items,
    );
    let count = store.len();
    store.clear();
    println!("Cleared {count} items");
    Ok(())
}
