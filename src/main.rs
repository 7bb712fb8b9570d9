//! Command-line front end for the rug-vibes risk oracle.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rug_vibes::oracle::format::{render_recent, render_report};
use rug_vibes::oracle::{KeyValueStore, MemoryStore, RiskConfig, RiskOracleBuilder, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rug-vibes")]
#[command(about = "Quick risk verdicts for Solana token pairs", long_about = None)]
struct Cli {
    /// SQLite file backing the cache and recent scans
    #[arg(long, default_value = "rug_vibes.db")]
    db: String,

    /// Keep everything in memory instead of on disk
    #[arg(long)]
    memory: bool,

    /// JSON config file; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the market-data API base URL
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one or more token mints
    Scan {
        #[arg(required = true)]
        mints: Vec<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent scans
    Recent,
    /// Forget recent scans
    ClearRecent,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RiskConfig::default(),
    };
    if let Some(url) = &cli.api_base {
        config.api_base_url = url.clone();
    }

    let store: Arc<dyn KeyValueStore> = if cli.memory {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::new(&cli.db).await?)
    };

    let oracle = RiskOracleBuilder::from_config(config).build_with_dexscreener(store)?;

    match cli.command {
        Commands::Scan { mints, json } => {
            let mut failures = 0;
            for mint in &mints {
                match oracle.scan(mint).await {
                    Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
                    Ok(report) => println!("{}", render_report(&report, oracle.scorer().thresholds())),
                    Err(e) => {
                        warn!("Scan of {:?} failed: {}", mint, e);
                        eprintln!("{}: {}", mint.trim(), e.user_message());
                        failures += 1;
                    }
                }
            }

            let metrics = oracle.get_metrics().await;
            if let Some(rate) = metrics.cache_hit_rate() {
                info!("Cache hit rate {:.0}%", rate * 100.0);
            }

            if failures > 0 {
                bail!("{} of {} scans failed", failures, mints.len());
            }
        }
        Commands::Recent => {
            let recent = oracle.recent_scans().await;
            print!("{}", render_recent(&recent, chrono::Utc::now().timestamp_millis()));
        }
        Commands::ClearRecent => {
            oracle.clear_recent().await?;
            info!("Recent scans cleared");
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<RiskConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}
