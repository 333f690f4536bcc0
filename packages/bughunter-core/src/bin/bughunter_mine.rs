//! BugHunter miner CLI
//!
//! Mines the repair actions (and optionally the donor pools) of one diff
//! produced by the external tree differ, and prints a JSON summary.
//!
//! # Usage
//!
//! ```bash
//! bughunter-mine --diff fix.diff.json --config miner.yaml --pools
//! RUST_LOG=bughunter_core=debug bughunter-mine --diff fix.diff.json --cache-root /tmp/cache
//! ```

use bughunter_core::config::MinerConfig;
use bughunter_core::usecases::FixAnalysisService;
use bughunter_core::Diff;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bughunter-mine")]
#[command(about = "Mine repair actions and donor pools from a before/after AST diff", long_about = None)]
struct Cli {
    /// Diff document (JSON) emitted by the tree differ
    #[arg(short, long)]
    diff: PathBuf,

    /// Miner configuration (YAML, schema v1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cache root; overrides the configuration file
    #[arg(long)]
    cache_root: Option<PathBuf>,

    /// Also build the abstract and concrete donor pools
    #[arg(long)]
    pools: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => MinerConfig::from_yaml(path)?,
        None => MinerConfig::default(),
    };
    if let Some(root) = cli.cache_root {
        config = config.with_cache_root(root);
    }

    let service = FixAnalysisService::new(config)?;
    let diff = Diff::from_json_file(&cli.diff)?;
    let analysis = service.analyze(&diff, cli.pools)?;

    println!("{}", serde_json::to_string_pretty(&analysis.report())?);
    Ok(())
}
