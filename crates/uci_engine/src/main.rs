use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use minimax_engine::MinimaxEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uci_engine::{Driver, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fixed-depth minimax chess engine speaking UCI", long_about = None)]
struct Args {
    /// Search depth in plies, overrides the config file
    #[arg(short, long)]
    depth: Option<u8>,
    /// TOML file with engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log filter such as `debug` or `minimax_engine=debug` (default: RUST_LOG, then `warn`)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref())?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    let config = config.validate()?;
    info!(depth = config.depth, "engine starting");

    // UCI engines communicate via stdin/stdout.
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut driver = Driver::new(MinimaxEngine::new(), stdout.lock(), config);
    driver.run(stdin.lock()).context("protocol loop failed")?;

    info!("engine stopped");
    Ok(())
}

/// Logs go to stderr so they never mix with protocol output.
fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
