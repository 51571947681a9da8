// Example: Manual Tokio Runtime Creation
// Builds the runtime by hand and runs every demo on it in sequence: the
// channel pipeline, the guarded counter, then the interleaving and recovery
// demos

use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Runtime;
use tokio_patterns::interleave::run_interleaved;
use tokio_patterns::recover::run_recover_demo;
use tokio_patterns::{config, logging, run_guarded_counter, run_pipeline, DemoConfig};
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(about = "Runs the channel pipeline and guarded counter demos")]
struct Args {
    /// TOML file overriding the reference run parameters
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_level)?;

    let config = match &args.config {
        Some(path) => config::from_path(path)?,
        None => DemoConfig::default(),
    };

    // Create a new multi-threaded runtime
    let runtime = Runtime::new()?;

    runtime.block_on(async {
        let received = run_pipeline(config.pipeline.items).await?;
        info!(?received, "channel pipeline done");

        let report = run_guarded_counter(&config.counter).await?;
        info!(final_value = report.final_value, observed = report.observed, "guarded counter done");

        run_interleaved(&config.interleave).await?;

        if let Some(recovered) = run_recover_demo().await? {
            info!("{recovered}");
        }

        anyhow::Ok(())
    })?;

    println!("exit");
    Ok(())
}
