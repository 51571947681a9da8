// Example: Spawned task running alongside the caller
// "async" lines come from a spawned task, "sync" lines from main; the two
// interleave because both sleep on the same cadence

use tokio_patterns::interleave::run_interleaved;
use tokio_patterns::{logging, DemoConfig};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Level::INFO)?;

    let config = DemoConfig::default();
    let outcome = run_interleaved(&config.interleave).await?;

    println!("All tasks completed ({} sync, {} async)", outcome.inline, outcome.spawned);
    Ok(())
}
