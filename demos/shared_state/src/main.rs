// Example: Mutex-guarded counter with a polling observer
// Three workers increment a shared counter ten times each while an observer
// polls until it reads 30

use tokio_patterns::{logging, run_guarded_counter, DemoConfig};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Level::INFO)?;

    let config = DemoConfig::default();
    let report = run_guarded_counter(&config.counter).await?;

    println!("Counter: {}", report.final_value);
    // Output: Counter: 30
    Ok(())
}
