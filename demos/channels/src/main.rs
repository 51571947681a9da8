// Example: Unbuffered channel between a producer and a consumer task
// The producer sends 0..5 and closes; the consumer drains until the close

use tokio_patterns::{logging, run_pipeline, DemoConfig};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Level::INFO)?;

    let config = DemoConfig::default();
    let received = run_pipeline(config.pipeline.items).await?;

    println!("Received {} values: {:?}", received.len(), received);
    Ok(())
}
