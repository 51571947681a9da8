//! Two tasks printing on the same cadence, one spawned and one inline, so
//! their output interleaves.

use std::time::Duration;

use tracing::{info, Instrument};

use crate::config::InterleaveSettings;
use crate::error::Result;

/// Sleeps `delay` then logs `label`, `repeats` times. Returns how many lines
/// it emitted.
pub async fn say(label: &str, repeats: usize, delay: Duration) -> usize {
    for _ in 0..repeats {
        tokio::time::sleep(delay).await;
        info!("{label}");
    }
    repeats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interleaving {
    pub inline: usize,
    pub spawned: usize,
}

/// Runs `say("async")` on its own task alongside `say("sync")` on the
/// caller, then joins the spawned one so none of its lines are lost.
pub async fn run_interleaved(settings: &InterleaveSettings) -> Result<Interleaving> {
    let repeats = settings.repeats;
    let delay = settings.delay();

    let background = tokio::spawn(async move { say("async", repeats, delay).await }.in_current_span());
    let inline = say("sync", repeats, delay).await;
    let spawned = background.await?;

    Ok(Interleaving { inline, spawned })
}
