//! Shared counter behind a mutex, incremented by several workers and watched
//! by an observer that polls until the expected total shows up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, Instrument};

use crate::config::CounterSettings;
use crate::error::Result;

/// An integer only reachable through its lock.
#[derive(Debug, Default)]
pub struct SafeCounter {
    value: Mutex<u64>,
}

impl SafeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one and returns the value this call produced.
    pub async fn increment(&self) -> u64 {
        let mut value = self.value.lock().await;
        *value += 1;
        // guard drops on return, including when the caller is cancelled
        *value
    }

    pub async fn value(&self) -> u64 {
        *self.value.lock().await
    }
}

/// Polls `counter` every `poll_interval` until it reads at least `target`,
/// returning the first qualifying value. It may overshoot `target` if
/// increments land between polls.
pub async fn wait_for(counter: &SafeCounter, target: u64, poll_interval: Duration) -> u64 {
    loop {
        let current = counter.value().await;
        if current >= target {
            info!(current, target, "observer reached target");
            return current;
        }
        debug!(current, target, "observer waiting");
        tokio::time::sleep(poll_interval).await;
    }
}

/// Outcome of one guarded-counter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterReport {
    /// Value read after every worker finished.
    pub final_value: u64,
    /// Value the polling observer returned with.
    pub observed: u64,
    /// Every value handed back by `increment()`, in the order workers finished.
    pub increments: Vec<u64>,
}

/// Spawns the workers and the observer over one shared counter and waits
/// for all of them.
pub async fn run_guarded_counter(settings: &CounterSettings) -> Result<CounterReport> {
    let counter = Arc::new(SafeCounter::new());
    let target = settings.target();
    let mut handles = vec![];

    for worker in 0..settings.workers {
        let counter = Arc::clone(&counter);
        let increments = settings.increments_per_worker;

        let handle = tokio::spawn(
            async move {
                let mut produced = Vec::with_capacity(increments);
                for _ in 0..increments {
                    let value = counter.increment().await;
                    info!(worker, "increment: {value}");
                    produced.push(value);
                }
                produced
            }
            .in_current_span(),
        );
        handles.push(handle);
    }

    let observer = {
        let counter = Arc::clone(&counter);
        let poll_interval = settings.poll_interval();
        tokio::spawn(async move { wait_for(&counter, target, poll_interval).await }.in_current_span())
    };

    let mut increments = Vec::with_capacity(target as usize);
    for handle in handles {
        increments.extend(handle.await?);
    }
    let observed = observer.await?;
    let final_value = counter.value().await;

    info!(final_value, observed, "counter settled");
    Ok(CounterReport {
        final_value,
        observed,
        increments,
    })
}
