//! Run parameters for the demos. Every field has a default matching the
//! reference run, so an empty or missing file behaves like no config at all.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DemoConfig {
    pub pipeline: PipelineSettings,
    pub counter: CounterSettings,
    pub interleave: InterleaveSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Values sent through the channel, `0..items`.
    pub items: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { items: 5 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CounterSettings {
    pub workers: usize,
    pub increments_per_worker: usize,
    pub poll_interval_ms: u64,
}

impl CounterSettings {
    /// Value the counter must reach once every worker is done.
    pub fn target(&self) -> u64 {
        (self.workers * self.increments_per_worker) as u64
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            workers: 3,
            increments_per_worker: 10,
            poll_interval_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterleaveSettings {
    pub repeats: usize,
    pub delay_ms: u64,
}

impl InterleaveSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for InterleaveSettings {
    fn default() -> Self {
        Self {
            repeats: 5,
            delay_ms: 100,
        }
    }
}

pub fn from_str(content: &str) -> Result<DemoConfig> {
    Ok(toml::from_str(content)?)
}

pub fn from_path<V: Into<PathBuf>>(target: V) -> Result<DemoConfig> {
    let config_content = std::fs::read_to_string(target.into())?;
    from_str(&config_content)
}
