//! Concurrency patterns on tokio: an unbuffered channel pipeline with explicit
//! close, and a mutex-guarded counter watched by a polling observer.
//!
//! The demos under `demos/` are thin binaries over the functions exported here.

pub mod channel;
pub mod config;
pub mod counter;
pub mod error;
pub mod interleave;
pub mod logging;
pub mod recover;

pub use channel::{consume, produce, rendezvous, run_pipeline, ChannelError, Receiver, Sender};
pub use config::DemoConfig;
pub use counter::{run_guarded_counter, wait_for, CounterReport, SafeCounter};
pub use error::{DemoError, Result};
