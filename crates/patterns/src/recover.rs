//! Failures handled at the call site instead of ending the process: an
//! ordinary error return, and a panic caught where its task is joined.

use std::any::Any;
use std::future::Future;

use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::error::{DemoError, Result};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("recovered from panic: {message}")]
pub struct Recovered {
    pub message: String,
}

/// Fails on request.
pub fn checked_value(fail: bool) -> Result<i32> {
    if fail {
        Err(DemoError::Requested)
    } else {
        Ok(1)
    }
}

/// Runs `future` on its own task. If it panics, the panic stops at the join
/// point and comes back as [`Recovered`].
pub async fn catch_panic<F>(future: F) -> std::result::Result<F::Output, Recovered>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(future.in_current_span()).await {
        Ok(output) => Ok(output),
        Err(err) if err.is_panic() => {
            let message = panic_message(err.into_panic().as_ref());
            warn!("recovered: {message}");
            Err(Recovered { message })
        }
        Err(err) => Err(Recovered {
            message: err.to_string(),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn panics() -> u64 {
    info!("before panic");
    panic!("panic!")
}

/// Triggers each failure kind in turn and carries on after each one.
/// Returns what the panic was recovered as, or `None` if nothing panicked.
pub async fn run_recover_demo() -> Result<Option<Recovered>> {
    match checked_value(true) {
        Ok(value) => info!(value, "fallible call succeeded"),
        Err(err) => warn!("handled: {err}"),
    }
    let value = checked_value(false)?;
    info!(value, "fallible call succeeded");

    let recovered = catch_panic(async { panics() }).await.err();
    info!("continuing after recovery");
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_checked_value() {
        assert!(matches!(checked_value(true), Err(DemoError::Requested)));
        assert_eq!(checked_value(false).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_catch_panic_passes_output_through() {
        assert_eq!(catch_panic(async { 41 + 1 }).await, Ok(42));
    }

    #[tokio::test]
    async fn test_catch_panic_recovers_formatted_message() {
        let recovered = catch_panic(async {
            let worker = 3;
            if worker > 0 {
                panic!("worker {worker} gave up");
            }
        })
        .await
        .unwrap_err();

        assert_eq!(recovered.message, "worker 3 gave up");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_demo_continues_after_each_failure() {
        let recovered = run_recover_demo().await.unwrap();

        assert_eq!(
            recovered,
            Some(Recovered {
                message: "panic!".to_string()
            })
        );
        assert!(logs_contain("handled: this function returns an error"));
        assert!(logs_contain("before panic"));
        assert!(logs_contain("recovered: panic!"));
        assert!(logs_contain("continuing after recovery"));
    }
}
