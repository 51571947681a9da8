//! Unbuffered, closable channel between one producer and one consumer.
//!
//! tokio's `mpsc` always buffers at least one value, so each send carries a
//! `oneshot` acknowledgement that the receiver fires when it takes the value.
//! `Sender::send` resolves only after that, which gives rendezvous semantics.

use futures::stream::{self, Stream, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, Instrument};

use crate::error::Result;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel has already been closed")]
    Closed,

    #[error("receiving end went away before the value was taken")]
    Disconnected,
}

struct Handoff<T> {
    value: T,
    taken: oneshot::Sender<()>,
}

/// Write end. Owns the close authority.
pub struct Sender<T> {
    tx: Option<mpsc::Sender<Handoff<T>>>,
}

/// Read end.
pub struct Receiver<T> {
    rx: mpsc::Receiver<Handoff<T>>,
}

/// Creates a connected sender/receiver pair with no effective buffering.
pub fn rendezvous<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (Sender { tx: Some(tx) }, Receiver { rx })
}

impl<T> Sender<T> {
    /// Hands `value` to the receiver, waiting until it has been taken.
    pub async fn send(&mut self, value: T) -> std::result::Result<(), ChannelError> {
        let tx = self.tx.as_ref().ok_or(ChannelError::Closed)?;
        let (taken, accepted) = oneshot::channel();

        tx.send(Handoff { value, taken })
            .await
            .map_err(|_| ChannelError::Disconnected)?;

        // the ack sender is dropped unfired if the receiver goes away with the
        // value still queued
        accepted.await.map_err(|_| ChannelError::Disconnected)
    }

    /// Closes the channel. Closing twice is a usage error.
    pub fn close(&mut self) -> std::result::Result<(), ChannelError> {
        match self.tx.take() {
            Some(tx) => {
                drop(tx);
                Ok(())
            }
            None => Err(ChannelError::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

impl<T> Receiver<T> {
    /// Waits for the next value. Returns `None` once the sender has closed
    /// and everything sent has been taken; later calls keep returning `None`.
    pub async fn recv(&mut self) -> Option<T> {
        let Handoff { value, taken } = self.rx.recv().await?;
        // a sender that stopped waiting has nothing left to learn
        let _ = taken.send(());
        Some(value)
    }

    /// Lazy, finite stream over the remaining values.
    pub fn into_stream(self) -> impl Stream<Item = T> {
        stream::unfold(self, |mut rx| async move {
            let value = rx.recv().await?;
            Some((value, rx))
        })
        .fuse()
    }
}

/// Sends `0..n` in order, then closes the channel.
pub async fn produce(mut tx: Sender<u64>, n: u64) -> Result<()> {
    for i in 0..n {
        info!("sending: {i}");
        tx.send(i).await?;
    }
    tx.close()?;
    debug!(sent = n, "producer closed the channel");
    Ok(())
}

/// Stream of every value the producer sends, ending when it closes.
pub fn consume(rx: Receiver<u64>) -> impl Stream<Item = u64> {
    rx.into_stream().inspect(|value| info!("received: {value}"))
}

/// Runs one producer and one consumer as separate tasks over a fresh
/// rendezvous channel and returns what the consumer saw, in arrival order.
pub async fn run_pipeline(n: u64) -> Result<Vec<u64>> {
    let (tx, rx) = rendezvous();

    let producer = tokio::spawn(produce(tx, n).in_current_span());
    let consumer = tokio::spawn(
        async move {
            let received: Vec<u64> = consume(rx).collect().await;
            debug!(received = received.len(), "consumer reached end of stream");
            received
        }
        .in_current_span(),
    );

    producer.await??;
    Ok(consumer.await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DemoError;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_send_after_close_is_rejected() {
        let (mut tx, _rx) = rendezvous::<u64>();
        tx.close().unwrap();

        assert!(tx.is_closed());
        assert_eq!(tx.send(1).await, Err(ChannelError::Closed));
        assert_eq!(tx.close(), Err(ChannelError::Closed));
    }

    #[tokio::test]
    async fn test_recv_after_drain_keeps_returning_none() {
        let (mut tx, mut rx) = rendezvous::<u64>();
        tx.close().unwrap();

        assert_eq!(rx.recv().await, None);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_waits_for_receiver() {
        let (mut tx, mut rx) = rendezvous::<u64>();

        let sender = tokio::spawn(async move {
            tx.send(7).await.unwrap();
            tx
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!sender.is_finished(), "send completed with nobody receiving");

        assert_eq!(rx.recv().await, Some(7));
        let mut tx = sender.await.unwrap();
        tx.close().unwrap();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_to_dropped_receiver_is_disconnected() {
        let (mut tx, rx) = rendezvous::<u64>();
        drop(rx);

        assert_eq!(tx.send(1).await, Err(ChannelError::Disconnected));
    }

    #[tokio::test]
    async fn test_produce_on_dropped_receiver_surfaces_error() {
        let (tx, rx) = rendezvous::<u64>();
        drop(rx);

        let err = produce(tx, 3).await.unwrap_err();
        assert!(matches!(err, DemoError::Channel(ChannelError::Disconnected)));
    }

    #[tokio::test]
    async fn test_stream_ends_exactly_once() {
        let (tx, rx) = rendezvous::<u64>();
        tokio::spawn(produce(tx, 3));

        let mut values = std::pin::pin!(rx.into_stream());
        let mut seen = Vec::new();
        while let Some(value) = values.next().await {
            seen.push(value);
        }

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(values.next().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pipeline_preserves_order() {
        for n in [0, 1, 2, 17, 100] {
            let received = run_pipeline(n).await.unwrap();
            assert_eq!(received, (0..n).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_pipeline_logs_each_handoff() {
        let received = run_pipeline(5).await.unwrap();

        assert_eq!(received, vec![0, 1, 2, 3, 4]);
        for i in 0..5 {
            assert!(logs_contain(&format!("sending: {i}")));
            assert!(logs_contain(&format!("received: {i}")));
        }
        assert!(!logs_contain("sending: 5"));
        assert!(!logs_contain("received: 5"));
    }
}
