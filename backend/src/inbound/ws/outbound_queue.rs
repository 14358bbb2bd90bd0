//! Bounded per-session outbound queue.
//!
//! Producers never wait: when the queue is full the message is dropped,
//! logged and counted. The session loop drains the receiver and performs
//! the actual socket writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::warn;

use crate::inbound::ws::messages::Outbound;

/// Default number of messages buffered per session.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Producer side of a session's outbound queue.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    sender: Sender<Outbound>,
    dropped: Arc<AtomicU64>,
}

impl OutboundQueue {
    /// Create a queue holding at most `capacity` messages (minimum one).
    ///
    /// Dropped messages are added to `dropped`, which may be shared between
    /// sessions.
    #[must_use]
    pub fn bounded(capacity: usize, dropped: Arc<AtomicU64>) -> (Self, Receiver<Outbound>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, dropped }, receiver)
    }

    /// Enqueue without waiting; a full or closed queue drops the message
    /// and bumps the shared counter.
    pub fn push(&self, message: impl Into<Outbound>) {
        match self.sender.try_send(message.into()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed).saturating_add(1);
                warn!(dropped_total = total, "outbound queue full; message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Messages dropped so far through the shared counter.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
