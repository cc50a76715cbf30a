//! Per-user serialization of message processing.
//!
//! Order is decided when a [`TurnSlot`] is reserved, not when a task first runs: reservation is
//! synchronous, so a transport can reserve in arrival order and then hand the slot to a spawned
//! task. Each slot waits for the previous slot of the same user to be dropped.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

/// A reserved place in one user's queue. Dropping it lets the next slot of that user proceed.
pub struct TurnSlot {
    previous: Option<oneshot::Receiver<()>>,
    _done: oneshot::Sender<()>,
}

impl TurnSlot {
    /// Waits until every earlier slot of the same user has been dropped. Cancel-safe: an
    /// abandoned wait keeps the slot queued.
    pub async fn wait_turn(&mut self) {
        if let Some(previous) = self.previous.as_mut() {
            // Err means the previous slot was dropped, which is the signal.
            let _ = previous.await;
            self.previous = None;
        }
    }
}

/// Per-user FIFO of turn slots. Different users never wait on each other.
#[derive(Default)]
pub struct UserLocks {
    tails: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot to `user_id`'s queue without waiting.
    pub fn reserve(&self, user_id: &str) -> TurnSlot {
        let (done, next_tail) = oneshot::channel();
        let mut tails = self.tails.lock().unwrap_or_else(|e| e.into_inner());
        let previous = tails.insert(user_id.to_string(), next_tail);
        TurnSlot {
            previous,
            _done: done,
        }
    }
}
