//! # Live Subscriptions
//!
//! A [`Subscription`] is the receiving half of a live feed over one
//! collection. The actor delivers the full matching result set once at
//! subscribe time and again after every successful mutation; each delivery
//! replaces the previous one wholesale.

use tokio::sync::mpsc;

/// Receiving handle for a filtered live feed.
///
/// Dropping the subscription (or calling [`stop`](Subscription::stop)) tears
/// the feed down; the actor prunes the disconnected subscriber on its next
/// broadcast. Deliveries are unbounded so the actor never blocks on a slow
/// consumer.
#[derive(Debug)]
pub struct Subscription<D> {
    receiver: mpsc::UnboundedReceiver<Vec<D>>,
}

impl<D> Subscription<D> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<Vec<D>>) -> Self {
        Self { receiver }
    }

    /// Waits for the next snapshot. Returns `None` once the collection actor
    /// has shut down and all pending deliveries were consumed.
    pub async fn next(&mut self) -> Option<Vec<D>> {
        self.receiver.recv().await
    }

    /// Returns an already-delivered snapshot without waiting, if any.
    pub fn try_next(&mut self) -> Option<Vec<D>> {
        self.receiver.try_recv().ok()
    }

    /// Explicit teardown; equivalent to dropping the subscription.
    pub fn stop(self) {}
}
