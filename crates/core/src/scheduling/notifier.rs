//! Typed lifecycle event notifier
//!
//! Fan-out channel for [`SchedulerEvent`] values. Subscribers receive every
//! event emitted after they subscribe; emission is lossy when nobody
//! listens. `close` drops the sender so all receivers observe a closed
//! channel, which is how scoped teardown detaches subscribers.

use cadenza_domain::constants::EVENT_CHANNEL_CAPACITY;
use cadenza_domain::SchedulerEvent;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast notifier for scheduler lifecycle events
pub struct EventNotifier {
    sender: RwLock<Option<broadcast::Sender<SchedulerEvent>>>,
}

impl EventNotifier {
    /// Create a notifier with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create a notifier with a custom channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender: RwLock::new(Some(sender)) }
    }

    /// Subscribe to all events emitted from this point on
    ///
    /// Returns `None` once the notifier has been closed.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<SchedulerEvent>> {
        self.sender.read().as_ref().map(broadcast::Sender::subscribe)
    }

    /// Publish an event to all current subscribers
    ///
    /// Events emitted with no subscribers, or after `close`, are dropped.
    pub fn emit(&self, event: SchedulerEvent) {
        if let Some(sender) = self.sender.read().as_ref() {
            if sender.send(event).is_err() {
                trace!("Scheduler event dropped: no subscribers");
            }
        }
    }

    /// Drop the sender so every receiver observes a closed channel
    pub fn close(&self) {
        self.sender.write().take();
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl Default for EventNotifier {
    fn default() -> Self {
        Self::new()
    }
}
