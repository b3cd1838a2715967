//! In-process staleness signal backed by a `tokio::sync::broadcast`
//! channel.
//!
//! [`SignalBus`] lets independent consumers of the same cache react to
//! invalidation (e.g. a list view refetching after a detail-view edit)
//! without referencing each other.

use tokio::sync::broadcast;

/// Notification that a shared cached view may be stale.
///
/// Deliberately payload-free: receivers reconsider refetching, nothing
/// more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSignal {
    /// The leads result cache was cleared.
    LeadsCacheInvalidated,
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out hub for [`StoreSignal`]s.
pub struct SignalBus {
    sender: broadcast::Sender<StoreSignal>,
}

impl SignalBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed signals are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a signal to all current subscribers.
    ///
    /// With zero subscribers the signal is silently dropped.
    pub fn publish(&self, signal: StoreSignal) {
        // Ignore the SendError -- it only means there are no receivers.
        let _ = self.sender.send(signal);
    }

    /// Subscribe to all signals published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreSignal> {
        self.sender.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = SignalBus::default();
        let mut rx = bus.subscribe();

        bus.publish(StoreSignal::LeadsCacheInvalidated);

        let received = rx.recv().await.expect("should receive the signal");
        assert_eq!(received, StoreSignal::LeadsCacheInvalidated);
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_signal() {
        let bus = SignalBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StoreSignal::LeadsCacheInvalidated);

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = SignalBus::default();
        bus.publish(StoreSignal::LeadsCacheInvalidated);
    }
}
