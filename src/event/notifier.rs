//! Push path toward the consumer
//!
//! Notifications are fire-and-forget hints. Delivery is never awaited and a
//! dropped notification loses nothing: the bridge slot stays authoritative.

use crate::event::EventNotification;
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of notifications buffered per receiver
pub const DEFAULT_NOTIFY_CAPACITY: usize = 16;

/// Push notification sink
pub trait EventNotifier: Send + Sync {
    /// Publish a notification without blocking
    fn notify(&self, notification: EventNotification);
}

/// Notifier that drops everything (no consumer attached)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl EventNotifier for NoopNotifier {
    fn notify(&self, notification: EventNotification) {
        debug!(
            sequence = notification.sequence,
            "No consumer attached, dropping notification"
        );
    }
}

/// Broadcast-based notifier; every subscriber gets every notification
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<EventNotification>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTIFY_CAPACITY)
    }

    /// Capacity must be greater than zero
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Attach a consumer
    pub fn subscribe(&self) -> broadcast::Receiver<EventNotification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNotifier for BroadcastNotifier {
    fn notify(&self, notification: EventNotification) {
        let sequence = notification.sequence;
        match self.sender.send(notification) {
            Ok(receivers) => debug!(sequence, receivers, "Notification published"),
            Err(_) => debug!(sequence, "No active receivers, notification dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{LifecycleEpoch, PendingEvent};

    fn notification(payload: &str, sequence: u64) -> EventNotification {
        let pending = PendingEvent::new(payload.to_string(), sequence, LifecycleEpoch::default());
        EventNotification::from_pending("onLocationReceived", &pending)
    }

    #[tokio::test]
    async fn should_deliver_to_every_subscriber() {
        // Arrange
        let notifier = BroadcastNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        // Act
        notifier.notify(notification("Hello", 1));

        // Assert
        assert_eq!(first.recv().await.unwrap().payload, "Hello");
        assert_eq!(second.recv().await.unwrap().payload, "Hello");
        assert_eq!(notifier.receiver_count(), 2);
    }

    #[test]
    fn should_not_fail_without_subscribers() {
        // Arrange
        let notifier = BroadcastNotifier::with_capacity(0);

        // Act
        notifier.notify(notification("dropped", 1));

        // Assert
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[test]
    fn should_accept_notifications_on_noop() {
        // Arrange & Act & Assert
        NoopNotifier.notify(notification("ignored", 1));
    }
}
