//! Single-slot admission and consumption state machine
//!
//! The bridge owns exactly one pending payload. Producers admit into it,
//! consumers peek with [`EventBridge::try_take`] and clear it with
//! [`EventBridge::acknowledge`]. Every operation is a short critical section
//! over one mutex, so all callers observe a single total order.

use crate::event::{
    EventClassifier, EventNotification, EventNotifier, LifecycleEpoch, NoopNotifier,
    PendingEvent, RawEvent,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Default push method name, matching the consumer's channel contract
pub const DEFAULT_NOTIFY_METHOD: &str = "onLocationReceived";

/// Externally visible slot state (payload omitted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    Empty,
    Pending,
    Consumed,
}

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Empty,
    Pending(PendingEvent),
    Consumed,
}

#[derive(Debug, Default)]
struct BridgeInner {
    slot: SlotState,
    epoch: LifecycleEpoch,
    /// Last sequence handed out; never reset
    last_sequence: u64,
    cold_starts: u32,
}

/// Bridge between trigger producers and the application consumer
pub struct EventBridge {
    classifier: EventClassifier,
    notifier: Arc<dyn EventNotifier>,
    notify_method: String,
    inner: Mutex<BridgeInner>,
}

impl EventBridge {
    /// Create a bridge pushing through the given notifier
    pub fn new(classifier: EventClassifier, notifier: Arc<dyn EventNotifier>) -> Self {
        Self {
            classifier,
            notifier,
            notify_method: DEFAULT_NOTIFY_METHOD.to_string(),
            inner: Mutex::new(BridgeInner::default()),
        }
    }

    /// Create a bridge with no push consumer (pull only)
    pub fn pull_only(classifier: EventClassifier) -> Self {
        Self::new(classifier, Arc::new(NoopNotifier))
    }

    /// Set the push method name
    pub fn with_notify_method(mut self, method: impl Into<String>) -> Self {
        self.notify_method = method.into();
        self
    }

    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    pub fn notify_method(&self) -> &str {
        &self.notify_method
    }

    /// Every critical section leaves the slot valid before it can panic,
    /// so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, BridgeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Discard anything left over from a previous lifecycle.
    ///
    /// Must run once per process launch, never on resume. Returns the new epoch.
    pub fn reset_on_fresh_start(&self) -> LifecycleEpoch {
        let mut inner = self.lock();
        inner.cold_starts = inner.cold_starts.saturating_add(1);
        if inner.cold_starts > 1 {
            warn!(
                cold_starts = inner.cold_starts,
                "Cold start reported more than once in this process"
            );
        }

        let discarded = matches!(inner.slot, SlotState::Pending(_));
        inner.slot = SlotState::Empty;
        inner.epoch = inner.epoch.next();

        info!(epoch = %inner.epoch, discarded, "Bridge reset on cold start");
        inner.epoch
    }

    /// Lifecycle hook for the hosting shell
    pub fn on_cold_start(&self) -> LifecycleEpoch {
        self.reset_on_fresh_start()
    }

    /// Store a payload, superseding any unconsumed one, and push a notification
    pub fn admit(&self, payload: impl Into<String>) -> PendingEvent {
        let payload = payload.into();

        let event = {
            let mut inner = self.lock();
            let sequence = inner.last_sequence.saturating_add(1);
            let event = PendingEvent::new(payload, sequence, inner.epoch);

            let previous = std::mem::replace(&mut inner.slot, SlotState::Pending(event.clone()));
            inner.last_sequence = sequence;

            if let SlotState::Pending(superseded) = previous {
                info!(
                    superseded_sequence = superseded.sequence,
                    sequence, "Unconsumed payload superseded"
                );
            }
            event
        };

        info!(
            event_id = %event.id,
            sequence = event.sequence,
            epoch = %event.epoch,
            payload_len = event.payload.len(),
            "Payload admitted"
        );

        // Published outside the lock so a notifier may call back into the bridge
        self.notifier
            .notify(EventNotification::from_pending(&self.notify_method, &event));

        event
    }

    /// Producer entry point: classify, then admit if actionable
    pub fn notify_raw_event(&self, raw: &RawEvent) -> Option<PendingEvent> {
        match self.classifier.classify(raw) {
            Some(payload) => Some(self.admit(payload)),
            None => {
                debug!(action = ?raw.action, fresh = raw.fresh, "Raw event not actionable");
                None
            }
        }
    }

    /// Peek at the pending payload without clearing it
    pub fn try_take(&self) -> Option<String> {
        match &self.lock().slot {
            SlotState::Pending(event) => {
                debug!(sequence = event.sequence, "Returning pending payload");
                Some(event.payload.clone())
            }
            SlotState::Empty | SlotState::Consumed => {
                debug!("No pending payload to return");
                None
            }
        }
    }

    /// Consumer pull
    pub fn request_pending(&self) -> Option<String> {
        self.try_take()
    }

    /// Clear the pending payload.
    ///
    /// Idempotent. Returns true if a pending payload was cleared.
    pub fn acknowledge(&self) -> bool {
        let mut inner = self.lock();
        match std::mem::take(&mut inner.slot) {
            SlotState::Pending(event) => {
                inner.slot = SlotState::Consumed;
                info!(sequence = event.sequence, "Pending payload acknowledged");
                true
            }
            SlotState::Consumed => {
                inner.slot = SlotState::Consumed;
                debug!("Acknowledge on consumed slot, nothing to clear");
                false
            }
            SlotState::Empty => {
                debug!("Acknowledge on empty slot, nothing to clear");
                false
            }
        }
    }

    pub fn state(&self) -> BridgeState {
        match self.lock().slot {
            SlotState::Empty => BridgeState::Empty,
            SlotState::Pending(_) => BridgeState::Pending,
            SlotState::Consumed => BridgeState::Consumed,
        }
    }

    pub fn epoch(&self) -> LifecycleEpoch {
        self.lock().epoch
    }

    /// Pending payload with its admission metadata
    pub fn pending(&self) -> Option<PendingEvent> {
        match &self.lock().slot {
            SlotState::Pending(event) => Some(event.clone()),
            SlotState::Empty | SlotState::Consumed => None,
        }
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("classifier", &self.classifier)
            .field("notify_method", &self.notify_method)
            .field("state", &self.state())
            .finish()
    }
}
