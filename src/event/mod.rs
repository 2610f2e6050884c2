//! Trigger event handling
//!
//! - Event definition and types
//! - Classification of raw trigger events
//! - Single-slot bridge between producer and consumer
//! - Push notification path

pub mod bridge;
pub mod classifier;
pub mod notifier;

mod event_types;

pub use bridge::{BridgeState, EventBridge, DEFAULT_NOTIFY_METHOD};
pub use classifier::{EventClassifier, EventClassifierBuilder, ParsePatternError, UriPattern};
pub use event_types::{
    is_fresh_launch, EventNotification, IntentAction, LifecycleEpoch, PendingEvent, RawEvent,
    FLAG_ACTIVITY_LAUNCHED_FROM_HISTORY, PLATFORM_ACTION_SEND, PLATFORM_ACTION_VIEW,
};
pub use notifier::{BroadcastNotifier, EventNotifier, NoopNotifier, DEFAULT_NOTIFY_CAPACITY};
