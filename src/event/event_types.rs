//! Trigger event structures shared by the classifier, the bridge and the push path

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Platform action string for a "share" trigger
pub const PLATFORM_ACTION_SEND: &str = "android.intent.action.SEND";
/// Platform action string for an "open this link" trigger
pub const PLATFORM_ACTION_VIEW: &str = "android.intent.action.VIEW";
/// Launch flag set by the platform when a trigger is redelivered from history
pub const FLAG_ACTIVITY_LAUNCHED_FROM_HISTORY: u32 = 0x0010_0000;

/// Returns true if the launch flags describe a fresh, user-initiated trigger
pub fn is_fresh_launch(flags: u32) -> bool {
    flags & FLAG_ACTIVITY_LAUNCHED_FROM_HISTORY == 0
}

/// Action tag of an incoming trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentAction {
    /// Shared content (plain text body)
    SendText,
    /// Open a URI
    ViewUri,
    /// Anything else; never actionable
    #[default]
    #[serde(other)]
    Other,
}

impl IntentAction {
    /// Map a platform action string onto the closed action set
    pub fn from_platform_action(action: &str) -> Self {
        match action {
            PLATFORM_ACTION_SEND => IntentAction::SendText,
            PLATFORM_ACTION_VIEW => IntentAction::ViewUri,
            _ => IntentAction::Other,
        }
    }
}

/// Raw trigger event as delivered by the producer.
///
/// Every field is optional on the wire: a missing field deserializes to its
/// default, which the classifier treats as "not actionable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub action: IntentAction,
    pub mime_type: Option<String>,
    pub text: Option<String>,
    pub uri: Option<String>,
    /// True for a new user-initiated trigger, false for a redelivery
    pub fresh: bool,
}

impl RawEvent {
    /// Fresh shared-text event
    pub fn send_text(mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            action: IntentAction::SendText,
            mime_type: Some(mime_type.into()),
            text: Some(text.into()),
            fresh: true,
            ..Self::default()
        }
    }

    /// Fresh open-link event
    pub fn view_uri(uri: impl Into<String>) -> Self {
        Self {
            action: IntentAction::ViewUri,
            uri: Some(uri.into()),
            fresh: true,
            ..Self::default()
        }
    }

    /// Build an event from platform fields, deriving freshness from launch flags
    pub fn from_launch_flags(
        platform_action: &str,
        flags: u32,
        mime_type: Option<String>,
        text: Option<String>,
        uri: Option<String>,
    ) -> Self {
        Self {
            action: IntentAction::from_platform_action(platform_action),
            mime_type,
            text,
            uri,
            fresh: is_fresh_launch(flags),
        }
    }

    /// Set freshness flag
    pub fn with_fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }
}

/// Marker distinguishing a cold start from earlier process lifecycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct LifecycleEpoch(u64);

impl LifecycleEpoch {
    /// Epoch before the hosting shell reported a cold start
    pub const UNSTARTED: LifecycleEpoch = LifecycleEpoch(0);

    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        LifecycleEpoch(self.0.saturating_add(1))
    }
}

impl fmt::Display for LifecycleEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The admitted, not yet acknowledged payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEvent {
    pub id: Uuid,
    pub payload: String,
    /// Admission counter, strictly increasing per bridge
    pub sequence: u64,
    pub epoch: LifecycleEpoch,
    pub admitted_at: DateTime<Utc>,
}

impl PendingEvent {
    pub(crate) fn new(payload: String, sequence: u64, epoch: LifecycleEpoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            sequence,
            epoch,
            admitted_at: Utc::now(),
        }
    }
}

/// Push notification sent to the consumer once per admit.
///
/// Only a hint: the bridge slot stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotification {
    /// Method name the consumer listens on
    pub method: String,
    pub event_id: Uuid,
    pub payload: String,
    pub sequence: u64,
    pub epoch: LifecycleEpoch,
}

impl EventNotification {
    pub fn from_pending(method: impl Into<String>, event: &PendingEvent) -> Self {
        Self {
            method: method.into(),
            event_id: event.id,
            payload: event.payload.clone(),
            sequence: event.sequence,
            epoch: event.epoch,
        }
    }

    /// Argument map in the channel convention: `{"data": payload}`
    pub fn arguments(&self) -> serde_json::Value {
        serde_json::json!({ "data": self.payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_platform_actions() {
        // Arrange & Act & Assert
        assert_eq!(
            IntentAction::from_platform_action(PLATFORM_ACTION_SEND),
            IntentAction::SendText
        );
        assert_eq!(
            IntentAction::from_platform_action(PLATFORM_ACTION_VIEW),
            IntentAction::ViewUri
        );
        assert_eq!(
            IntentAction::from_platform_action("android.intent.action.MAIN"),
            IntentAction::Other
        );
    }

    #[test]
    fn should_derive_freshness_from_launch_flags() {
        // Arrange
        let history_flags = FLAG_ACTIVITY_LAUNCHED_FROM_HISTORY | 0x1000_0000;

        // Act
        let fresh = RawEvent::from_launch_flags(
            PLATFORM_ACTION_SEND,
            0x1000_0000,
            Some("text/plain".to_string()),
            Some("hi".to_string()),
            None,
        );
        let replay = RawEvent::from_launch_flags(
            PLATFORM_ACTION_SEND,
            history_flags,
            Some("text/plain".to_string()),
            Some("hi".to_string()),
            None,
        );

        // Assert
        assert!(fresh.fresh);
        assert!(!replay.fresh);
        assert_eq!(fresh.action, IntentAction::SendText);
    }

    #[test]
    fn should_deserialize_raw_event_with_missing_fields() {
        // Arrange
        let json = r#"{"action": "VIEW_URI", "uri": "geo:0,0"}"#;

        // Act
        let event: RawEvent = serde_json::from_str(json).expect("Failed to deserialize");

        // Assert
        assert_eq!(event.action, IntentAction::ViewUri);
        assert_eq!(event.uri.as_deref(), Some("geo:0,0"));
        assert!(!event.fresh);
        assert!(event.text.is_none());
    }

    #[test]
    fn should_deserialize_unknown_action_as_other() {
        // Arrange
        let json = r#"{"action": "PICK_CONTACT", "fresh": true}"#;

        // Act
        let event: RawEvent = serde_json::from_str(json).expect("Failed to deserialize");

        // Assert
        assert_eq!(event.action, IntentAction::Other);
    }

    #[test]
    fn should_serialize_notification_to_camel_case_json() {
        // Arrange
        let pending = PendingEvent::new("Hello".to_string(), 7, LifecycleEpoch(1));
        let notification = EventNotification::from_pending("onLocationReceived", &pending);

        // Act
        let json = serde_json::to_string(&notification).expect("Failed to serialize");

        // Assert
        assert!(json.contains("eventId"));
        assert!(!json.contains("event_id"));
        assert_eq!(notification.arguments(), serde_json::json!({"data": "Hello"}));
    }

    #[test]
    fn should_order_epochs() {
        // Arrange
        let first = LifecycleEpoch::UNSTARTED.next();

        // Act
        let second = first.next();

        // Assert
        assert!(second > first);
        assert_eq!(second.value(), 2);
    }
}
