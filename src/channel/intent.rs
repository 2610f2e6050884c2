use super::{MethodCall, MethodChannel, MethodResult};
use crate::event::EventBridge;
use std::sync::Arc;
use tracing::info;

/// Pull the pending payload (`{"data": payload}` or null)
pub const GET_INTENT_DATA: &str = "getIntentData";
/// Acknowledge the pending payload
pub const CLEAR_INTENT_DATA: &str = "clearIntentData";

/// Pull side of the bridge exposed as a method channel
pub struct IntentChannel {
    name: String,
    bridge: Arc<EventBridge>,
}

impl IntentChannel {
    pub fn new(name: impl Into<String>, bridge: Arc<EventBridge>) -> Self {
        Self {
            name: name.into(),
            bridge,
        }
    }
}

impl MethodChannel for IntentChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            GET_INTENT_DATA => match self.bridge.request_pending() {
                Some(payload) => {
                    info!(payload_len = payload.len(), "Returning intent data");
                    MethodResult::success(serde_json::json!({ "data": payload }))
                }
                None => {
                    info!("No intent data to return");
                    MethodResult::empty()
                }
            },
            CLEAR_INTENT_DATA => {
                let cleared = self.bridge.acknowledge();
                info!(cleared, "Clearing intent data");
                MethodResult::empty()
            }
            _ => MethodResult::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventClassifier;

    fn create_channel() -> (IntentChannel, Arc<EventBridge>) {
        let bridge = Arc::new(EventBridge::pull_only(EventClassifier::new()));
        bridge.on_cold_start();
        (IntentChannel::new("test/intent", Arc::clone(&bridge)), bridge)
    }

    #[test]
    fn should_return_pending_data_until_cleared() {
        // Arrange
        let (channel, bridge) = create_channel();
        bridge.admit("geo:1,2");

        // Act
        let first = channel.handle(&MethodCall::new(GET_INTENT_DATA));
        let second = channel.handle(&MethodCall::new(GET_INTENT_DATA));
        let clear = channel.handle(&MethodCall::new(CLEAR_INTENT_DATA));
        let after = channel.handle(&MethodCall::new(GET_INTENT_DATA));

        // Assert
        let expected = MethodResult::success(serde_json::json!({"data": "geo:1,2"}));
        assert_eq!(first, expected);
        assert_eq!(second, expected);
        assert_eq!(clear, MethodResult::empty());
        assert_eq!(after, MethodResult::empty());
    }

    #[test]
    fn should_clear_idempotently() {
        // Arrange
        let (channel, _) = create_channel();

        // Act & Assert
        assert_eq!(
            channel.handle(&MethodCall::new(CLEAR_INTENT_DATA)),
            MethodResult::empty()
        );
        assert_eq!(
            channel.handle(&MethodCall::new(CLEAR_INTENT_DATA)),
            MethodResult::empty()
        );
    }

    #[test]
    fn should_not_implement_unknown_method() {
        // Arrange
        let (channel, _) = create_channel();

        // Act & Assert
        assert_eq!(
            channel.handle(&MethodCall::new("share")),
            MethodResult::NotImplemented
        );
    }
}
