use super::{MethodCall, MethodChannel, MethodResult};
use tracing::info;

/// Register the consumer as a location receiver
pub const REGISTER: &str = "register";

/// Registration handshake; acknowledges every `register` call
pub struct LocationReceiverChannel {
    name: String,
}

impl LocationReceiverChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MethodChannel for LocationReceiverChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            REGISTER => {
                info!(channel = %self.name, "Location receiver registered");
                MethodResult::success(true)
            }
            _ => MethodResult::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_acknowledge_register() {
        // Arrange
        let channel = LocationReceiverChannel::new("test/location");

        // Act
        let result = channel.handle(&MethodCall::new(REGISTER));

        // Assert
        assert_eq!(result, MethodResult::success(true));
        assert_eq!(
            channel.handle(&MethodCall::new("unregister")),
            MethodResult::NotImplemented
        );
    }
}
