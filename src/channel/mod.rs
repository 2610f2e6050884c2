//! Named method channels toward the consumer
//!
//! A consumer addresses a channel by name and invokes a method on it. Unknown
//! methods answer `NotImplemented`; unknown channels are an error.

mod intent;
mod location;

pub use intent::{IntentChannel, CLEAR_INTENT_DATA, GET_INTENT_DATA};
pub use location::{LocationReceiverChannel, REGISTER};

use crate::utils::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default channel name for intent data
pub const DEFAULT_INTENT_CHANNEL: &str = "com.example.locyapp/intent";
/// Default channel name for the location receiver
pub const DEFAULT_LOCATION_CHANNEL: &str = "com.example.locyapp/location_receiver";

/// A method invocation from the consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: serde_json::Value::Null,
        }
    }
}

/// Result of a method invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "camelCase")]
pub enum MethodResult {
    Success(Option<serde_json::Value>),
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Into<serde_json::Value>) -> Self {
        MethodResult::Success(Some(value.into()))
    }

    pub fn empty() -> Self {
        MethodResult::Success(None)
    }
}

/// A channel answering method calls
pub trait MethodChannel: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, call: &MethodCall) -> MethodResult;
}

/// Routes calls to channels by name
#[derive(Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Arc<dyn MethodChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, replacing any channel with the same name
    pub fn register(mut self, channel: Arc<dyn MethodChannel>) -> Self {
        let name = channel.name().to_string();
        if self.channels.insert(name.clone(), channel).is_some() {
            warn!(channel = %name, "Channel registered twice, replacing");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Dispatch a call to the named channel
    pub fn dispatch(&self, channel: &str, call: &MethodCall) -> Result<MethodResult, AppError> {
        let target = self
            .channels
            .get(channel)
            .ok_or_else(|| AppError::unknown_channel(channel))?;

        let result = target.handle(call);
        debug!(channel = %channel, method = %call.method, result = ?result, "Method call handled");
        Ok(result)
    }
}
