use crate::channel::{DEFAULT_INTENT_CHANNEL, DEFAULT_LOCATION_CHANNEL};
use crate::event::{
    EventClassifier, EventClassifierBuilder, ParsePatternError, DEFAULT_NOTIFY_CAPACITY,
    DEFAULT_NOTIFY_METHOD,
};
use std::env;

/// 브리지 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Channel serving `getIntentData` / `clearIntentData`
    pub intent_channel: String,
    /// Channel serving the location receiver registration
    pub location_channel: String,
    /// Method name used for push notifications
    pub notify_method: String,
    /// Broadcast buffer per push receiver
    pub notify_capacity: usize,
    pub classifier: EventClassifier,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            intent_channel: DEFAULT_INTENT_CHANNEL.to_string(),
            location_channel: DEFAULT_LOCATION_CHANNEL.to_string(),
            notify_method: DEFAULT_NOTIFY_METHOD.to_string(),
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
            classifier: EventClassifier::new(),
        }
    }
}

impl BridgeConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let intent_channel = lookup("BRIDGE_INTENT_CHANNEL").unwrap_or(defaults.intent_channel);
        let location_channel =
            lookup("BRIDGE_LOCATION_CHANNEL").unwrap_or(defaults.location_channel);
        let notify_method = lookup("BRIDGE_NOTIFY_METHOD").unwrap_or(defaults.notify_method);

        let notify_capacity = match lookup("BRIDGE_NOTIFY_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidCapacity)?,
            None => defaults.notify_capacity,
        };

        let classifier = match lookup("BRIDGE_URI_PATTERNS") {
            Some(raw) => {
                let classifier = EventClassifierBuilder::new().load_patterns(&raw).build()?;
                if classifier.uri_patterns().is_empty() {
                    tracing::warn!(
                        "BRIDGE_URI_PATTERNS is empty; no VIEW_URI event will be admitted"
                    );
                }
                classifier
            }
            None => {
                tracing::warn!("BRIDGE_URI_PATTERNS not set, using default uri allow-list");
                defaults.classifier
            }
        };

        Ok(Self {
            intent_channel,
            location_channel,
            notify_method,
            notify_capacity,
            classifier,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidUriPattern(#[from] ParsePatternError),
    #[error("BRIDGE_NOTIFY_CAPACITY must be a positive integer")]
    InvalidCapacity,
}
