pub mod channel;
pub mod config;
pub mod event;
pub mod shell;
pub mod utils;

use channel::{ChannelRegistry, IntentChannel, LocationReceiverChannel};
use config::BridgeConfig;
use event::{BroadcastNotifier, EventBridge};
use std::sync::Arc;

/// Everything the hosting shell needs, wired from one config
pub struct BridgeApp {
    pub bridge: Arc<EventBridge>,
    pub notifier: Arc<BroadcastNotifier>,
    pub channels: ChannelRegistry,
}

pub fn app(config: BridgeConfig) -> BridgeApp {
    let notifier = Arc::new(BroadcastNotifier::with_capacity(config.notify_capacity));
    let bridge = Arc::new(
        EventBridge::new(config.classifier, notifier.clone())
            .with_notify_method(config.notify_method),
    );

    let channels = ChannelRegistry::new()
        .register(Arc::new(IntentChannel::new(
            config.intent_channel,
            Arc::clone(&bridge),
        )))
        .register(Arc::new(LocationReceiverChannel::new(
            config.location_channel,
        )));

    BridgeApp {
        bridge,
        notifier,
        channels,
    }
}
