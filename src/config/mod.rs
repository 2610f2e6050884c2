pub mod app_config;

pub use app_config::{BridgeConfig, ConfigError};
