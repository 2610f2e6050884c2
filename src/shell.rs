//! Line protocol of the host shell
//!
//! One JSON object per line in, tagged by `kind` (`event`, `call`,
//! `coldStart`), and one JSON object per line out. Malformed lines answer
//! with an `error` line; they never stop the shell.

use crate::channel::{MethodCall, MethodResult};
use crate::event::{EventNotification, LifecycleEpoch, RawEvent};
use crate::utils::AppError;
use crate::BridgeApp;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

/// One input line
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShellInput {
    Event(RawEvent),
    Call {
        channel: String,
        method: String,
        #[serde(default)]
        arguments: serde_json::Value,
    },
    ColdStart,
}

/// One output line
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShellOutput {
    Notification(EventNotification),
    #[serde(rename_all = "camelCase")]
    Admitted {
        event_id: Uuid,
        sequence: u64,
    },
    Ignored,
    Result {
        channel: String,
        result: MethodResult,
    },
    Epoch {
        epoch: LifecycleEpoch,
    },
    Error {
        code: String,
        message: String,
    },
}

impl From<AppError> for ShellOutput {
    fn from(err: AppError) -> Self {
        ShellOutput::Error {
            code: err.error_code(),
            message: err.message(),
        }
    }
}

/// Parse and execute one input line against the app
pub fn handle_line(app: &BridgeApp, line: &str) -> ShellOutput {
    let input = match serde_json::from_str::<ShellInput>(line) {
        Ok(input) => input,
        Err(err) => {
            error!(error = %err, "Malformed input line");
            return AppError::invalid_request(err.to_string()).into();
        }
    };

    match input {
        ShellInput::Event(raw) => match app.bridge.notify_raw_event(&raw) {
            Some(event) => ShellOutput::Admitted {
                event_id: event.id,
                sequence: event.sequence,
            },
            None => ShellOutput::Ignored,
        },
        ShellInput::Call {
            channel,
            method,
            arguments,
        } => {
            let call = MethodCall { method, arguments };
            match app.channels.dispatch(&channel, &call) {
                Ok(result) => ShellOutput::Result { channel, result },
                Err(err) => {
                    error!(error = %err, "Method call failed");
                    err.into()
                }
            }
        }
        ShellInput::ColdStart => ShellOutput::Epoch {
            epoch: app.bridge.on_cold_start(),
        },
    }
}
