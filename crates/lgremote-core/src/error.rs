// ── Core error types ──
//
// What dispatch reports back to the UI. Consumers never see websocket or
// JSON failures directly: `CoreError::connection` / `CoreError::command`
// fold `lgremote_api::Error` into the connection / command categories.

use thiserror::Error;

use lgremote_config::ConfigError;

use crate::capability::Capability;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup ──────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    // ── Session ──────────────────────────────────────────────────────
    #[error("Cannot connect to '{device}': {reason}")]
    Connection { device: String, reason: String },

    #[error("'{command}' failed on '{device}': {reason}")]
    Command {
        device: String,
        command: String,
        reason: String,
    },

    // ── Power-on ─────────────────────────────────────────────────────
    #[error("Wake-on-LAN for '{device}' failed: {reason}")]
    Wake { device: String, reason: String },

    // ── Command model ────────────────────────────────────────────────
    #[error("Unknown {capability} command: {command}")]
    UnknownCommand {
        capability: Capability,
        command: String,
    },
}

impl CoreError {
    pub(crate) fn connection(device: &str, err: &lgremote_api::Error) -> Self {
        Self::Connection {
            device: device.to_owned(),
            reason: err.to_string(),
        }
    }

    /// Classify a failure while running `command`: a dead or unreachable
    /// session is a connection error, anything else the television said
    /// about the command itself is a command error.
    pub(crate) fn command(device: &str, command: &str, err: &lgremote_api::Error) -> Self {
        if err.is_connection() {
            Self::connection(device, err)
        } else {
            Self::Command {
                device: device.to_owned(),
                command: command.to_owned(),
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn wake(device: &str, err: &lgremote_api::Error) -> Self {
        Self::Wake {
            device: device.to_owned(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closed_session_during_command_is_a_connection_error() {
        let err = CoreError::command("living_room", "volume_up", &lgremote_api::Error::Closed);
        assert!(matches!(err, CoreError::Connection { ref device, .. } if device == "living_room"));
    }

    #[test]
    fn refused_command_is_a_command_error() {
        let api = lgremote_api::Error::Rejected {
            uri: "ssap://audio/volumeUp".into(),
            message: "401 insufficient permissions".into(),
        };
        let err = CoreError::command("living_room", "volume_up", &api);
        assert_eq!(
            err.to_string(),
            "'volume_up' failed on 'living_room': Request ssap://audio/volumeUp rejected: 401 insufficient permissions"
        );
    }
}
