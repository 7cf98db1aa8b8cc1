//! SSAP wire format: frame envelopes, the registration manifest, and the
//! `ssap://` endpoints the remote uses.
//!
//! Every frame is a JSON object with a `type` discriminator. Outgoing
//! requests carry an `id` that the television echoes on its answer, which
//! is how responses are matched to requests on the shared socket.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// ── Endpoints ────────────────────────────────────────────────────────

pub const TURN_OFF: &str = "ssap://system/turnOff";
pub const SCREEN_OFF: &str = "ssap://com.webos.service.tvpower/power/turnOffScreen";
pub const SCREEN_ON: &str = "ssap://com.webos.service.tvpower/power/turnOnScreen";

pub const VOLUME_UP: &str = "ssap://audio/volumeUp";
pub const VOLUME_DOWN: &str = "ssap://audio/volumeDown";
pub const AUDIO_STATUS: &str = "ssap://audio/getStatus";
pub const SET_MUTE: &str = "ssap://audio/setMute";

pub const MEDIA_PLAY: &str = "ssap://media.controls/play";
pub const MEDIA_PAUSE: &str = "ssap://media.controls/pause";
pub const MEDIA_STOP: &str = "ssap://media.controls/stop";
pub const MEDIA_REWIND: &str = "ssap://media.controls/rewind";
pub const MEDIA_FAST_FORWARD: &str = "ssap://media.controls/fastForward";

pub const LAUNCH: &str = "ssap://system.launcher/launch";

pub const POINTER_INPUT_SOCKET: &str =
    "ssap://com.webos.service.networkinput/getPointerInputSocket";

/// Id used for the one registration exchange per session.
pub const REGISTER_ID: &str = "register_0";

/// Permissions requested at pairing time. The television shows these on
/// its consent prompt; anything missing here is refused later with a 401.
const PERMISSIONS: &[&str] = &[
    "LAUNCH",
    "LAUNCH_WEBAPP",
    "APP_TO_APP",
    "CLOSE",
    "CONTROL_AUDIO",
    "CONTROL_DISPLAY",
    "CONTROL_INPUT_JOYSTICK",
    "CONTROL_INPUT_MEDIA_PLAYBACK",
    "CONTROL_INPUT_TV",
    "CONTROL_MOUSE_AND_KEYBOARD",
    "CONTROL_POWER",
    "CONTROL_TV_SCREEN",
    "READ_APP_STATUS",
    "READ_INSTALLED_APPS",
    "READ_RUNNING_APPS",
    "READ_POWER_STATE",
    "READ_CURRENT_CHANNEL",
    "WRITE_NOTIFICATION_TOAST",
];

// ── Frames ───────────────────────────────────────────────────────────

/// A frame sent to the television.
#[derive(Debug, Serialize)]
pub struct OutgoingFrame<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a Value>,
}

impl<'a> OutgoingFrame<'a> {
    pub fn request(id: &'a str, uri: &'a str, payload: Option<&'a Value>) -> Self {
        Self {
            id,
            kind: "request",
            uri: Some(uri),
            payload,
        }
    }

    pub fn register(payload: &'a Value) -> Self {
        Self {
            id: REGISTER_ID,
            kind: "register",
            uri: None,
            payload: Some(payload),
        }
    }
}

/// A frame received from the television.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingFrame {
    #[serde(rename = "type")]
    pub kind: String,
    /// Echoed request id. Usually a string, but unsolicited frames may
    /// carry anything (or nothing).
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl IncomingFrame {
    /// Whether this frame answers the request with the given id.
    pub fn answers(&self, id: &str) -> bool {
        self.id.as_ref().and_then(Value::as_str) == Some(id)
    }

    /// `payload.returnValue`, when present.
    pub fn return_value(&self) -> Option<bool> {
        self.payload.get("returnValue").and_then(Value::as_bool)
    }

    /// A `response` to a register request that only reports the prompt
    /// being shown; the real answer follows as `registered`.
    pub fn is_pairing_prompt(&self) -> bool {
        self.kind == "response" && self.payload.get("pairingType").is_some()
    }

    /// Human-readable failure reason for an `error` frame or a response
    /// with `returnValue: false`.
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| {
                self.payload
                    .get("errorText")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| "television returned an error".into())
    }
}

// ── Registration ─────────────────────────────────────────────────────

/// Build the `register` payload. Without a client key the television shows
/// an on-screen prompt; with a valid one it answers `registered` at once.
pub fn register_payload(client_key: Option<&str>) -> Value {
    let mut payload = json!({
        "forcePairing": false,
        "pairingType": "PROMPT",
        "manifest": {
            "manifestVersion": 1,
            "appVersion": "1.1",
            "permissions": PERMISSIONS,
        },
    });
    if let Some(key) = client_key {
        payload["client-key"] = Value::String(key.to_owned());
    }
    payload
}

/// Pointer-socket text frame for a named button (`HOME`, `UP`, `ENTER`...).
pub fn button_frame(name: &str) -> String {
    format!("type:button\nname:{name}\n\n")
}
