//! Control façades: one narrow capability each, over a shared session.
//!
//! Façades are stateless apart from the input façade, which owns the
//! pointer-input channel it opened at construction.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use lgremote_api::{Error, ssap};

use crate::capability::Capability;
use crate::command::{Application, Command, InputButton, MediaCommand, SystemCommand};
use crate::session::{PointerInput, Session};

// ── System ───────────────────────────────────────────────────────────

pub struct SystemControl<S> {
    session: Arc<S>,
}

impl<S: Session> SystemControl<S> {
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    pub async fn execute(&self, command: SystemCommand) -> Result<(), Error> {
        let uri = match command {
            SystemCommand::PowerOff => ssap::TURN_OFF,
            SystemCommand::ScreenOff => ssap::SCREEN_OFF,
            SystemCommand::ScreenOn => ssap::SCREEN_ON,
        };
        self.session.request(uri, None).await.map(drop)
    }
}

// ── Media ────────────────────────────────────────────────────────────

pub struct MediaControl<S> {
    session: Arc<S>,
}

impl<S: Session> MediaControl<S> {
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    pub async fn execute(&self, command: MediaCommand) -> Result<(), Error> {
        let uri = match command {
            MediaCommand::Mute => return self.toggle_mute().await,
            MediaCommand::VolumeUp => ssap::VOLUME_UP,
            MediaCommand::VolumeDown => ssap::VOLUME_DOWN,
            MediaCommand::Play => ssap::MEDIA_PLAY,
            MediaCommand::Pause => ssap::MEDIA_PAUSE,
            MediaCommand::Stop => ssap::MEDIA_STOP,
            MediaCommand::Rewind => ssap::MEDIA_REWIND,
            MediaCommand::FastForward => ssap::MEDIA_FAST_FORWARD,
        };
        self.session.request(uri, None).await.map(drop)
    }

    /// `setMute` needs an explicit value, so read the current state first.
    async fn toggle_mute(&self) -> Result<(), Error> {
        let status = self.session.request(ssap::AUDIO_STATUS, None).await?;
        let mute = !is_muted(&status);
        debug!(mute, "toggling mute");
        self.session
            .request(ssap::SET_MUTE, Some(json!({ "mute": mute })))
            .await
            .map(drop)
    }
}

/// Mute state from an `audio/getStatus` payload. Older firmware reports
/// `mute`, newer firmware `muteStatus`, sometimes under `volumeStatus`.
fn is_muted(status: &Value) -> bool {
    status
        .get("mute")
        .or_else(|| status.get("muteStatus"))
        .or_else(|| status.get("volumeStatus").and_then(|v| v.get("muteStatus")))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// ── Application ──────────────────────────────────────────────────────

pub struct ApplicationControl<S> {
    session: Arc<S>,
}

impl<S: Session> ApplicationControl<S> {
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    pub async fn launch(&self, app: &Application) -> Result<(), Error> {
        let payload = serde_json::to_value(app)?;
        self.session
            .request(ssap::LAUNCH, Some(payload))
            .await
            .map(drop)
    }
}

// ── Input ────────────────────────────────────────────────────────────

pub struct InputControl<S: Session> {
    input: S::Input,
}

impl<S: Session> InputControl<S> {
    /// Open the pointer-input channel. This is the only place it happens.
    pub async fn connect(session: &S) -> Result<Self, Error> {
        let input = session.connect_input().await?;
        Ok(Self { input })
    }

    pub async fn press(&self, button: InputButton) -> Result<(), Error> {
        self.input.button(button.key_name()).await
    }
}

// ── Facade ───────────────────────────────────────────────────────────

/// A constructed façade of any capability.
pub enum Facade<S: Session> {
    System(SystemControl<S>),
    Media(MediaControl<S>),
    Application(ApplicationControl<S>),
    Input(InputControl<S>),
}

impl<S: Session> Facade<S> {
    /// Build the façade for `capability`. Only [`Capability::Input`]
    /// talks to the television here.
    pub async fn build(capability: Capability, session: Arc<S>) -> Result<Self, Error> {
        Ok(match capability {
            Capability::System => Self::System(SystemControl::new(session)),
            Capability::Media => Self::Media(MediaControl::new(session)),
            Capability::Application => Self::Application(ApplicationControl::new(session)),
            Capability::Input => Self::Input(InputControl::connect(&*session).await?),
        })
    }

    pub fn capability(&self) -> Capability {
        match self {
            Self::System(_) => Capability::System,
            Self::Media(_) => Capability::Media,
            Self::Application(_) => Capability::Application,
            Self::Input(_) => Capability::Input,
        }
    }

    /// Run `command` on this façade.
    pub async fn invoke(&self, command: &Command) -> Result<(), Error> {
        match (self, command) {
            (Self::System(control), Command::System(c)) => control.execute(*c).await,
            (Self::Media(control), Command::Media(c)) => control.execute(*c).await,
            (Self::Application(control), Command::Launch(app)) => control.launch(app).await,
            (Self::Input(control), Command::Input(button)) => control.press(*button).await,
            _ => Err(Error::Protocol(format!(
                "{command} cannot run on the {} control",
                self.capability()
            ))),
        }
    }
}
