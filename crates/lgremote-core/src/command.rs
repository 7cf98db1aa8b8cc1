// ── Command model ──
//
// Every button maps to exactly one `Command`. The enum is closed: a
// capability tag plus the command name (or, for launches, the app id).
// `Command::parse` goes the other way, from a `{capability, name}` pair.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::capability::Capability;
use crate::error::CoreError;

/// System-level commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SystemCommand {
    PowerOff,
    ScreenOff,
    ScreenOn,
}

/// Volume and transport commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MediaCommand {
    VolumeUp,
    VolumeDown,
    /// Toggles the current mute state.
    Mute,
    Play,
    Pause,
    Stop,
    Rewind,
    FastForward,
}

/// Navigation buttons sent over the pointer-input socket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum InputButton {
    Up,
    Down,
    Left,
    Right,
    Home,
    Back,
    Ok,
}

impl InputButton {
    /// Button name on the pointer socket.
    pub fn key_name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Home => "HOME",
            Self::Back => "BACK",
            Self::Ok => "ENTER",
        }
    }
}

/// Application descriptor sent with a launch: `{"id": "<app id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Application {
    pub id: String,
}

impl Application {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Everything a button can ask the television to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Wake the television. Never uses the control protocol.
    PowerOn,
    System(SystemCommand),
    Media(MediaCommand),
    Launch(Application),
    Input(InputButton),
}

impl Command {
    /// Shorthand for [`Command::Launch`].
    pub fn launch(app_id: impl Into<String>) -> Self {
        Self::Launch(Application::new(app_id))
    }

    /// The façade this command runs on; `None` for [`Command::PowerOn`].
    pub fn capability(&self) -> Option<Capability> {
        match self {
            Self::PowerOn => None,
            Self::System(_) => Some(Capability::System),
            Self::Media(_) => Some(Capability::Media),
            Self::Launch(_) => Some(Capability::Application),
            Self::Input(_) => Some(Capability::Input),
        }
    }

    /// The command string: a façade method name, or the app id for launches.
    pub fn name(&self) -> &str {
        match self {
            Self::PowerOn => "power_on",
            Self::System(c) => (*c).into(),
            Self::Media(c) => (*c).into(),
            Self::Launch(app) => &app.id,
            Self::Input(b) => (*b).into(),
        }
    }

    /// Build a command from a capability and its command string.
    ///
    /// For [`Capability::Application`] any non-empty string is an app id.
    pub fn parse(capability: Capability, command: &str) -> Result<Self, CoreError> {
        let unknown = || CoreError::UnknownCommand {
            capability,
            command: command.to_owned(),
        };
        match capability {
            Capability::System => command.parse().map(Self::System).map_err(|_| unknown()),
            Capability::Media => command.parse().map(Self::Media).map_err(|_| unknown()),
            Capability::Input => command.parse().map(Self::Input).map_err(|_| unknown()),
            Capability::Application if command.trim().is_empty() => Err(unknown()),
            Capability::Application => Ok(Self::launch(command)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capability() {
            Some(capability) => write!(f, "{capability}:{}", self.name()),
            None => f.write_str(self.name()),
        }
    }
}
