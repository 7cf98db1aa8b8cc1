//! Command dispatch and connection lifecycle for the LG WebOS remote.
//!
//! - **[`Command`]**: closed set of everything a button can do, tagged by
//!   [`Capability`] (System, Media, Application, Input) plus the
//!   protocol-free [`Command::PowerOn`].
//! - **[`ConnectionPool`]**: at most one [`Session`] per device for the
//!   process lifetime, and one façade per `(device, capability)`, both
//!   created on first use.
//! - **Façades** ([`facade`]): narrow controls over a shared session; the
//!   input façade opens its pointer socket once, at construction.
//! - **[`Remote`]**: `invoke(device, command)`: resolves the façade (or
//!   the wake path for power-on) and runs one command, returning a
//!   [`CoreError`] for the caller to log.
//!
//! The protocol client and Wake-on-LAN sit behind the [`Connector`] and
//! [`WakeService`] traits; [`WebOsConnector`] and [`LanWake`] are the real
//! implementations over `lgremote-api`.

pub mod capability;
pub mod command;
pub mod error;
pub mod facade;
pub mod pool;
pub mod remote;
pub mod session;
pub mod wake;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capability::Capability;
pub use command::{Application, Command, InputButton, MediaCommand, SystemCommand};
pub use error::CoreError;
pub use facade::Facade;
pub use pool::ConnectionPool;
pub use remote::Remote;
pub use session::{Connector, PointerInput, Session, WebOsConnector};
pub use wake::{LanWake, WakeService};

pub use lgremote_config::{Settings, TvSettings};
