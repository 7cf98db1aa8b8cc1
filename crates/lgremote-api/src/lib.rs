//! Async client for LG WebOS televisions.
//!
//! Two independent surfaces live here:
//!
//! - **[`WebOsClient`]** speaks SSAP (the JSON-over-websocket protocol the TV
//!   exposes on port 3000/3001): pairing, request/response, and the nested
//!   pointer-input socket ([`PointerInputSocket`]) used for navigation keys.
//! - **[`wol`]** wakes a soft-off television: link-layer address lookup and
//!   the magic-packet broadcast. A powered-off TV cannot accept SSAP
//!   connections, so this path never touches the websocket client.

pub mod client;
pub mod error;
pub mod input;
pub mod ssap;
mod tls;
pub mod wol;

pub use client::{ConnectOptions, WebOsClient};
pub use error::Error;
pub use input::PointerInputSocket;
pub use wol::MacAddress;
