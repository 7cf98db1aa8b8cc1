use thiserror::Error;

/// Top-level error type for the `lgremote-api` crate.
///
/// Covers the SSAP websocket session (connect, pairing, requests), the
/// pointer-input socket, and Wake-on-LAN. `lgremote-core` folds these into
/// its connection / command / wake categories.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Websocket connect or I/O failure.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The television closed the session.
    #[error("WebSocket closed by television")]
    Closed,

    /// No answer within the configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup failure (wss:// sessions only).
    #[error("TLS error: {0}")]
    Tls(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Pairing ─────────────────────────────────────────────────────
    /// The television refused the registration (prompt declined, bad key).
    #[error("Pairing rejected: {0}")]
    PairingRejected(String),

    // ── Requests ────────────────────────────────────────────────────
    /// The television answered a request with an error.
    #[error("Request {uri} rejected: {message}")]
    Rejected { uri: String, message: String },

    /// A frame did not have the expected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON encoding/decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Wake-on-LAN ─────────────────────────────────────────────────
    /// Malformed hardware address.
    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    /// The host never showed up in the neighbour table.
    #[error("Could not resolve a MAC address for {host}")]
    MacUnresolved { host: String },

    /// Socket or filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for failures of the session itself (as opposed to a
    /// single command the television refused).
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::WebSocket(_)
                | Self::Closed
                | Self::Timeout { .. }
                | Self::Tls(_)
                | Self::InvalidUrl(_)
                | Self::PairingRejected(_)
                | Self::Io(_)
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => Self::Closed,
            other => Self::WebSocket(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_classified() {
        assert!(Error::Closed.is_connection());
        assert!(Error::Timeout { timeout_secs: 10 }.is_connection());
        assert!(Error::PairingRejected("declined".into()).is_connection());
        assert!(
            !Error::Rejected {
                uri: "ssap://audio/volumeUp".into(),
                message: "401 insufficient permissions".into(),
            }
            .is_connection()
        );
    }

    #[test]
    fn closed_websocket_maps_to_closed() {
        let err: Error = tokio_tungstenite::tungstenite::Error::ConnectionClosed.into();
        assert!(matches!(err, Error::Closed));
    }
}
