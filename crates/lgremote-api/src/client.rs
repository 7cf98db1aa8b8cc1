//! SSAP session: connect, pair, and exchange request/response frames.
//!
//! A [`WebOsClient`] owns one authenticated websocket. Requests are
//! serialized through the socket lock: each one sends a frame and reads
//! until the frame echoing its id arrives, skipping anything unrelated.

use std::fmt;
use std::future::Future;
use std::net::Ipv6Addr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace};
use url::Url;

use crate::error::Error;
use crate::input::PointerInputSocket;
use crate::ssap::{self, IncomingFrame, OutgoingFrame, REGISTER_ID};
use crate::tls;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const PLAIN_PORT: u16 = 3000;
const SECURE_PORT: u16 = 3001;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a first-time pairing may wait for someone to accept the
/// on-screen prompt.
const PAIRING_TIMEOUT: Duration = Duration::from_secs(60);

// ── ConnectOptions ───────────────────────────────────────────────────

/// Where and how to reach a television.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Websocket endpoint, e.g. `ws://192.168.1.50:3000/`.
    pub url: Url,
    /// Timeout for the connect handshake and for each request.
    pub timeout: Duration,
}

impl ConnectOptions {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Standard endpoint for a host: `ws://host:3000/`, or
    /// `wss://host:3001/` when `secure`.
    ///
    /// `host` may carry its own port (`tv.lan:3001`); bare IPv6 addresses
    /// are bracketed.
    pub fn for_host(host: &str, secure: bool) -> Result<Self, Error> {
        let (scheme, default_port) = if secure {
            ("wss", SECURE_PORT)
        } else {
            ("ws", PLAIN_PORT)
        };
        let authority = if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{host}]:{default_port}")
        } else if host.starts_with('[') || host.contains(':') {
            host.to_owned()
        } else {
            format!("{host}:{default_port}")
        };
        Ok(Self::new(Url::parse(&format!("{scheme}://{authority}/"))?))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ── WebOsClient ──────────────────────────────────────────────────────

/// An authenticated SSAP session with one television.
pub struct WebOsClient {
    socket: Mutex<WsStream>,
    next_id: AtomicU64,
    client_key: SecretString,
    timeout: Duration,
}

impl fmt::Debug for WebOsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebOsClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WebOsClient {
    /// Open the websocket and register.
    ///
    /// With `client_key` the television accepts silently; without one it
    /// shows a consent prompt and this call waits for the answer. Either
    /// way the returned client carries the key the television issued
    /// ([`client_key`](Self::client_key)).
    pub async fn connect(
        options: &ConnectOptions,
        client_key: Option<&SecretString>,
    ) -> Result<Self, Error> {
        info!(url = %options.url, paired = client_key.is_some(), "connecting to television");

        let mut socket = open_socket(&options.url, options.timeout).await?;
        let client_key = register(&mut socket, client_key, options.timeout).await?;

        info!(url = %options.url, "television session registered");
        Ok(Self {
            socket: Mutex::new(socket),
            next_id: AtomicU64::new(1),
            client_key,
            timeout: options.timeout,
        })
    }

    /// The client key the television issued (or confirmed) at registration.
    pub fn client_key(&self) -> &SecretString {
        &self.client_key
    }

    /// Send one request and wait for its answer's payload.
    ///
    /// An `error` frame or a payload with `returnValue: false` becomes
    /// [`Error::Rejected`].
    pub async fn request(&self, uri: &str, payload: Option<Value>) -> Result<Value, Error> {
        let id = format!("req_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut socket = self.socket.lock().await;
        debug!(%uri, %id, "sending request");

        with_timeout(self.timeout, async {
            let frame = OutgoingFrame::request(&id, uri, payload.as_ref());
            send_json(&mut *socket, &frame).await?;
            loop {
                let frame = next_frame(&mut *socket).await?;
                if !frame.answers(&id) {
                    trace!(kind = %frame.kind, "ignoring unrelated frame");
                    continue;
                }
                if frame.kind == "error" || frame.return_value() == Some(false) {
                    return Err(Error::Rejected {
                        uri: uri.to_owned(),
                        message: frame.failure_message(),
                    });
                }
                return Ok(frame.payload);
            }
        })
        .await
    }

    /// Ask for the pointer-input socket and connect to it.
    ///
    /// This is a second websocket, nested inside the session: the SSAP
    /// socket hands out its path, and navigation buttons travel over it.
    pub async fn pointer_input(&self) -> Result<PointerInputSocket, Error> {
        let payload = self.request(ssap::POINTER_INPUT_SOCKET, None).await?;
        let path = payload
            .get("socketPath")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Protocol("pointer input answer without socketPath".into()))?;
        PointerInputSocket::connect(&Url::parse(path)?, self.timeout).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Connect a websocket, using the self-signed TLS config for `wss://`.
pub(crate) async fn open_socket(url: &Url, timeout: Duration) -> Result<WsStream, Error> {
    let connecting = async {
        let (socket, _response) = if url.scheme() == "wss" {
            let connector = Connector::Rustls(tls::self_signed_client_config()?);
            tokio_tungstenite::connect_async_tls_with_config(
                url.as_str(),
                None,
                false,
                Some(connector),
            )
            .await?
        } else {
            tokio_tungstenite::connect_async(url.as_str()).await?
        };
        Ok::<_, Error>(socket)
    };
    with_timeout(timeout, connecting).await
}

pub(crate) async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| Error::Timeout {
            timeout_secs: timeout.as_secs(),
        })?
}

async fn register(
    socket: &mut WsStream,
    client_key: Option<&SecretString>,
    timeout: Duration,
) -> Result<SecretString, Error> {
    let payload = ssap::register_payload(client_key.map(ExposeSecret::expose_secret));
    send_json(socket, &OutgoingFrame::register(&payload)).await?;

    let wait = if client_key.is_some() {
        timeout
    } else {
        PAIRING_TIMEOUT.max(timeout)
    };

    with_timeout(wait, async {
        loop {
            let frame = next_frame(&mut *socket).await?;
            if !frame.answers(REGISTER_ID) {
                continue;
            }
            match frame.kind.as_str() {
                "registered" => {
                    let key = frame
                        .payload
                        .get("client-key")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            Error::Protocol("registered frame without client-key".into())
                        })?;
                    return Ok(SecretString::from(key.to_owned()));
                }
                "error" => return Err(Error::PairingRejected(frame.failure_message())),
                _ if frame.is_pairing_prompt() => {
                    info!("waiting for the pairing prompt to be accepted on the television");
                }
                other => debug!(kind = other, "ignoring frame during registration"),
            }
        }
    })
    .await
}

async fn send_json(socket: &mut WsStream, frame: &OutgoingFrame<'_>) -> Result<(), Error> {
    let text = serde_json::to_string(frame)?;
    socket.send(Message::text(text)).await?;
    Ok(())
}

async fn next_frame(socket: &mut WsStream) -> Result<IncomingFrame, Error> {
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<IncomingFrame>(text.as_str()) {
                    Ok(frame) => return Ok(frame),
                    Err(e) => debug!(error = %e, "skipping unparsable frame"),
                }
            }
            Some(Ok(Message::Close(_))) | None => return Err(Error::Closed),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    }
}
