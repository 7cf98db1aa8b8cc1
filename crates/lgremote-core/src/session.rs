// ── Protocol seams ──
//
// The dispatch core talks to televisions only through these traits.
// `WebOsConnector` / `WebOsClient` / `PointerInputSocket` are the real
// implementations; tests plug in fakes.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::Value;

use lgremote_api::{ConnectOptions, Error, PointerInputSocket, WebOsClient};
use lgremote_config::TvSettings;

/// An authenticated command session with one television.
pub trait Session: Send + Sync + 'static {
    /// The nested input channel opened by [`connect_input`](Self::connect_input).
    type Input: PointerInput;

    /// Send one request and return the answer's payload.
    fn request(
        &self,
        uri: &str,
        payload: Option<Value>,
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Open the pointer-input channel.
    fn connect_input(&self) -> impl Future<Output = Result<Self::Input, Error>> + Send;

    /// Client key the television issued for this session, if any.
    fn client_key(&self) -> Option<&SecretString>;
}

/// Channel carrying navigation buttons.
pub trait PointerInput: Send + Sync + 'static {
    fn button(&self, name: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Performs the pairing/connect sequence for a configured television.
pub trait Connector: Send + Sync {
    type Session: Session;

    fn connect(
        &self,
        settings: &TvSettings,
    ) -> impl Future<Output = Result<Self::Session, Error>> + Send;
}

// ── WebOS implementations ────────────────────────────────────────────

/// Connects over SSAP using `lgremote-api`.
#[derive(Debug, Clone)]
pub struct WebOsConnector {
    timeout: Duration,
}

impl WebOsConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for WebOsConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Connector for WebOsConnector {
    type Session = WebOsClient;

    async fn connect(&self, settings: &TvSettings) -> Result<WebOsClient, Error> {
        let options =
            ConnectOptions::for_host(&settings.host, settings.secure)?.with_timeout(self.timeout);
        WebOsClient::connect(&options, settings.client_key.as_ref()).await
    }
}

impl Session for WebOsClient {
    type Input = PointerInputSocket;

    async fn request(&self, uri: &str, payload: Option<Value>) -> Result<Value, Error> {
        WebOsClient::request(self, uri, payload).await
    }

    async fn connect_input(&self) -> Result<PointerInputSocket, Error> {
        self.pointer_input().await
    }

    fn client_key(&self) -> Option<&SecretString> {
        Some(WebOsClient::client_key(self))
    }
}

impl PointerInput for PointerInputSocket {
    async fn button(&self, name: &str) -> Result<(), Error> {
        PointerInputSocket::button(self, name).await
    }
}
