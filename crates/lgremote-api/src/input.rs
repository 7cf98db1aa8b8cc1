//! Pointer-input socket: the second websocket that carries navigation
//! buttons (`UP`, `HOME`, `ENTER`...) as plain-text frames.

use std::fmt;
use std::time::Duration;

use futures_util::SinkExt;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};
use url::Url;

use crate::client::{WsStream, open_socket, with_timeout};
use crate::error::Error;
use crate::ssap;

/// Connected pointer-input channel. Obtained from
/// [`WebOsClient::pointer_input`](crate::WebOsClient::pointer_input).
pub struct PointerInputSocket {
    socket: Mutex<WsStream>,
    timeout: Duration,
}

impl fmt::Debug for PointerInputSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerInputSocket")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PointerInputSocket {
    pub(crate) async fn connect(url: &Url, timeout: Duration) -> Result<Self, Error> {
        info!(%url, "opening pointer input socket");
        let socket = open_socket(url, timeout).await?;
        Ok(Self {
            socket: Mutex::new(socket),
            timeout,
        })
    }

    /// Press a named button. The television does not acknowledge these.
    pub async fn button(&self, name: &str) -> Result<(), Error> {
        let mut socket = self.socket.lock().await;
        debug!(button = name, "sending pointer button");
        with_timeout(self.timeout, async {
            socket
                .send(Message::text(ssap::button_frame(name)))
                .await
                .map_err(Error::from)
        })
        .await
    }
}
