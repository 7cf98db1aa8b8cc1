// ── Connection pool ──
//
// Process-wide cache of sessions (one per device) and façades (one per
// device and capability). Both are created on first use and live until
// process exit: no eviction, no reconnection.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use lgremote_config::{Settings, TvSettings};

use crate::capability::Capability;
use crate::error::CoreError;
use crate::facade::Facade;
use crate::session::{Connector, Session};

type FacadeKey = (String, Capability);

/// Lazily connected sessions and façades, keyed by device name.
pub struct ConnectionPool<C: Connector> {
    connector: C,
    settings: Arc<Settings>,
    sessions: Mutex<HashMap<String, Arc<C::Session>>>,
    facades: Mutex<HashMap<FacadeKey, Arc<Facade<C::Session>>>>,
}

impl<C: Connector> ConnectionPool<C> {
    pub fn new(settings: Arc<Settings>, connector: C) -> Self {
        Self {
            connector,
            settings,
            sessions: Mutex::new(HashMap::new()),
            facades: Mutex::new(HashMap::new()),
        }
    }

    /// The session for `device`, connecting on first use.
    ///
    /// The cache lock is held across the connect, so concurrent first
    /// callers still produce a single session. A failed connect caches
    /// nothing; the next call tries again.
    pub async fn session(&self, device: &str) -> Result<Arc<C::Session>, CoreError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(device) {
            return Ok(Arc::clone(session));
        }

        let settings = self.settings.get(device)?;
        debug!(device, host = %settings.host, "opening session");
        let session = self
            .connector
            .connect(settings)
            .await
            .map_err(|e| CoreError::connection(device, &e))?;
        self.remember_client_key(settings, &session);

        let session = Arc::new(session);
        sessions.insert(device.to_owned(), Arc::clone(&session));
        info!(device, "session established");
        Ok(session)
    }

    /// The façade for `(device, capability)`, building it (and the session
    /// under it) on first use.
    pub async fn facade(
        &self,
        device: &str,
        capability: Capability,
    ) -> Result<Arc<Facade<C::Session>>, CoreError> {
        let mut facades = self.facades.lock().await;
        let key = (device.to_owned(), capability);
        if let Some(facade) = facades.get(&key) {
            return Ok(Arc::clone(facade));
        }

        let session = self.session(device).await?;
        let facade = Facade::build(capability, session)
            .await
            .map_err(|e| CoreError::connection(device, &e))?;

        let facade = Arc::new(facade);
        facades.insert(key, Arc::clone(&facade));
        debug!(device, %capability, "facade constructed");
        Ok(facade)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Number of constructed façades, across all devices.
    pub async fn facade_count(&self) -> usize {
        self.facades.lock().await.len()
    }

    /// Save a client key the television just issued, so later runs skip
    /// the pairing prompt. Failure only costs a prompt next time.
    fn remember_client_key(&self, settings: &TvSettings, session: &C::Session) {
        let Some(issued) = session.client_key() else {
            return;
        };
        let known = settings.client_key.as_ref().map(ExposeSecret::expose_secret);
        if known == Some(issued.expose_secret()) {
            return;
        }
        match self.settings.persist_client_key(&settings.name, issued) {
            Ok(()) => info!(device = %settings.name, "paired; client key saved"),
            Err(e) => warn!(
                device = %settings.name,
                error = %e,
                "paired, but the client key could not be saved"
            ),
        }
    }
}
