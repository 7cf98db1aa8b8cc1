// ── Remote ──
//
// Single dispatch entry point. One call, one command: resolve the façade
// (or the wake path), run the command, hand any failure back as a
// `CoreError`. Deciding what to do with the error is the caller's job.

use std::sync::Arc;

use tracing::debug;

use lgremote_config::Settings;

use crate::command::Command;
use crate::error::CoreError;
use crate::pool::ConnectionPool;
use crate::session::Connector;
use crate::wake::{self, WakeService};

/// Settings, the connection pool, and the wake service for one process.
pub struct Remote<C: Connector, W: WakeService> {
    settings: Arc<Settings>,
    pool: ConnectionPool<C>,
    wake: W,
}

impl<C: Connector, W: WakeService> Remote<C, W> {
    pub fn new(settings: Settings, connector: C, wake: W) -> Self {
        let settings = Arc::new(settings);
        Self {
            pool: ConnectionPool::new(Arc::clone(&settings), connector),
            settings,
            wake,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &ConnectionPool<C> {
        &self.pool
    }

    /// Run `command` against `device`.
    pub async fn invoke(&self, device: &str, command: &Command) -> Result<(), CoreError> {
        debug!(device, %command, "invoking");
        let Some(capability) = command.capability() else {
            return wake::power_on(&self.wake, self.settings.get(device)?).await;
        };

        let facade = self.pool.facade(device, capability).await?;
        facade
            .invoke(command)
            .await
            .map_err(|e| CoreError::command(device, command.name(), &e))
    }
}
