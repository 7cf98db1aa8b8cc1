// ── Power-on path ──
//
// A powered-off television cannot accept protocol connections, so power-on
// bypasses the pool entirely: resolve the link-layer address, broadcast a
// magic packet. Stateless per press.

use std::future::Future;

use tracing::debug;

use lgremote_api::{Error, MacAddress, wol};
use lgremote_config::TvSettings;

use crate::error::CoreError;

/// Address resolution plus wake-packet transmission.
pub trait WakeService: Send + Sync {
    fn resolve_link_layer_address(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<MacAddress, Error>> + Send;

    fn send_wake_packet(&self, mac: MacAddress) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Neighbour-table lookup and UDP broadcast on the local network.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanWake;

impl WakeService for LanWake {
    async fn resolve_link_layer_address(&self, host: &str) -> Result<MacAddress, Error> {
        wol::resolve_mac(host).await
    }

    async fn send_wake_packet(&self, mac: MacAddress) -> Result<(), Error> {
        wol::send_magic_packet(mac, wol::WAKE_BROADCAST).await
    }
}

/// Wake the television described by `settings`. A configured `mac` skips
/// the address lookup.
pub async fn power_on<W: WakeService>(wake: &W, settings: &TvSettings) -> Result<(), CoreError> {
    let mac = match settings.mac {
        Some(mac) => mac,
        None => wake
            .resolve_link_layer_address(&settings.host)
            .await
            .map_err(|e| CoreError::wake(&settings.name, &e))?,
    };
    debug!(device = %settings.name, %mac, "waking television");
    wake.send_wake_packet(mac)
        .await
        .map_err(|e| CoreError::wake(&settings.name, &e))
}
