//! Wake-on-LAN: hardware-address lookup and magic-packet broadcast.
//!
//! A soft-off television still listens on its NIC for a "magic packet":
//! six `0xFF` bytes followed by its MAC repeated sixteen times, broadcast
//! over UDP. The MAC is looked up in the kernel neighbour table unless the
//! caller already knows it.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::Error;

/// Where magic packets go: the limited broadcast address, discard port.
pub const WAKE_BROADCAST: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, 9));

/// Kernel neighbour table (Linux).
const ARP_TABLE: &str = "/proc/net/arp";

/// Time given to the kernel to finish an ARP exchange.
const ARP_SETTLE: Duration = Duration::from_millis(300);

const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

// ── MacAddress ───────────────────────────────────────────────────────

/// A 48-bit link-layer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(self) -> [u8; 6] {
        self.0
    }

    /// The all-zero address the kernel reports for incomplete entries.
    pub fn is_zero(self) -> bool {
        self.0 == [0; 6]
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMac(s.to_owned());
        let mut octets = [0u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for octet in &mut octets {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

// ── Magic packet ─────────────────────────────────────────────────────

/// Build the 102-byte magic packet for `mac`.
pub fn magic_packet(mac: MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFF; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.0);
    }
    packet
}

/// Broadcast a magic packet for `mac` to `target` (normally
/// [`WAKE_BROADCAST`]).
pub async fn send_magic_packet(mac: MacAddress, target: SocketAddr) -> Result<(), Error> {
    let bind: SocketAddr = if target.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((std::net::Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(bind).await?;
    socket.set_broadcast(true)?;
    socket.send_to(&magic_packet(mac), target).await?;
    info!(%mac, %target, "magic packet sent");
    Ok(())
}

// ── Address resolution ───────────────────────────────────────────────

/// Find `ip` in the text of `/proc/net/arp`.
///
/// Format: a header line, then `IP  HW-type  Flags  HW-address  Mask  Device`.
/// Incomplete entries (all-zero address) are skipped.
pub fn parse_arp_table(contents: &str, ip: IpAddr) -> Option<MacAddress> {
    contents.lines().skip(1).find_map(|line| {
        let mut fields = line.split_whitespace();
        let entry_ip: IpAddr = fields.next()?.parse().ok()?;
        if entry_ip != ip {
            return None;
        }
        let mac: MacAddress = fields.nth(2)?.parse().ok()?;
        (!mac.is_zero()).then_some(mac)
    })
}

/// Resolve a host name or address to its link-layer address.
///
/// Reads the neighbour table; if the host is missing, sends one UDP datagram
/// so the kernel performs an ARP exchange, then reads the table again.
pub async fn resolve_mac(host: &str) -> Result<MacAddress, Error> {
    let unresolved = || Error::MacUnresolved {
        host: host.to_owned(),
    };
    let target = neighbour_target(tokio::net::lookup_host((host, 9)).await?)
        .ok_or_else(unresolved)?;

    if let Some(mac) = lookup_neighbour(target.ip()).await? {
        return Ok(mac);
    }

    debug!(%host, "not in neighbour table, triggering ARP");
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).await?;
    // The datagram only exists to trigger ARP; a send failure just means the
    // second lookup comes back empty.
    let _ = socket.send_to(&[0], target).await;
    tokio::time::sleep(ARP_SETTLE).await;

    lookup_neighbour(target.ip()).await?.ok_or_else(unresolved)
}

/// The address to look up: ARP only covers IPv4, so a dual-stack name
/// resolves to its first IPv4 address.
fn neighbour_target(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<SocketAddr> {
    addrs.into_iter().find(SocketAddr::is_ipv4)
}

async fn lookup_neighbour(ip: IpAddr) -> Result<Option<MacAddress>, Error> {
    match tokio::fs::read_to_string(ARP_TABLE).await {
        Ok(contents) => Ok(parse_arp_table(&contents, ip)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ARP: &str = "\
IP address       HW type     Flags       HW address            Mask     Device
192.168.1.1      0x1         0x2         10:20:30:40:50:60     *        wlan0
192.168.1.50     0x1         0x2         A8:23:FE:01:02:03     *        wlan0
192.168.1.77     0x1         0x0         00:00:00:00:00:00     *        wlan0
";

    #[test]
    fn parses_colon_and_dash_forms() {
        let colon: MacAddress = "a8:23:fe:01:02:03".parse().unwrap();
        let dash: MacAddress = "A8-23-FE-01-02-03".parse().unwrap();
        assert_eq!(colon, dash);
        assert_eq!(colon.octets(), [0xa8, 0x23, 0xfe, 0x01, 0x02, 0x03]);
        assert_eq!(colon.to_string(), "a8:23:fe:01:02:03");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "a8:23:fe:01:02", "a8:23:fe:01:02:03:04", "a8:23:fe:01:02:zz", "a823:fe:01:02:03:04"] {
            assert!(bad.parse::<MacAddress>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn deserializes_from_string() {
        let mac: MacAddress = serde_json::from_str("\"a8:23:fe:01:02:03\"").unwrap();
        assert_eq!(mac, MacAddress::new([0xa8, 0x23, 0xfe, 0x01, 0x02, 0x03]));
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }

    #[test]
    fn magic_packet_layout() {
        let mac = MacAddress::new([1, 2, 3, 4, 5, 6]);
        let packet = magic_packet(mac);
        assert_eq!(packet.len(), 102);
        assert_eq!(&packet[..6], &[0xFF; 6]);
        for chunk in packet[6..].chunks(6) {
            assert_eq!(chunk, &[1, 2, 3, 4, 5, 6]);
        }
    }

    #[test]
    fn arp_lookup_finds_host() {
        let mac = parse_arp_table(ARP, "192.168.1.50".parse().unwrap());
        assert_eq!(mac, Some("a8:23:fe:01:02:03".parse().unwrap()));
    }

    #[test]
    fn arp_lookup_skips_incomplete_and_missing() {
        assert_eq!(parse_arp_table(ARP, "192.168.1.77".parse().unwrap()), None);
        assert_eq!(parse_arp_table(ARP, "192.168.1.99".parse().unwrap()), None);
    }

    #[test]
    fn dual_stack_host_uses_ipv4_address() {
        let addrs: Vec<SocketAddr> = vec![
            "[fe80::1]:9".parse().unwrap(),
            "192.168.1.50:9".parse().unwrap(),
            "192.168.1.51:9".parse().unwrap(),
        ];
        assert_eq!(neighbour_target(addrs), Some("192.168.1.50:9".parse().unwrap()));
    }

    #[test]
    fn ipv6_only_host_has_no_neighbour_target() {
        let addrs: Vec<SocketAddr> = vec!["[fe80::1]:9".parse().unwrap()];
        assert_eq!(neighbour_target(addrs), None);
    }

    #[tokio::test]
    async fn magic_packet_reaches_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap();
        let mac = MacAddress::new([0xa8, 0x23, 0xfe, 0x01, 0x02, 0x03]);

        send_magic_packet(mac, target).await.unwrap();

        let mut buf = [0u8; 256];
        let (len, _) = listener.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &magic_packet(mac)[..]);
    }
}
