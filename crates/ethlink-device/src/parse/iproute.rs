//! iproute2 (`ip -json address show`) inventory parser

use crate::{Error, LinkStatus, NetworkInterface};
use ipnetwork::Ipv4Network;
use serde::Deserialize;
use std::net::Ipv4Addr;

#[derive(Debug, Deserialize)]
struct Link {
    /// `ip` emits empty objects for links filtered out mid-dump, so the name is optional
    ifname: Option<String>,

    #[serde(default)]
    flags: Vec<String>,

    operstate: Option<String>,

    #[serde(default)]
    addr_info: Vec<AddrInfo>,
}

#[derive(Debug, Deserialize)]
struct AddrInfo {
    family: String,
    local: Option<String>,
    prefixlen: Option<u8>,
}

/// Derives the link status from the interface flags and kernel operstate
///
/// # Arguments
/// * `flags` - Interface flags (e.g. `UP`, `LOWER_UP`, `NO-CARRIER`)
/// * `operstate` - RFC 2863 operational state reported by the kernel
pub fn link_status(flags: &[String], operstate: Option<&str>) -> LinkStatus {
    let has = |flag: &str| flags.iter().any(|f| f == flag);

    if !has("UP") {
        return LinkStatus::Down;
    }

    match operstate {
        _ if has("NO-CARRIER") => LinkStatus::Disconnected,
        Some("DOWN") | Some("LOWERLAYERDOWN") => LinkStatus::Disconnected,
        Some("NOTPRESENT") => LinkStatus::NotPresent,
        Some("UP") => LinkStatus::Up,
        _ if has("LOWER_UP") => LinkStatus::Up,
        _ => LinkStatus::Unknown,
    }
}

/// Parses the JSON printed by `ip -json address show`
///
/// Only IPv4 (`inet`) addresses are kept.  Interfaces are returned in the order the kernel
/// listed them.
///
/// # Arguments
/// * `json` - Raw stdout of the `ip` command
///
/// # Errors
/// * `Error::Json` - If the output isn't the expected JSON shape
/// * `Error::Inventory` - If an address or prefix length is invalid
pub fn parse(json: &str) -> Result<Vec<NetworkInterface>, Error> {
    let links: Vec<Link> = serde_json::from_str(json)?;

    let mut interfaces = Vec::with_capacity(links.len());
    for link in links {
        let name = match link.ifname {
            Some(name) => name,
            None => continue,
        };

        let status = link_status(&link.flags, link.operstate.as_deref());
        let mut iface = NetworkInterface::new(name, status);

        for addr in link.addr_info.into_iter().filter(|a| a.family == "inet") {
            let (local, prefix) = match (addr.local, addr.prefixlen) {
                (Some(local), Some(prefix)) => (local, prefix),
                _ => continue,
            };

            let ip: Ipv4Addr = local.parse().map_err(|_| {
                Error::Inventory(format!("invalid ipv4 address '{}' on {}", local, iface.name()))
            })?;
            let net = Ipv4Network::new(ip, prefix)
                .map_err(|error| Error::Inventory(format!("{} on {}", error, iface.name())))?;
            iface = iface.with_address(net);
        }

        interfaces.push(iface);
    }

    Ok(interfaces)
}
