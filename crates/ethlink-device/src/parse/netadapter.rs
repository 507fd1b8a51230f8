//! Windows `Get-NetAdapter` / `Get-NetIPAddress` inventory parser
//!
//! Expects the JSON produced by [`QUERY`], which flattens each adapter into
//! `{ Name, Status, Addresses: [{ IPAddress, PrefixLength }] }`.

use crate::{Error, LinkStatus, NetworkInterface};
use ipnetwork::Ipv4Network;
use serde::Deserialize;
use std::net::Ipv4Addr;

/// PowerShell pipeline that prints the adapter inventory as JSON
pub const QUERY: &str = "\
ConvertTo-Json -Depth 4 -InputObject @(Get-NetAdapter | ForEach-Object { \
[pscustomobject]@{ \
Name = $_.Name; \
Status = [string]$_.Status; \
Addresses = @(Get-NetIPAddress -InterfaceIndex $_.ifIndex -AddressFamily IPv4 -ErrorAction SilentlyContinue | \
ForEach-Object { [pscustomobject]@{ IPAddress = $_.IPAddress; PrefixLength = [int]$_.PrefixLength } }) \
} })";

/// `ConvertTo-Json` collapses single element arrays into a bare object on some PowerShell versions
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Adapter {
    name: String,
    status: String,
    #[serde(default)]
    addresses: Option<OneOrMany<Address>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    #[serde(rename = "IPAddress")]
    ip_address: String,
    prefix_length: u8,
}

/// Maps a `Get-NetAdapter` `Status` string onto a link status
pub fn link_status(status: &str) -> LinkStatus {
    match status {
        "Up" => LinkStatus::Up,
        "Down" => LinkStatus::Down,
        "Disconnected" => LinkStatus::Disconnected,
        "Disabled" => LinkStatus::Disabled,
        "Not Present" => LinkStatus::NotPresent,
        _ => LinkStatus::Unknown,
    }
}

/// Parses the JSON printed by running [`QUERY`]
///
/// # Arguments
/// * `json` - Raw stdout of the PowerShell query
///
/// # Errors
/// * `Error::Json` - If the output isn't the expected JSON shape
/// * `Error::Inventory` - If an address or prefix length is invalid
pub fn parse(json: &str) -> Result<Vec<NetworkInterface>, Error> {
    // no adapters at all prints nothing
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let adapters: OneOrMany<Adapter> = serde_json::from_str(json)?;

    adapters
        .into_vec()
        .into_iter()
        .map(|adapter| {
            let mut iface = NetworkInterface::new(adapter.name, link_status(&adapter.status));
            let addresses = adapter.addresses.unwrap_or_default().into_vec();

            for addr in addresses {
                let ip: Ipv4Addr = addr.ip_address.parse().map_err(|_| {
                    Error::Inventory(format!(
                        "invalid ipv4 address '{}' on {}",
                        addr.ip_address,
                        iface.name()
                    ))
                })?;
                let net = Ipv4Network::new(ip, addr.prefix_length)
                    .map_err(|error| Error::Inventory(format!("{} on {}", error, iface.name())))?;
                iface = iface.with_address(net);
            }

            Ok(iface)
        })
        .collect()
}

/// Quotes a value for use inside a single-quoted PowerShell string
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
