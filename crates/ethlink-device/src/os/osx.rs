//! MacOS Specific OS interface

use crate::{cmd, cmd::ShellCommand, parse::ifconfig, Error, NetworkInterface};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Lists all interfaces by parsing `ifconfig`
pub fn list_interfaces() -> Result<Vec<NetworkInterface>, Error> {
    let text = cmd!("ifconfig")?;
    ifconfig::parse(&text)
}

/// Removes an IP address from a network interface
///
/// # Arguments
/// * `device_name` - Name of network device (e.g. `en5`)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.1/32`)
pub fn remove_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    cmd!("ifconfig", device_name, "inet", ip.ip().to_string(), "-alias")?;
    Ok(())
}

/// Assigns an IP address to a network interface
///
/// # Arguments
/// * `device_name` - Name of network device (e.g. `en5`)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.2/24`)
pub fn add_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    cmd!(
        "ifconfig",
        device_name,
        "alias",
        ip.ip().to_string(),
        "netmask",
        ip.mask().to_string()
    )?;
    Ok(())
}

/// Pings `ip` `count` times, returning whatever ping printed
pub fn probe(ip: Ipv4Addr, count: u32) -> Result<String, Error> {
    let mut ping = ShellCommand::new("ping");
    ping.arg("-c");
    ping.arg(count.to_string());
    ping.arg(ip.to_string());
    Ok(ping.capture()?)
}
