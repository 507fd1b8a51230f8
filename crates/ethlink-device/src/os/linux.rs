//! Linux Specific OS interface

use crate::{cmd, cmd::ShellCommand, parse::iproute, Error, NetworkInterface};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Lists all interfaces using iproute2's JSON output
pub fn list_interfaces() -> Result<Vec<NetworkInterface>, Error> {
    let json = cmd!("ip", "-json", "address", "show")?;
    iproute::parse(&json)
}

/// Removes an IP address from a network interface
///
/// # Arguments
/// * `device_name` - Name of network device (e.g. `eth0`, `enp3s0`, etc.)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.1/32`)
pub fn remove_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    cmd!("ip", "address", "del", ip.to_string(), "dev", device_name)?;
    Ok(())
}

/// Assigns an IP address to a network interface
///
/// # Arguments
/// * `device_name` - Name of network device (e.g. `eth0`, `enp3s0`, etc.)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.2/24`)
pub fn add_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    cmd!("ip", "address", "add", ip.to_string(), "dev", device_name)?;
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
