//! Windows Specific OS interface

use crate::{
    cmd,
    cmd::ShellCommand,
    parse::netadapter::{self, quote},
    Error, NetworkInterface,
};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Runs a PowerShell snippet without loading the user's profile
macro_rules! powershell {
    ($script:expr) => {
        cmd!(
            "powershell",
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            $script
        )
    };
}

/// Lists all network adapters with their IPv4 addresses
pub fn list_interfaces() -> Result<Vec<NetworkInterface>, Error> {
    let json = powershell!(netadapter::QUERY)?;
    netadapter::parse(&json)
}

/// Removes an IP address from a network adapter
///
/// # Arguments
/// * `device_name` - Name of the adapter (e.g. `Ethernet`, `Ethernet 2`)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.1/32`)
pub fn remove_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    let script = format!(
        "Remove-NetIPAddress -InterfaceAlias {} -IPAddress {} -PrefixLength {} -Confirm:$false",
        quote(device_name),
        ip.ip(),
        ip.prefix()
    );
    powershell!(script)?;
    Ok(())
}

/// Assigns an IP address to a network adapter
///
/// # Arguments
/// * `device_name` - Name of the adapter (e.g. `Ethernet`, `Ethernet 2`)
/// * `ip` - IPv4 address and netmask (e.g. `192.168.0.2/24`)
pub fn add_address(device_name: &str, ip: Ipv4Network) -> Result<(), Error> {
    let script = format!(
        "New-NetIPAddress -InterfaceAlias {} -IPAddress {} -PrefixLength {} | Out-Null",
        quote(device_name),
        ip.ip(),
        ip.prefix()
    );
    powershell!(script)?;
    Ok(())
}

/// Pings `ip` `count` times, returning whatever ping printed
pub fn probe(ip: Ipv4Addr, count: u32) -> Result<String, Error> {
    let mut ping = ShellCommand::new("ping");
    ping.arg("-n");
    ping.arg(count.to_string());
    ping.arg(ip.to_string());
    Ok(ping.capture()?)
}
