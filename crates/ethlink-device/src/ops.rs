//! Operating system seam for interface inventory, address mutation, and reachability probes

#[cfg_attr(target_os = "linux", path = "os/linux.rs")]
#[cfg_attr(target_os = "windows", path = "os/windows.rs")]
#[cfg_attr(target_os = "macos", path = "os/osx.rs")]
mod os;

use crate::{Error, NetworkInterface};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Number of echo requests sent by a reachability probe
///
/// Fixed so the probe terminates on every platform (`ping` on unix never stops on its own).
pub const PROBE_COUNT: u32 = 4;

/// Everything the workflow needs from the host's network stack
///
/// Implementations must not cache: each call reflects the OS state at the time of the call.
pub trait NetOps {
    /// Returns a fresh snapshot of every network interface, in the order the OS lists them
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, Error>;

    /// Unbinds an IPv4 address from an interface
    ///
    /// # Arguments
    /// * `interface` - Name of the interface
    /// * `address` - Address and prefix length as currently bound
    fn remove_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error>;

    /// Binds an IPv4 address to an interface
    ///
    /// Callers must check the address isn't already present; the OS rejects duplicates.
    ///
    /// # Arguments
    /// * `interface` - Name of the interface
    /// * `address` - Address and prefix length to bind (e.g. `192.168.0.2/24`)
    fn add_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error>;

    /// Sends [`PROBE_COUNT`] ICMP echo requests and returns the human readable result verbatim
    ///
    /// Packet loss is not an error; only failing to run the probe is.
    fn probe(&self, address: Ipv4Addr) -> Result<String, Error>;
}

/// `NetOps` backed by the host's own tooling (`ip`, PowerShell, or `ifconfig`)
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemNetOps;

impl NetOps for SystemNetOps {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, Error> {
        os::list_interfaces()
    }

    fn remove_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error> {
        tracing::info!(interface, %address, "removing address");
        os::remove_address(interface, address)
    }

    fn add_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error> {
        tracing::info!(interface, %address, "assigning address");
        os::add_address(interface, address)
    }

    fn probe(&self, address: Ipv4Addr) -> Result<String, Error> {
        tracing::info!(%address, count = PROBE_COUNT, "probing");
        os::probe(address, PROBE_COUNT)
    }
}
