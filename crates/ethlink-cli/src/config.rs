//! Ethlink Link Addressing
//!
//! The link is statically addressed; nothing here is read from disk or the environment.

use ipnetwork::{IpNetworkError, Ipv4Network};
use std::net::Ipv4Addr;

/// Address the host takes on the link
pub const HOST_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 2);

/// Address the target device takes on the link
pub const DEVICE_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

/// Prefix length shared by both ends
pub const LINK_PREFIX: u8 = 24;

/// Name of the target device's Ethernet interface, used in the operator instructions
pub const DEVICE_INTERFACE: &str = "eth0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    /// Host side address and prefix (`192.168.0.2/24`)
    pub host: Ipv4Network,

    /// Device side address and prefix (`192.168.0.1/24`)
    pub device: Ipv4Network,

    /// Address that must never remain bound to the host's interface
    pub conflict: Ipv4Addr,

    /// Device interface named in the remote instructions
    pub device_interface: String,
}

impl LinkConfig {
    /// Builds the fixed link addressing
    ///
    /// # Errors
    /// * If the compiled-in prefix length is invalid
    pub fn new() -> Result<Self, IpNetworkError> {
        Ok(Self {
            host: Ipv4Network::new(HOST_ADDRESS, LINK_PREFIX)?,
            device: Ipv4Network::new(DEVICE_ADDRESS, LINK_PREFIX)?,
            conflict: DEVICE_ADDRESS,
            device_interface: DEVICE_INTERFACE.to_string(),
        })
    }
}
