//! Network interface snapshot as reported by the operating system

use ipnetwork::Ipv4Network;
use std::{fmt, net::Ipv4Addr};

/// Administrative / link state of a network adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    /// Enabled and a link (carrier) is present
    Up,

    /// Administratively down
    Down,

    /// Enabled but no cable / carrier detected
    Disconnected,

    /// Disabled by the operating system or the user
    Disabled,

    /// Known to the OS but the hardware is missing
    NotPresent,

    /// The OS reported a state we don't recognize
    Unknown,
}

impl LinkStatus {
    pub fn is_up(self) -> bool {
        self == LinkStatus::Up
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkStatus::Up => "Up",
            LinkStatus::Down => "Down",
            LinkStatus::Disconnected => "Disconnected",
            LinkStatus::Disabled => "Disabled",
            LinkStatus::NotPresent => "Not Present",
            LinkStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A network adapter at the moment the inventory was taken
///
/// Snapshots are never cached; every consumer re-reads the inventory through
/// [`NetOps::list_interfaces`](crate::NetOps::list_interfaces) when it needs fresh state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkInterface {
    /// OS name of the adapter (e.g. `eth0`, `Ethernet 2`, `en5`)
    name: String,

    /// Link state at query time
    status: LinkStatus,

    /// IPv4 addresses (with prefix length) bound to the adapter
    addresses: Vec<Ipv4Network>,
}

impl NetworkInterface {
    /// Creates a new snapshot with no addresses bound
    ///
    /// # Arguments
    /// * `name` - Name of the interface as the OS reports it
    /// * `status` - Link state of the interface
    pub fn new(name: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            name: name.into(),
            status,
            addresses: Vec::new(),
        }
    }

    /// Adds a bound IPv4 address to this snapshot
    ///
    /// # Arguments
    /// * `address` - IPv4 address and prefix length (e.g. `192.168.0.2/24`)
    pub fn with_address(mut self, address: Ipv4Network) -> Self {
        self.addresses.push(address);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn addresses(&self) -> &[Ipv4Network] {
        &self.addresses
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    /// Returns true if exactly this address and prefix length is bound
    pub fn has_address(&self, address: Ipv4Network) -> bool {
        self.addresses.iter().any(|net| *net == address)
    }

    /// Returns every bound network whose address equals `ip`, whatever its prefix length
    pub fn addresses_for(&self, ip: Ipv4Addr) -> Vec<Ipv4Network> {
        self.addresses
            .iter()
            .filter(|net| net.ip() == ip)
            .copied()
            .collect()
    }

    #[cfg(any(test, feature = "mock"))]
    pub(crate) fn set_status(&mut self, status: LinkStatus) {
        self.status = status;
    }

    #[cfg(any(test, feature = "mock"))]
    pub(crate) fn addresses_mut(&mut self) -> &mut Vec<Ipv4Network> {
        &mut self.addresses
    }
}

/// Finds the interface named exactly `name` in an inventory snapshot
///
/// Matching is exact and case-sensitive; no prefix or fuzzy matching is performed.
pub fn find<'a>(inventory: &'a [NetworkInterface], name: &str) -> Option<&'a NetworkInterface> {
    inventory.iter().find(|iface| iface.name == name)
}
