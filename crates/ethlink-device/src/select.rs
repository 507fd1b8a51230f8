//! Operator interface selection

use crate::{interface, LinkStatus, NetworkInterface};
use thiserror::Error;

/// Why an operator supplied interface name was rejected
///
/// Both kinds are recoverable: the caller reports them and asks again.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No interface has exactly this name (likely a typo)
    #[error("no interface named '{0}' was found, check the spelling against the list above")]
    NotFound(String),

    /// The interface exists but has no link (likely not cabled)
    #[error("interface '{name}' exists but is not Up (status: {status}), is the cable plugged in?")]
    NotUp { name: String, status: LinkStatus },
}

/// Validates an operator supplied interface name against an inventory snapshot
///
/// The name must match exactly (case-sensitive, no prefix matching) and the interface must be
/// `Up` at the time of the snapshot.
///
/// # Arguments
/// * `inventory` - Fresh interface snapshot
/// * `candidate` - Name typed by the operator
///
/// # Errors
/// * `SelectionError::NotFound` - If no interface is named `candidate`
/// * `SelectionError::NotUp` - If the interface exists but its status isn't `Up`
pub fn validate_selection(
    inventory: &[NetworkInterface],
    candidate: &str,
) -> Result<NetworkInterface, SelectionError> {
    let iface = interface::find(inventory, candidate)
        .ok_or_else(|| SelectionError::NotFound(candidate.to_string()))?;

    if !iface.is_up() {
        return Err(SelectionError::NotUp {
            name: iface.name().to_string(),
            status: iface.status(),
        });
    }

    Ok(iface.clone())
}
