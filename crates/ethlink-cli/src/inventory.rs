//! Interface inventory rendering

use crate::operator::Operator;
use ethlink_device::{Error, NetOps, NetworkInterface};

/// Formats one line per interface: name, status, and IPv4 addresses in CIDR form
///
/// Rows keep the order the OS listed them in so the operator can compare listings taken before
/// and after plugging in the cable.
pub fn render(inventory: &[NetworkInterface]) -> Vec<String> {
    let width = inventory
        .iter()
        .map(|iface| iface.name().chars().count())
        .max()
        .unwrap_or(0);

    inventory
        .iter()
        .map(|iface| {
            let addresses = match iface.addresses() {
                [] => String::from("-"),
                nets => nets
                    .iter()
                    .map(|net| net.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            };

            format!(
                "  {:<width$}  {:<12}  {}",
                iface.name(),
                iface.status().to_string(),
                addresses,
                width = width
            )
        })
        .collect()
}

/// Takes a fresh inventory snapshot and shows it to the operator
///
/// # Errors
/// * If the OS query fails
pub fn show(ops: &dyn NetOps, operator: &mut dyn Operator) -> Result<Vec<NetworkInterface>, Error> {
    let inventory = ops.list_interfaces()?;
    tracing::debug!(count = inventory.len(), "listed interfaces");

    if inventory.is_empty() {
        operator.say("  (no network interfaces reported)");
    }

    for line in render(&inventory) {
        operator.say(&line);
    }

    Ok(inventory)
}
