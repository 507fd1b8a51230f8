//! Address reconciliation for the selected interface
//!
//! Two independent, idempotent steps:
//! 1. remove any address that collides with the target device's own address
//! 2. bind the host's address unless it is already bound
//!
//! Each step re-reads the inventory instead of trusting an earlier snapshot.  Failures are not
//! rolled back.

use crate::{interface, Error, NetOps, NetworkInterface};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// What the assignment step did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// The address was bound by this run
    Added,

    /// The address was already bound, nothing was changed
    AlreadyPresent,
}

/// Combined result of both reconciliation steps
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    /// Conflicting addresses that were unbound
    pub removed: Vec<Ipv4Network>,

    /// Outcome of binding the host address
    pub assignment: Assignment,
}

/// Takes a fresh snapshot of a single interface
fn snapshot(ops: &dyn NetOps, name: &str) -> Result<NetworkInterface, Error> {
    let inventory = ops.list_interfaces()?;
    interface::find(&inventory, name)
        .cloned()
        .ok_or_else(|| Error::InterfaceVanished(name.to_string()))
}

/// Unbinds every address on `interface` equal to `conflict`, whatever its prefix length
///
/// Removing nothing is a success.
///
/// # Arguments
/// * `ops` - OS seam
/// * `interface` - Name of the selected interface
/// * `conflict` - Address owned by the target device
///
/// # Errors
/// * `Error::InterfaceVanished` - If the interface is no longer listed
/// * Any OS error from querying or removing
pub fn remove_conflicts(
    ops: &dyn NetOps,
    interface: &str,
    conflict: Ipv4Addr,
) -> Result<Vec<Ipv4Network>, Error> {
    let iface = snapshot(ops, interface)?;
    let conflicts = iface.addresses_for(conflict);

    if conflicts.is_empty() {
        tracing::debug!(interface, %conflict, "no conflicting addresses");
    }

    for address in &conflicts {
        ops.remove_address(interface, *address)?;
    }

    Ok(conflicts)
}

/// Binds `target` to `interface` if that exact address and prefix length isn't bound yet
///
/// # Arguments
/// * `ops` - OS seam
/// * `interface` - Name of the selected interface
/// * `target` - Host address and prefix length (e.g. `192.168.0.2/24`)
///
/// # Errors
/// * `Error::InterfaceVanished` - If the interface is no longer listed
/// * Any OS error from querying or adding
pub fn assign_address(
    ops: &dyn NetOps,
    interface: &str,
    target: Ipv4Network,
) -> Result<Assignment, Error> {
    let iface = snapshot(ops, interface)?;

    if iface.has_address(target) {
        tracing::debug!(interface, %target, "address already assigned");
        return Ok(Assignment::AlreadyPresent);
    }

    ops.add_address(interface, target)?;
    Ok(Assignment::Added)
}

/// Runs both reconciliation steps back to back
///
/// # Arguments
/// * `ops` - OS seam
/// * `interface` - Name of the selected interface
/// * `conflict` - Address owned by the target device
/// * `target` - Host address and prefix length
pub fn reconcile(
    ops: &dyn NetOps,
    interface: &str,
    conflict: Ipv4Addr,
    target: Ipv4Network,
) -> Result<Reconciliation, Error> {
    let removed = remove_conflicts(ops, interface, conflict)?;
    let assignment = assign_address(ops, interface, target)?;
    Ok(Reconciliation {
        removed,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{Call, MockNetOps},
        LinkStatus, ShellCommandError,
    };

    const DEVICE: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    fn host() -> Ipv4Network {
        net("192.168.0.2/24")
    }

    fn ethernet() -> NetworkInterface {
        NetworkInterface::new("Ethernet", LinkStatus::Up)
    }

    fn addresses(ops: &MockNetOps) -> Vec<Ipv4Network> {
        ops.interface("Ethernet").unwrap().addresses().to_vec()
    }

    #[test]
    fn clean_interface_gets_host_address() -> Result<(), Error> {
        let ops = MockNetOps::new(vec![ethernet()]);

        let result = reconcile(&ops, "Ethernet", DEVICE, host())?;
        assert!(result.removed.is_empty());
        assert_eq!(result.assignment, Assignment::Added);
        assert_eq!(addresses(&ops), vec![host()]);
        Ok(())
    }

    #[test]
    fn existing_host_address_is_not_added_again() -> Result<(), Error> {
        let ops = MockNetOps::new(vec![ethernet().with_address(host())]);

        let result = reconcile(&ops, "Ethernet", DEVICE, host())?;
        assert_eq!(result.assignment, Assignment::AlreadyPresent);
        assert_eq!(ops.adds(), 0, "no add-address call expected");
        assert_eq!(addresses(&ops), vec![host()]);
        Ok(())
    }

    #[test]
    fn stale_conflict_is_removed_once_before_assignment() -> Result<(), Error> {
        let stale = net("192.168.0.1/32");
        let ops = MockNetOps::new(vec![ethernet().with_address(stale)]);

        let result = reconcile(&ops, "Ethernet", DEVICE, host())?;
        assert_eq!(result.removed, vec![stale]);

        let mutations: Vec<Call> = ops
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List))
            .collect();
        assert_eq!(
            mutations,
            vec![
                Call::Remove("Ethernet".into(), stale),
                Call::Add("Ethernet".into(), host()),
            ]
        );
        assert_eq!(addresses(&ops), vec![host()]);
        Ok(())
    }

    #[test]
    fn every_conflicting_prefix_is_removed() -> Result<(), Error> {
        let other = net("10.0.0.7/8");
        let ops = MockNetOps::new(vec![ethernet()
            .with_address(net("192.168.0.1/24"))
            .with_address(other)
            .with_address(net("192.168.0.1/32"))]);

        let removed = remove_conflicts(&ops, "Ethernet", DEVICE)?;
        assert_eq!(removed.len(), 2);
        assert_eq!(addresses(&ops), vec![other], "unrelated addresses must survive");
        Ok(())
    }

    #[test]
    fn reconcile_is_idempotent() -> Result<(), Error> {
        let ops = MockNetOps::new(vec![ethernet()
            .with_address(net("192.168.0.1/32"))
            .with_address(host())]);

        reconcile(&ops, "Ethernet", DEVICE, host())?;
        let once = addresses(&ops);

        let second = reconcile(&ops, "Ethernet", DEVICE, host())?;
        assert!(second.removed.is_empty());
        assert_eq!(second.assignment, Assignment::AlreadyPresent);
        assert_eq!(addresses(&ops), once);
        assert_eq!(once, vec![host()]);
        Ok(())
    }

    #[test]
    fn different_prefix_is_not_the_host_address() -> Result<(), Error> {
        let ops = MockNetOps::new(vec![ethernet().with_address(net("192.168.0.2/16"))]);

        assert_eq!(assign_address(&ops, "Ethernet", host())?, Assignment::Added);
        assert_eq!(addresses(&ops), vec![net("192.168.0.2/16"), host()]);
        Ok(())
    }

    #[test]
    fn vanished_interface_is_fatal() {
        let ops = MockNetOps::new(vec![ethernet()]);

        let err = reconcile(&ops, "Ethernet 2", DEVICE, host()).unwrap_err();
        assert!(matches!(err, Error::InterfaceVanished(name) if name == "Ethernet 2"));
    }

    #[test]
    fn os_rejection_is_fatal_without_rollback() {
        let ops = MockNetOps::new(vec![ethernet().with_address(net("192.168.0.1/32"))]);
        ops.fail_mutations();

        assert!(matches!(
            reconcile(&ops, "Ethernet", DEVICE, host()),
            Err(Error::Shell(ShellCommandError::Io(_)))
        ));
        assert_eq!(ops.adds(), 0, "assignment must not run after a failed removal");
    }
}
