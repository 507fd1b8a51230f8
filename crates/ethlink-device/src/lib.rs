//! Ethlink Device Library
//!
//! Observes and configures the host network adapter that carries a dedicated, point-to-point
//! Ethernet link to a target device.  All operating system access goes through the [`NetOps`]
//! trait so the selection and reconciliation logic can be exercised without touching the real
//! interface table.

mod cmd;
pub mod interface;
pub mod ops;
pub mod parse {
    //! Inventory parsers for each supported platform's tooling

    pub mod ifconfig;
    pub mod iproute;
    pub mod netadapter;
}
pub mod reconcile;
pub mod select;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cmd::ShellCommandError;
pub use interface::{LinkStatus, NetworkInterface};
pub use ops::{NetOps, SystemNetOps, PROBE_COUNT};
pub use reconcile::{assign_address, reconcile, remove_conflicts, Assignment, Reconciliation};
pub use select::{validate_selection, SelectionError};

/// A failure of an operating system query, mutation, or probe
///
/// None of these are retried; they abort the run and leave the operator to diagnose the host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run command: {0}")]
    Shell(#[from] ShellCommandError),

    #[error("failed to decode interface inventory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed interface inventory: {0}")]
    Inventory(String),

    #[error("interface {0} is no longer present")]
    InterfaceVanished(String),
}
