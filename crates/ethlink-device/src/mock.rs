//! In-memory `NetOps` for tests
//!
//! Keeps an interface table that add/remove calls really mutate, records every call, and can
//! change link states after a given number of inventory queries (e.g. "the cable gets plugged in
//! after the first listing").  Like the real tools, adding an existing address or removing a
//! missing one is an error.

use crate::{Error, LinkStatus, NetOps, NetworkInterface, ShellCommandError};
use ipnetwork::Ipv4Network;
use std::{cell::RefCell, io, net::Ipv4Addr};

/// A call made against the mock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List,
    Remove(String, Ipv4Network),
    Add(String, Ipv4Network),
    Probe(Ipv4Addr),
}

struct StatusChange {
    after: usize,
    name: String,
    status: LinkStatus,
}

#[derive(Default)]
struct State {
    interfaces: Vec<NetworkInterface>,
    calls: Vec<Call>,
    queries: usize,
    changes: Vec<StatusChange>,
    fail_mutations: bool,
}

pub struct MockNetOps {
    state: RefCell<State>,
    probe_output: String,
}

impl MockNetOps {
    /// Creates a mock whose interface table starts as `interfaces`
    pub fn new(interfaces: Vec<NetworkInterface>) -> Self {
        Self {
            state: RefCell::new(State {
                interfaces,
                ..State::default()
            }),
            probe_output: String::from("4 packets transmitted, 4 received, 0% packet loss\n"),
        }
    }

    /// Sets the text returned by every probe
    pub fn with_probe_output(mut self, output: impl Into<String>) -> Self {
        self.probe_output = output.into();
        self
    }

    /// Changes the status of `name` once `after` inventory queries have completed
    pub fn change_status_after(&self, after: usize, name: impl Into<String>, status: LinkStatus) {
        self.state.borrow_mut().changes.push(StatusChange {
            after,
            name: name.into(),
            status,
        });
    }

    /// Makes every subsequent add/remove fail with a permission error
    pub fn fail_mutations(&self) {
        self.state.borrow_mut().fail_mutations = true;
    }

    /// Returns the current state of one interface
    pub fn interface(&self, name: &str) -> Option<NetworkInterface> {
        self.state
            .borrow()
            .interfaces
            .iter()
            .find(|i| i.name() == name)
            .cloned()
    }

    /// Returns every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Number of add-address calls made so far
    pub fn adds(&self) -> usize {
        self.count(|c| matches!(c, Call::Add(..)))
    }

    /// Number of remove-address calls made so far
    pub fn removes(&self) -> usize {
        self.count(|c| matches!(c, Call::Remove(..)))
    }

    /// Number of probes made so far
    pub fn probes(&self) -> usize {
        self.count(|c| matches!(c, Call::Probe(_)))
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| f(*c)).count()
    }

    /// Records a mutation, then applies `f` to the interface's address list
    fn mutate<F>(&self, call: Call, interface: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Vec<Ipv4Network>) -> Result<(), Error>,
    {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);

        if state.fail_mutations {
            return Err(Error::Shell(ShellCommandError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "operation not permitted",
            ))));
        }

        let iface = state
            .interfaces
            .iter_mut()
            .find(|i| i.name() == interface)
            .ok_or_else(|| Error::Inventory(format!("cannot find device \"{}\"", interface)))?;
        f(iface.addresses_mut())
    }
}

impl NetOps for MockNetOps {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::List);

        let queries = state.queries;
        let due: Vec<(String, LinkStatus)> = state
            .changes
            .iter()
            .filter(|c| c.after == queries)
            .map(|c| (c.name.clone(), c.status))
            .collect();
        for (name, status) in due {
            if let Some(iface) = state.interfaces.iter_mut().find(|i| i.name() == name) {
                iface.set_status(status);
            }
        }

        state.queries += 1;
        Ok(state.interfaces.clone())
    }

    fn remove_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error> {
        self.mutate(
            Call::Remove(interface.to_string(), address),
            interface,
            |addresses| {
                let before = addresses.len();
                addresses.retain(|a| *a != address);
                match addresses.len() == before {
                    true => Err(Error::Inventory(format!("{} is not assigned", address))),
                    false => Ok(()),
                }
            },
        )
    }

    fn add_address(&self, interface: &str, address: Ipv4Network) -> Result<(), Error> {
        self.mutate(
            Call::Add(interface.to_string(), address),
            interface,
            |addresses| {
                if addresses.contains(&address) {
                    return Err(Error::Inventory(format!("{} already exists", address)));
                }
                addresses.push(address);
                Ok(())
            },
        )
    }

    fn probe(&self, address: Ipv4Addr) -> Result<String, Error> {
        self.state.borrow_mut().calls.push(Call::Probe(address));
        Ok(self.probe_output.clone())
    }
}
