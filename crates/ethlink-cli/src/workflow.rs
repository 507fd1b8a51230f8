//! Guided link setup
//!
//! Runs strictly in order; every stage that changes or inspects the host ends with an operator
//! gate so nothing mutating happens before the operator has looked at the previous result.

use crate::{config::LinkConfig, gate, inventory, operator::Operator, selector};
use color_eyre::eyre::{self, WrapErr};
use ethlink_device::{
    assign_address, remove_conflicts, Assignment, NetOps, NetworkInterface, Reconciliation,
};
use std::fmt;

/// Workflow stages, in the only order they can run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    InventoryShown,
    CablePrompted,
    InventoryShownAgain,
    InterfaceSelected,
    ConflictsRemoved,
    AddressAssigned,
    AddressVerifiedVisually,
    RemoteStepsAcknowledged,
    Probed,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::InventoryShown,
        Stage::CablePrompted,
        Stage::InventoryShownAgain,
        Stage::InterfaceSelected,
        Stage::ConflictsRemoved,
        Stage::AddressAssigned,
        Stage::AddressVerifiedVisually,
        Stage::RemoteStepsAcknowledged,
        Stage::Probed,
        Stage::Done,
    ];

    /// 1-based position of this stage
    pub fn number(self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::InventoryShown => "Current network interfaces",
            Stage::CablePrompted => "Connect the cable",
            Stage::InventoryShownAgain => "Network interfaces after cabling",
            Stage::InterfaceSelected => "Select the interface",
            Stage::ConflictsRemoved => "Remove conflicting addresses",
            Stage::AddressAssigned => "Assign the host address",
            Stage::AddressVerifiedVisually => "Verify the host address",
            Stage::RemoteStepsAcknowledged => "Configure the device",
            Stage::Probed => "Test the link",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Stage::ALL.len(), self.title())
    }
}

/// What a completed run did
#[derive(Debug)]
pub struct Outcome {
    /// The interface chosen by the operator, as it was when validated
    pub interface: NetworkInterface,

    pub reconciliation: Reconciliation,

    /// Raw probe output, as shown to the operator
    pub probe: String,
}

/// Builds the title box shown when the workflow starts
pub fn banner(title: &str) -> String {
    let width = title.chars().count() + 2;
    format!(
        "┏{bar}┓\n┃ {title} ┃\n┗{bar}┛",
        bar = "━".repeat(width),
        title = title
    )
}

/// Instructions the operator carries out on the device itself
///
/// The tool never talks to the device; it only waits for the operator to confirm each one.
pub fn remote_steps(cfg: &LinkConfig) -> [String; 4] {
    [
        String::from(
            "On the device, open a terminal (attach a keyboard and screen, or use its serial console).",
        ),
        format!(
            "Assign the device address:  sudo ip address add {} dev {}",
            cfg.device, cfg.device_interface
        ),
        format!(
            "Bring the device interface up:  sudo ip link set {} up",
            cfg.device_interface
        ),
        format!(
            "Check it with:  ip address show {}  (it should list {} and be UP)",
            cfg.device_interface, cfg.device
        ),
    ]
}

pub struct Workflow<'a> {
    ops: &'a dyn NetOps,
    operator: &'a mut dyn Operator,
    cfg: &'a LinkConfig,

    /// Whether the process can change interface addresses
    elevated: bool,
}

impl<'a> Workflow<'a> {
    /// Creates a new workflow
    ///
    /// # Arguments
    /// * `ops` - Access to the host's network stack
    /// * `operator` - Console used to talk to the operator
    /// * `cfg` - Link addressing
    /// * `elevated` - Whether the process runs with administrator/root rights
    pub fn new(
        ops: &'a dyn NetOps,
        operator: &'a mut dyn Operator,
        cfg: &'a LinkConfig,
        elevated: bool,
    ) -> Self {
        Self {
            ops,
            operator,
            cfg,
            elevated,
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(?stage, "entering stage");
        self.operator.heading(&stage.to_string());
    }

    fn confirm(&mut self, prompt: &str) -> eyre::Result<()> {
        gate::confirm(self.operator, prompt).wrap_err("failed to read operator confirmation")
    }

    fn show_inventory(&mut self) -> eyre::Result<Vec<NetworkInterface>> {
        inventory::show(self.ops, self.operator).wrap_err("failed to list network interfaces")
    }

    /// Runs every stage in order
    ///
    /// # Errors
    /// * Any OS query/mutation/probe failure, which ends the run without rolling anything back
    /// * The console closing while waiting for the operator
    pub fn run(&mut self) -> eyre::Result<Outcome> {
        self.operator.say(&banner("ethlink: host to device Ethernet link setup"));

        self.enter(Stage::InventoryShown);
        self.operator
            .say("Leave the device's Ethernet cable UNPLUGGED for now. This host currently has:");
        self.show_inventory()?;

        self.enter(Stage::CablePrompted);
        self.operator.say(
            "Plug the Ethernet cable into this host and the device, and make sure the device is powered on.",
        );
        self.confirm("Cable plugged in? Type c to continue")?;

        self.enter(Stage::InventoryShownAgain);
        self.show_inventory()?;
        self.operator
            .say("Compare with the first list: the interface for the device should now be Up.");
        self.confirm("Type c to continue")?;

        self.enter(Stage::InterfaceSelected);
        let interface = selector::select_interface(self.ops, self.operator)?;
        let name = interface.name().to_string();
        self.operator.say(&format!("Using interface '{}'.", name));

        if !self.elevated {
            self.operator.warn(
                "not running as administrator/root, the next steps change interface addresses and will likely be refused",
            );
        }

        self.enter(Stage::ConflictsRemoved);
        let removed = remove_conflicts(self.ops, &name, self.cfg.conflict)
            .wrap_err_with(|| format!("failed to remove conflicting addresses from {}", name))?;
        match removed.is_empty() {
            true => self.operator.say(&format!(
                "No conflicting {} address on '{}'.",
                self.cfg.conflict, name
            )),
            false => {
                for address in &removed {
                    self.operator
                        .say(&format!("Removed conflicting address {} from '{}'.", address, name));
                }
            }
        }
        self.confirm("Type c to continue")?;

        self.enter(Stage::AddressAssigned);
        let assignment = assign_address(self.ops, &name, self.cfg.host)
            .wrap_err_with(|| format!("failed to assign {} to {}", self.cfg.host, name))?;
        match assignment {
            Assignment::Added => self
                .operator
                .say(&format!("Assigned {} to '{}'.", self.cfg.host, name)),
            Assignment::AlreadyPresent => self.operator.say(&format!(
                "'{}' already has {}, nothing to change.",
                name, self.cfg.host
            )),
        }
        self.confirm("Type c to continue")?;

        self.enter(Stage::AddressVerifiedVisually);
        self.show_inventory()?;
        self.operator.say(&format!(
            "Check that '{}' lists {} above.",
            name, self.cfg.host
        ));
        self.confirm("Address looks right? Type c to continue")?;

        self.enter(Stage::RemoteStepsAcknowledged);
        let steps = remote_steps(self.cfg);
        for (i, step) in steps.iter().enumerate() {
            self.operator
                .say(&format!("Device step {}/{}: {}", i + 1, steps.len(), step));
            self.confirm("Done on the device? Type c to continue")?;
        }

        self.enter(Stage::Probed);
        let device = self.cfg.device.ip();
        self.operator.say(&format!("Pinging the device at {} ...", device));
        let probe = self
            .ops
            .probe(device)
            .wrap_err_with(|| format!("failed to run ping against {}", device))?;
        self.operator.say(&probe);
        self.operator.say(
            "If the replies above show no packet loss the link works. Otherwise re-check the cable and the device steps, then run ethlink again.",
        );
        self.confirm("Type c to finish")?;

        self.enter(Stage::Done);
        self.operator.say(&format!(
            "Host {} on '{}' <-> device {}",
            self.cfg.host, name, self.cfg.device
        ));

        Ok(Outcome {
            interface,
            reconciliation: Reconciliation {
                removed,
                assignment,
            },
            probe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ScriptedOperator;
    use ethlink_device::{
        mock::{Call, MockNetOps},
        LinkStatus,
    };
    use ipnetwork::Ipv4Network;

    /// Gates in a full run: cable, second listing, conflicts, assignment, verification,
    /// four device steps, and the probe
    const GATES: usize = 10;

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    /// An operator that selects `interface` and continues at every gate
    fn cooperative(interface: &str) -> ScriptedOperator {
        let mut answers = vec!["c"; 2];
        answers.push(interface);
        answers.extend(vec!["c"; GATES - 2]);
        ScriptedOperator::new(&answers)
    }

    /// "Ethernet" is Down before cabling and Up from the second listing on
    fn cabled_ops(ethernet: NetworkInterface) -> MockNetOps {
        let ops = MockNetOps::new(vec![
            NetworkInterface::new("Wi-Fi", LinkStatus::Up).with_address(net("10.0.0.12/24")),
            ethernet,
        ]);
        ops.change_status_after(1, "Ethernet", LinkStatus::Up);
        ops
    }

    fn run(ops: &MockNetOps, operator: &mut ScriptedOperator) -> eyre::Result<Outcome> {
        let cfg = LinkConfig::new()?;
        Workflow::new(ops, operator, &cfg, true).run()
    }

    #[test]
    fn stages_are_numbered_in_order() {
        let numbers: Vec<usize> = Stage::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
        assert_eq!(Stage::InventoryShown.to_string(), "[1/10] Current network interfaces");
        assert_eq!(Stage::Done.to_string(), "[10/10] Done");
    }

    #[test]
    fn full_run_on_a_clean_interface() -> eyre::Result<()> {
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down));
        let mut operator = cooperative("Ethernet");

        let outcome = run(&ops, &mut operator)?;

        assert_eq!(outcome.interface.name(), "Ethernet");
        assert!(outcome.reconciliation.removed.is_empty());
        assert_eq!(outcome.reconciliation.assignment, Assignment::Added);
        assert_eq!(
            ops.interface("Ethernet").unwrap().addresses(),
            &[net("192.168.0.2/24")]
        );
        assert_eq!(operator.prompts(), GATES + 1);
        assert_eq!(operator.remaining(), 0);
        assert!(operator.warnings().is_empty(), "{:?}", operator.warnings());
        Ok(())
    }

    #[test]
    fn stages_run_in_order() -> eyre::Result<()> {
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down));
        let mut operator = cooperative("Ethernet");

        run(&ops, &mut operator)?;

        let headings: Vec<&String> = operator
            .said()
            .iter()
            .filter(|line| line.starts_with('['))
            .collect();
        let expected: Vec<String> = Stage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(headings, expected.iter().collect::<Vec<_>>());

        // the device is only probed after every mutation, and exactly once
        let calls = ops.calls();
        let probe = calls.iter().position(|c| matches!(c, Call::Probe(_))).unwrap();
        let add = calls.iter().position(|c| matches!(c, Call::Add(..))).unwrap();
        assert!(add < probe);
        assert_eq!(ops.probes(), 1);
        Ok(())
    }

    #[test]
    fn selecting_before_the_link_is_up_reports_not_up() -> eyre::Result<()> {
        // the link only comes up after both listings and the first selection attempt
        let ops = MockNetOps::new(vec![NetworkInterface::new("Ethernet", LinkStatus::Down)]);
        ops.change_status_after(3, "Ethernet", LinkStatus::Up);

        let mut answers = vec!["c", "c", "Ethernet", "Ethernet"];
        answers.extend(vec!["c"; GATES - 2]);
        let mut operator = ScriptedOperator::new(&answers);

        let outcome = run(&ops, &mut operator)?;

        assert_eq!(outcome.interface.name(), "Ethernet");
        assert_eq!(operator.warnings().len(), 1);
        assert!(operator.warnings()[0].contains("exists but is not Up"));
        Ok(())
    }

    #[test]
    fn already_assigned_address_is_left_alone() -> eyre::Result<()> {
        let ops = cabled_ops(
            NetworkInterface::new("Ethernet", LinkStatus::Down).with_address(net("192.168.0.2/24")),
        );
        let mut operator = cooperative("Ethernet");

        let outcome = run(&ops, &mut operator)?;

        assert_eq!(outcome.reconciliation.assignment, Assignment::AlreadyPresent);
        assert_eq!(ops.adds(), 0);
        assert!(operator.transcript().contains("already has 192.168.0.2/24"));
        Ok(())
    }

    #[test]
    fn stale_device_address_is_removed_before_assignment() -> eyre::Result<()> {
        let stale = net("192.168.0.1/32");
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down).with_address(stale));
        let mut operator = cooperative("Ethernet");

        let outcome = run(&ops, &mut operator)?;

        assert_eq!(outcome.reconciliation.removed, vec![stale]);
        assert_eq!(ops.removes(), 1);

        let calls = ops.calls();
        let remove = calls
            .iter()
            .position(|c| *c == Call::Remove("Ethernet".into(), stale))
            .unwrap();
        let add = calls.iter().position(|c| matches!(c, Call::Add(..))).unwrap();
        assert!(remove < add);
        Ok(())
    }

    #[test]
    fn failed_probe_is_shown_verbatim_and_still_reaches_the_last_gate() -> eyre::Result<()> {
        let lost = "PING 192.168.0.1 (192.168.0.1) 56(84) bytes of data.\n\n\
                    --- 192.168.0.1 ping statistics ---\n\
                    4 packets transmitted, 0 received, 100% packet loss, time 3066ms\n";
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down))
            .with_probe_output(lost);
        let mut operator = cooperative("Ethernet");

        let outcome = run(&ops, &mut operator)?;

        assert_eq!(outcome.probe, lost);
        assert!(operator.said().iter().any(|line| line == lost));
        assert_eq!(ops.probes(), 1, "no automatic retry");
        assert_eq!(operator.prompt_texts().last().unwrap(), "Type c to finish");
        assert_eq!(
            operator.said().last().unwrap(),
            "Host 192.168.0.2/24 on 'Ethernet' <-> device 192.168.0.1/24"
        );
        Ok(())
    }

    #[test]
    fn invalid_gate_answers_reprompt_without_side_effects() -> eyre::Result<()> {
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down));
        let mut answers = vec!["c", "c", "Ethernet", "yes", "C", "c"];
        answers.extend(vec!["c"; GATES - 3]);
        let mut operator = ScriptedOperator::new(&answers);

        run(&ops, &mut operator)?;

        assert_eq!(operator.warnings().len(), 2);
        assert_eq!(ops.removes() + ops.adds(), 1, "only the assignment mutates");
        Ok(())
    }

    #[test]
    fn os_failure_ends_the_run() {
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down));
        ops.fail_mutations();
        let mut operator = cooperative("Ethernet");

        let err = run(&ops, &mut operator).unwrap_err();

        assert!(err.to_string().contains("failed to assign"), "{}", err);
        assert_eq!(ops.probes(), 0);
    }

    #[test]
    fn warns_when_not_elevated() -> eyre::Result<()> {
        let ops = cabled_ops(NetworkInterface::new("Ethernet", LinkStatus::Down));
        let mut operator = cooperative("Ethernet");
        let cfg = LinkConfig::new()?;

        Workflow::new(&ops, &mut operator, &cfg, false).run()?;

        assert_eq!(operator.warnings().len(), 1);
        assert!(operator.warnings()[0].contains("administrator"));
        Ok(())
    }

    #[test]
    fn remote_steps_name_the_device_address() -> eyre::Result<()> {
        let cfg = LinkConfig::new()?;
        let steps = remote_steps(&cfg);
        assert!(steps[1].contains("192.168.0.1/24 dev eth0"));
        assert!(steps[2].contains("ip link set eth0 up"));
        Ok(())
    }

    #[test]
    fn banner_boxes_the_title() {
        let lines: Vec<String> = banner("quick").lines().map(str::to_string).collect();
        assert_eq!(lines, vec!["┏━━━━━━━┓", "┃ quick ┃", "┗━━━━━━━┛"]);
    }
}
