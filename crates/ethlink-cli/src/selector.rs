//! Interface selection prompt

use crate::operator::Operator;
use color_eyre::eyre;
use ethlink_device::{validate_selection, NetOps, NetworkInterface};

const PROMPT: &str = "Name of the interface that came Up after plugging in the cable";

/// Asks for an interface name until the operator names one that exists and is `Up`
///
/// Every attempt validates against a fresh inventory.  Unknown names and interfaces without a
/// link are reported with different messages and the prompt repeats; there is no attempt limit.
///
/// # Errors
/// * If the inventory query fails or the console can't be read
pub fn select_interface(
    ops: &dyn NetOps,
    operator: &mut dyn Operator,
) -> eyre::Result<NetworkInterface> {
    loop {
        let answer = operator.read_line(PROMPT)?;
        let candidate = answer.trim_end_matches(|c| c == '\n' || c == '\r');

        let inventory = ops.list_interfaces()?;
        match validate_selection(&inventory, candidate) {
            Ok(iface) => {
                tracing::info!(interface = iface.name(), "interface selected");
                return Ok(iface);
            }
            // both kinds loop identically, only the message differs
            Err(error) => {
                tracing::debug!(%error, "selection rejected");
                operator.warn(&error.to_string());
            }
        }
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

    fn ops() -> MockNetOps {
        MockNetOps::new(vec![
            NetworkInterface::new("Wi-Fi", LinkStatus::Up),
            NetworkInterface::new("Ethernet", LinkStatus::Disconnected),
            NetworkInterface::new("Ethernet 2", LinkStatus::Up),
        ])
    }

    #[test]
    fn retries_until_an_up_interface_is_named() -> eyre::Result<()> {
        let ops = ops();
        let mut operator = ScriptedOperator::new(&["ethernet 2", "Ethernet", "Ethernet 2"]);

        let selected = select_interface(&ops, &mut operator)?;

        assert_eq!(selected.name(), "Ethernet 2");
        assert_eq!(operator.prompts(), 3);

        let warnings = operator.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no interface named 'ethernet 2'"), "{}", warnings[0]);
        assert!(warnings[1].contains("exists but is not Up"), "{}", warnings[1]);
        Ok(())
    }

    #[test]
    fn validates_against_a_fresh_inventory_each_attempt() -> eyre::Result<()> {
        let ops = ops();
        ops.change_status_after(1, "Ethernet", LinkStatus::Up);
        let mut operator = ScriptedOperator::new(&["Ethernet", "Ethernet"]);

        let selected = select_interface(&ops, &mut operator)?;

        assert_eq!(selected.name(), "Ethernet");
        assert_eq!(operator.warnings().len(), 1);
        let lists = ops.calls().iter().filter(|c| **c == Call::List).count();
        assert_eq!(lists, 2);
        Ok(())
    }

    #[test]
    fn succeeds_exactly_once() -> eyre::Result<()> {
        let ops = ops();
        let mut operator = ScriptedOperator::new(&["Wi-Fi", "Ethernet 2"]);

        let selected = select_interface(&ops, &mut operator)?;

        assert_eq!(selected.name(), "Wi-Fi");
        assert_eq!(operator.remaining(), 1, "the loop must stop at the first valid name");
        Ok(())
    }

    #[test]
    fn never_selects_without_a_valid_name() {
        let ops = ops();
        let mut operator = ScriptedOperator::new(&["eth0", "Ethernet", "ETHERNET 2"]);

        assert!(select_interface(&ops, &mut operator).is_err());
        assert_eq!(operator.warnings().len(), 3);
        assert_eq!(ops.adds() + ops.removes(), 0);
    }
}
