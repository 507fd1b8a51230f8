//! Command Line Options and Arguments

use clap::{ArgAction, Parser, Subcommand};
use std::net::Ipv4Addr;

#[derive(Parser)]
#[clap(name = "ethlink", about = "Connects this host to the target device over a dedicated Ethernet link")]
pub struct Opts {
    /// A level of verbosity, and can be used multiple times
    #[clap(short, long, action = ArgAction::Count)]
    pub verbosity: u8,

    #[clap(subcommand)]
    pub subcmd: Option<SubCommand>,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Walks through cabling, addressing, and verifying the link (default)
    Connect,

    /// Prints the current network interfaces and their addresses
    Interfaces,

    /// Pings the target device and prints the raw result
    Probe {
        /// Address to probe instead of the target device's
        address: Option<Ipv4Addr>,
    },
}

impl Opts {
    /// Returns the requested subcommand, running the full workflow when none was given
    pub fn command(&self) -> &SubCommand {
        self.subcmd.as_ref().unwrap_or(&SubCommand::Connect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_connect() {
        let opts = Opts::try_parse_from(&["ethlink"]).unwrap();
        assert!(matches!(opts.command(), SubCommand::Connect));
        assert_eq!(opts.verbosity, 0);
    }

    #[test]
    fn counts_verbosity_and_parses_probe_address() {
        let opts = Opts::try_parse_from(&["ethlink", "-vvv", "probe", "10.1.1.1"]).unwrap();
        assert_eq!(opts.verbosity, 3);
        match opts.command() {
            SubCommand::Probe { address } => assert_eq!(*address, Some(Ipv4Addr::new(10, 1, 1, 1))),
            _ => panic!("expected probe subcommand"),
        }
    }

    #[test]
    fn rejects_bad_probe_address() {
        assert!(Opts::try_parse_from(&["ethlink", "probe", "192.168.0.300"]).is_err());
    }
}
