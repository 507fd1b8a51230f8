//! Ethlink: guided host to device Ethernet link setup

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use ethlink_device::{NetOps, SystemNetOps};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod cli;
pub mod config;
pub mod gate;
pub mod inventory;
pub mod operator;
pub mod selector;
pub mod workflow;


fn main() -> eyre::Result<()> {
    use cli::SubCommand;
    use operator::Operator;

    let opts = cli::Opts::parse();

    // init logging
    let level = match opts.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    FmtSubscriber::builder().with_max_level(level).init();

    // init error/panic handling
    color_eyre::install()?;

    let cfg = config::LinkConfig::new()?;
    let ops = SystemNetOps;
    let mut terminal = operator::Terminal::new();

    match opts.command() {
        SubCommand::Connect => {
            let elevated = is_root::is_root();
            tracing::debug!(elevated, "starting link setup");

            let outcome = workflow::Workflow::new(&ops, &mut terminal, &cfg, elevated).run()?;
            tracing::info!(
                interface = outcome.interface.name(),
                removed = outcome.reconciliation.removed.len(),
                assignment = ?outcome.reconciliation.assignment,
                "link setup finished"
            );
        }
        SubCommand::Interfaces => {
            inventory::show(&ops, &mut terminal).wrap_err("failed to list network interfaces")?;
        }
        SubCommand::Probe { address } => {
            let address = address.unwrap_or_else(|| cfg.device.ip());
            let output = ops
                .probe(address)
                .wrap_err_with(|| format!("failed to run ping against {}", address))?;
            terminal.say(&output);
        }
    }

    Ok(())
}
