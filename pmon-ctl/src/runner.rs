use log::{debug, info};
use pmon::{MonitorBuilder, Result};

use crate::cli::Cli;
use crate::signal;

/// Build a monitor from the CLI arguments and run it against stdout
pub fn run_monitor(cli: Cli) -> Result<()> {
    let monitor = MonitorBuilder::new(cli.pid)
        .rate(cli.rate)
        .duration_secs(cli.duration)
        .format(cli.format.into())
        .build()?;

    debug!(
        "configured: rate {} Hz, duration {}s, format {:?}",
        cli.rate, cli.duration, cli.format
    );

    let stop = signal::install_interrupt_handler()?;

    let result = monitor.run(std::io::stdout(), stop);
    info!("monitoring finished");
    result
}
