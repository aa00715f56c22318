//! pmon controller CLI - Sample a process's CPU and memory usage

mod cli;
mod logging;
mod runner;
mod signal;

use clap::Parser;
use cli::Cli;
use console::style;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    if let Err(e) = runner::run_monitor(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
