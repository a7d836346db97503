mod cli;
mod cluster_cmd;
mod config;
mod convert;
mod correlate_cmd;
mod logging;
mod oneshot;
mod optimize_cmd;
mod serve;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Correlate(args) => correlate_cmd::run(args, config),
        Command::Cluster(args) => cluster_cmd::run(args, config),
        Command::Optimize(args) => optimize_cmd::run(args, config),
        Command::Serve => serve::run(config),
    }
}
