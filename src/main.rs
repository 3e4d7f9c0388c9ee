mod cli;
mod commit;
mod config;
mod dispatch;
mod envutil;
mod error;
mod filter;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting CIGate - CI Build Gate");
    cli.execute()?;

    Ok(())
}
