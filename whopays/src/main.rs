#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod cli;
mod commands;

use bootstrap::{AppConfig, init_logging};
use clap::Parser;
use cli::Cli;
use whopays_application::GroupService;
use whopays_infrastructure::JsonFileStore;

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::from_env(&cli.overrides)?;
    init_logging(config.log_format);
    tracing::debug!(
        data_file = %config.data_file.display(),
        tie_break = ?config.settlement.tie_break,
        scale = config.settlement.money.scale,
        "Configuration loaded"
    );

    let store = JsonFileStore::open(&config.data_file)?;
    let service = GroupService::new(&store, config.settlement);
    commands::execute(cli.command, &service)
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
