// mouse_sim/src/main.rs

use clap::Parser;
use mouse_sim::cli::Cli;
use mouse_sim::config::load_scenario;
use mouse_sim::error::Result;
use mouse_sim::runner::{build_controller, Outcome, Runner};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info,mouse_core=debug" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    let mut scenario = load_scenario(&cli.scenario)?;
    scenario.apply_cli(cli);
    scenario.validate()?;

    tracing::info!(
        "Running {} episode(s) with the {:?} controller, dt = {}s",
        scenario.run.max_episodes,
        scenario.run.controller,
        scenario.run.dt
    );
    let controller = build_controller(&scenario)?;
    let mut runner = Runner::new(&scenario, controller)?;
    let summaries = runner.run()?;

    Ok(summaries.iter().all(|s| s.outcome == Outcome::Victory))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::warn!("Not every episode ended in victory");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
