// mouse_sim/src/config.rs

//! Scenario loading: one TOML file plus `MOUSE_` environment overrides.

use crate::cli::Cli;
use crate::error::{Result, SimError};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use mouse_core::config::{CourseConfig, SimConfig};
use serde::Deserialize;
use std::path::Path;

/// Where the wheel commands come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    /// The built-in corridor PID.
    #[default]
    Pid,
    /// External hardware on the serial link.
    Serial,
    /// Never moves.
    Idle,
}

/// Headless loop settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Fixed simulated time step in seconds.
    pub dt: f64,
    /// Tick budget per episode.
    pub max_ticks: usize,
    pub max_episodes: usize,
    pub controller: ControllerKind,
    /// Progress is logged every this many ticks; 0 disables it.
    pub log_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            max_ticks: 500_000,
            max_episodes: 1,
            controller: ControllerKind::Pid,
            log_every: 5_000,
        }
    }
}

/// Serial link to the robot's microcontroller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            timeout_ms: 1,
        }
    }
}

/// The complete contents of a scenario file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub run: RunConfig,
    pub link: LinkConfig,
    pub sim: SimConfig,
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        if self.run.dt.is_nan() || self.run.dt <= 0.0 {
            return Err(SimError::InvalidRun(format!(
                "dt must be positive, got {}",
                self.run.dt
            )));
        }
        if self.run.max_episodes == 0 {
            return Err(SimError::InvalidRun(
                "max_episodes must be at least 1".to_string(),
            ));
        }
        self.sim.validate()?;
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(controller) = cli.controller {
            self.run.controller = controller;
        }
        if let Some(port) = &cli.port {
            self.link.port = port.clone();
        }
        if let Some(layout) = &cli.layout {
            self.sim.course = CourseConfig::layout(layout.clone());
        }
        if let Some(max_ticks) = cli.max_ticks {
            self.run.max_ticks = max_ticks;
        }
        if let Some(dt) = cli.dt {
            self.run.dt = dt;
        }
    }
}

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOUSE_").split("__"))
}

/// Loads a scenario. A missing file yields the defaults.
///
/// The result is not validated yet: command-line overrides may still fix it
/// up, so callers run `Scenario::validate` once they are applied.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    if !path.exists() {
        tracing::warn!(
            "Scenario file {} not found, using defaults",
            path.display()
        );
    }
    let scenario: Scenario = figment_for(path).extract()?;
    tracing::info!("Loaded scenario from {}", path.display());
    Ok(scenario)
}

/// Parses a scenario from TOML text, without environment overrides.
pub fn parse_scenario(text: &str) -> Result<Scenario> {
    let scenario: Scenario = Figment::new().merge(Toml::string(text)).extract()?;
    scenario.validate()?;
    Ok(scenario)
}
