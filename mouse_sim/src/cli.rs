// mouse_sim/src/cli.rs

use crate::config::ControllerKind;
use clap::Parser;
use std::path::PathBuf;

/// Mouse: a headless corridor-following robot simulator.
///
/// Every flag except `--scenario` and `--quiet` overrides the matching value
/// of the scenario file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/default.toml")]
    pub scenario: PathBuf,

    /// Which controller steers the robot.
    #[arg(short, long, value_enum)]
    pub controller: Option<ControllerKind>,

    /// Serial port of the hardware controller.
    #[arg(long)]
    pub port: Option<String>,

    /// Drive through a maze layout file instead of the generated course.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Tick budget per episode.
    #[arg(long)]
    pub max_ticks: Option<usize>,

    /// Simulated seconds per tick.
    #[arg(long)]
    pub dt: Option<f64>,

    /// Only log warnings and errors.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mouse_sim"]);
        assert_eq!(cli.scenario, PathBuf::from("assets/scenarios/default.toml"));
        assert_eq!(cli.controller, None);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::parse_from([
            "mouse_sim",
            "--controller",
            "serial",
            "--port",
            "/dev/ttyUSB0",
            "--layout",
            "maze.txt",
            "--max-ticks",
            "100",
            "--dt",
            "0.02",
            "-q",
        ]);
        assert_eq!(cli.controller, Some(ControllerKind::Serial));
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.layout, Some(PathBuf::from("maze.txt")));
        assert_eq!(cli.max_ticks, Some(100));
        assert_eq!(cli.dt, Some(0.02));
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_overrides_scenario() {
        let cli = Cli::parse_from(["mouse_sim", "--layout", "maze.txt", "--dt", "0.05"]);
        let mut scenario = crate::config::Scenario::default();
        scenario.apply_cli(&cli);
        assert_eq!(
            scenario.sim.course,
            mouse_core::config::CourseConfig::layout("maze.txt")
        );
        assert_eq!(scenario.run.dt, 0.05);
        assert_eq!(scenario.run.controller, ControllerKind::Pid);
    }
}
