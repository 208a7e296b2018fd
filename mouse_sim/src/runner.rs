// mouse_sim/src/runner.rs

use crate::config::{ControllerKind, RunConfig, Scenario};
use crate::error::Result;
use crate::serial::SerialTransport;
use mouse_core::controller::{CorridorPid, IdleController, SteeringController};
use mouse_core::corridor::build_corridor;
use mouse_core::episode::EpisodePhase;
use mouse_core::link::HardwareController;
use mouse_core::simulation::Simulation;
use std::fmt;
use std::time::Duration;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Failure,
    /// The tick budget ran out first.
    TimedOut,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Victory => "victory",
            Outcome::Failure => "failure",
            Outcome::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub outcome: Outcome,
    pub ticks: usize,
    pub distance: f64,
    pub score: i64,
    /// Simulated seconds from reset to the end of the episode.
    pub sim_time: f64,
}

/// Builds the steering source selected by the scenario.
pub fn build_controller(scenario: &Scenario) -> Result<Box<dyn SteeringController>> {
    let controller: Box<dyn SteeringController> = match scenario.run.controller {
        ControllerKind::Pid => Box::new(CorridorPid::new(scenario.sim.controller.clone())),
        ControllerKind::Idle => Box::new(IdleController),
        ControllerKind::Serial => {
            let link = &scenario.link;
            let transport = SerialTransport::open(
                &link.port,
                link.baud_rate,
                Duration::from_millis(link.timeout_ms),
            )?;
            Box::new(HardwareController::new(transport))
        }
    };
    Ok(controller)
}

/// Fixed-step headless driver around a `Simulation`.
#[derive(Debug)]
pub struct Runner {
    simulation: Simulation,
    run: RunConfig,
    clock: f64,
}

impl Runner {
    /// Builds the corridor and simulation for an already validated scenario.
    pub fn new(scenario: &Scenario, controller: Box<dyn SteeringController>) -> Result<Self> {
        let corridor = build_corridor(&scenario.sim.course)?;
        let simulation = Simulation::new(&scenario.sim, corridor, controller, 0.0)?;
        Ok(Self {
            simulation,
            run: scenario.run.clone(),
            clock: 0.0,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Simulated seconds since the runner was created.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Steps the current episode until it ends or the tick budget is spent.
    pub fn run_episode(&mut self) -> EpisodeSummary {
        let started = self.clock;
        let mut ticks = 0;
        let mut phase = self.simulation.episode().phase(self.clock);

        while ticks < self.run.max_ticks && !phase.is_terminal() {
            self.clock += self.run.dt;
            let report = self.simulation.tick(self.run.dt, self.clock);
            phase = report.phase;
            ticks += 1;

            if self.run.log_every > 0 && ticks % self.run.log_every == 0 {
                let pose = self.simulation.pose();
                tracing::info!(
                    "tick {:>7} | {:?} | distance {:>9.1} | score {:>6} | pos ({:.1}, {:.1}) | cmd ({:.2}, {:.2})",
                    ticks,
                    phase,
                    self.simulation.episode().distance_travelled,
                    report.score,
                    pose.position.x,
                    pose.position.y,
                    report.command.left,
                    report.command.right
                );
            }
        }

        let episode = self.simulation.episode();
        let outcome = match phase {
            EpisodePhase::Victory => Outcome::Victory,
            EpisodePhase::Failure => Outcome::Failure,
            EpisodePhase::Countdown | EpisodePhase::Running => Outcome::TimedOut,
        };
        EpisodeSummary {
            outcome,
            ticks,
            distance: episode.distance_travelled,
            score: episode.score,
            sim_time: self.clock - started,
        }
    }

    /// Runs `max_episodes` episodes back to back, resetting in between.
    pub fn run(&mut self) -> Result<Vec<EpisodeSummary>> {
        let mut summaries = Vec::with_capacity(self.run.max_episodes);
        for index in 0..self.run.max_episodes {
            if index > 0 {
                self.simulation.reset(self.clock)?;
            }
            let summary = self.run_episode();
            tracing::info!(
                "Episode {}/{}: {} after {} ticks ({:.2}s simulated), distance {:.1}, score {}",
                index + 1,
                self.run.max_episodes,
                summary.outcome,
                summary.ticks,
                summary.sim_time,
                summary.distance,
                summary.score
            );
            summaries.push(summary);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_scenario(controller: ControllerKind) -> Scenario {
        let mut scenario = Scenario::default();
        scenario.run.controller = controller;
        scenario.run.max_ticks = 50;
        scenario.run.log_every = 0;
        scenario.sim.episode.countdown = 0.0;
        scenario
    }

    #[test]
    fn test_idle_robot_times_out() {
        let scenario = quick_scenario(ControllerKind::Idle);
        let controller = build_controller(&scenario).unwrap();
        let mut runner = Runner::new(&scenario, controller).unwrap();

        let summary = runner.run_episode();
        assert_eq!(summary.outcome, Outcome::TimedOut);
        assert_eq!(summary.ticks, 50);
        assert_eq!(summary.distance, 0.0);
        assert!((summary.sim_time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_runs_every_episode() {
        let mut scenario = quick_scenario(ControllerKind::Pid);
        scenario.run.max_episodes = 3;
        let controller = build_controller(&scenario).unwrap();
        let mut runner = Runner::new(&scenario, controller).unwrap();

        let summaries = runner.run().unwrap();
        assert_eq!(summaries.len(), 3);
        // Every episode starts from the same state, so they play out identically.
        assert_eq!(summaries[0].distance, summaries[1].distance);
        assert_eq!(summaries[1].distance, summaries[2].distance);
        assert!(summaries[0].distance > 0.0);
        assert!((runner.clock() - 1.5).abs() < 1e-9);
    }
}
