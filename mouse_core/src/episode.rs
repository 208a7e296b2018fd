// mouse_core/src/episode.rs

use crate::controller::WheelCommand;
use crate::sensor::{RayHit, SensorReading};
use serde::Deserialize;

/// Run score: rewards both distance and average speed.
///
/// `floor(distance / 7.23 * (distance / elapsed) / 500)`, or 0 before any
/// time has elapsed.
pub fn score(distance: f64, elapsed: f64) -> i64 {
    if elapsed <= 0.0 {
        return 0;
    }
    let speed = distance / elapsed;
    (distance / 7.23 * speed / 500.0).floor() as i64
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Cumulative forward travel that ends the run in victory.
    pub victory_distance: f64,
    /// Contact distance for visible walls.
    pub contact_threshold: f64,
    /// Contact distance for hidden walls.
    pub hidden_contact_threshold: f64,
    /// Seconds between a reset and the start of the run.
    pub countdown: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            victory_distance: 72_300.0,
            contact_threshold: 20.0,
            hidden_contact_threshold: 10.0,
            countdown: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Countdown,
    Running,
    Victory,
    Failure,
}

impl EpisodePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, EpisodePhase::Victory | EpisodePhase::Failure)
    }
}

/// Run bookkeeping. All times are seconds on the caller's clock.
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub config: EpisodeConfig,
    pub score: i64,
    pub victory: bool,
    pub failure: bool,
    pub start_deadline: f64,
    pub distance_travelled: f64,
}

impl EpisodeState {
    pub fn new(config: EpisodeConfig, now: f64) -> Self {
        let mut state = Self {
            config,
            score: 0,
            victory: false,
            failure: false,
            start_deadline: now,
            distance_travelled: 0.0,
        };
        state.reset(now);
        state
    }

    pub fn reset(&mut self, now: f64) {
        self.score = 0;
        self.victory = false;
        self.failure = false;
        self.distance_travelled = 0.0;
        self.start_deadline = now + self.config.countdown;
    }

    pub fn is_counting_down(&self, now: f64) -> bool {
        now < self.start_deadline
    }

    pub fn is_terminal(&self) -> bool {
        self.victory || self.failure
    }

    /// Forces the wheels to a stop before the start and after the finish.
    pub fn gate(&self, command: WheelCommand, now: f64) -> WheelCommand {
        if self.is_counting_down(now) || self.is_terminal() {
            WheelCommand::STOP
        } else {
            command
        }
    }

    fn in_contact(&self, hit: &RayHit) -> bool {
        let threshold = if hit.hidden {
            self.config.hidden_contact_threshold
        } else {
            self.config.contact_threshold
        };
        hit.distance < threshold
    }

    /// Books one tick of travel and the sensor reading taken after it.
    ///
    /// The score is refreshed only while running; victory and failure flags
    /// are sticky until the next `reset`.
    pub fn record(&mut self, translation_delta: f64, reading: &SensorReading, now: f64) {
        self.distance_travelled += translation_delta;

        if self.is_counting_down(now) {
            self.score = 0;
        } else if !self.is_terminal() {
            self.score = score(self.distance_travelled, now - self.start_deadline);
        }

        if !self.victory && self.distance_travelled > self.config.victory_distance {
            self.victory = true;
            tracing::debug!(
                "Victory after {:.1} units, score {}",
                self.distance_travelled,
                self.score
            );
        }
        if !self.failure && (self.in_contact(&reading.left) || self.in_contact(&reading.right)) {
            self.failure = true;
            tracing::debug!(
                "Wall contact (left {:.2}, right {:.2}) after {:.1} units",
                reading.left.distance,
                reading.right.distance,
                self.distance_travelled
            );
        }
    }

    /// Victory takes precedence when both flags were raised on the same tick.
    pub fn phase(&self, now: f64) -> EpisodePhase {
        if self.victory {
            EpisodePhase::Victory
        } else if self.failure {
            EpisodePhase::Failure
        } else if self.is_counting_down(now) {
            EpisodePhase::Countdown
        } else {
            EpisodePhase::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far() -> RayHit {
        RayHit {
            distance: 1_000_000.0,
            hidden: false,
        }
    }

    fn reading(left: RayHit, right: RayHit) -> SensorReading {
        SensorReading { left, right }
    }

    fn clear() -> SensorReading {
        reading(far(), far())
    }

    #[test]
    fn test_score_formula() {
        assert_eq!(score(0.0, 10.0), 0);
        assert_eq!(score(1000.0, 0.0), 0);
        assert_eq!(score(1000.0, -1.0), 0);
        // 10000 / 7.23 * (10000 / 10) / 500 = 2766.25...
        assert_eq!(score(10_000.0, 10.0), 2766);
        // 1000 / 7.23 * 100 / 500 = 27.66...
        assert_eq!(score(1000.0, 10.0), 27);
    }

    #[test]
    fn test_countdown_gates_commands() {
        let state = EpisodeState::new(EpisodeConfig::default(), 100.0);
        let command = WheelCommand::new(0.8, 0.6);

        assert!(state.is_counting_down(104.9));
        assert_eq!(state.phase(104.9), EpisodePhase::Countdown);
        assert_eq!(state.gate(command, 104.9), WheelCommand::STOP);

        assert!(!state.is_counting_down(105.0));
        assert_eq!(state.phase(105.0), EpisodePhase::Running);
        assert_eq!(state.gate(command, 105.0), command);
    }

    #[test]
    fn test_score_is_zero_during_countdown() {
        let mut state = EpisodeState::new(EpisodeConfig::default(), 0.0);
        state.record(100.0, &clear(), 2.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.distance_travelled, 100.0);
    }

    #[test]
    fn test_score_tracks_running_time() {
        let mut state = EpisodeState::new(EpisodeConfig::default(), 0.0);
        state.record(10_000.0, &clear(), 15.0);
        assert_eq!(state.score, 2766);
    }

    #[test]
    fn test_visible_contact_fails_under_twenty() {
        let mut state = EpisodeState::new(EpisodeConfig::default(), 0.0);
        let near = RayHit {
            distance: 19.5,
            hidden: false,
        };
        state.record(0.0, &reading(far(), near), 6.0);
        assert!(state.failure);
        assert_eq!(state.phase(6.0), EpisodePhase::Failure);
    }

    #[test]
    fn test_hidden_contact_uses_lower_threshold() {
        let mut state = EpisodeState::new(EpisodeConfig::default(), 0.0);
        let grazing = RayHit {
            distance: 15.0,
            hidden: true,
        };
        state.record(0.0, &reading(grazing, far()), 6.0);
        assert!(!state.failure);

        let touching = RayHit {
            distance: 9.0,
            hidden: true,
        };
        state.record(0.0, &reading(touching, far()), 6.1);
        assert!(state.failure);
    }

    #[test]
    fn test_victory_is_sticky_and_freezes_score() {
        let mut state = EpisodeState::new(
            EpisodeConfig {
                victory_distance: 1000.0,
                countdown: 0.0,
                ..Default::default()
            },
            0.0,
        );
        state.record(1000.5, &clear(), 10.0);
        assert!(state.victory);
        let frozen = state.score;
        assert_eq!(frozen, score(1000.5, 10.0));

        assert_eq!(
            state.gate(WheelCommand::new(1.0, 1.0), 11.0),
            WheelCommand::STOP
        );
        state.record(500.0, &clear(), 20.0);
        assert!(state.victory);
        assert_eq!(state.score, frozen);
        assert_eq!(state.phase(20.0), EpisodePhase::Victory);
        assert!(state.phase(20.0).is_terminal());
    }

    #[test]
    fn test_reset_clears_flags_and_restarts_countdown() {
        let mut state = EpisodeState::new(EpisodeConfig::default(), 0.0);
        let near = RayHit {
            distance: 1.0,
            hidden: false,
        };
        state.record(300.0, &reading(near, near), 7.0);
        assert!(state.is_terminal());

        state.reset(50.0);
        assert!(!state.is_terminal());
        assert_eq!(state.score, 0);
        assert_eq!(state.distance_travelled, 0.0);
        assert_eq!(state.start_deadline, 55.0);
        assert_eq!(state.phase(52.0), EpisodePhase::Countdown);
    }
}
