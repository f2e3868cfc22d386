#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression system that ends the run, keeps the score current, and paces
//! the player's distress cue.

use std::time::Duration;

use outbreak_core::{Command, Cue, Event, GameState, PlayerSnapshot, ProgressSnapshot, MAX_HEALTH};

const DEFAULT_DISTRESS_CAP: Duration = Duration::from_millis(10_000);

/// Configuration parameters required to construct the progression system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    distress_cap: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// The distress counter stops accumulating once it reaches `distress_cap`.
    #[must_use]
    pub const fn new(distress_cap: Duration) -> Self {
        Self { distress_cap }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRESS_CAP)
    }
}

/// Pure system that evaluates win and loss conditions and publishes the score.
#[derive(Debug)]
pub struct Progression {
    distress_cap: Duration,
    distress_counter: Duration,
}

impl Progression {
    /// Creates a new progression system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            distress_cap: config.distress_cap,
            distress_counter: Duration::ZERO,
        }
    }

    /// Consumes world events and immutable views to emit progression commands.
    ///
    /// Loss takes precedence when health runs out on the same tick the last
    /// first-aid item is collected.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        player: &PlayerSnapshot,
        progress: ProgressSnapshot,
        all_first_aid_collected: bool,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) {
        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        let next_state = if state.is_playing() && player.health <= 0.0 {
            Some(GameState::GameOver)
        } else if state.is_playing() && all_first_aid_collected {
            Some(GameState::Victory)
        } else {
            None
        };
        if let Some(next) = next_state {
            out.push(Command::SetGameState { state: next });
        }
        let effective = next_state.unwrap_or(state);

        if effective != GameState::Victory {
            if let Some(score) = score(progress.kills, progress.elapsed_seconds, player) {
                if score != progress.score {
                    out.push(Command::RecordScore { score });
                }
            }
        }

        self.pace_distress(elapsed, effective, player.health, cues);
    }

    fn pace_distress(
        &mut self,
        elapsed: Duration,
        state: GameState,
        health: f32,
        cues: &mut Vec<Cue>,
    ) {
        if self.distress_counter < self.distress_cap {
            self.distress_counter = self.distress_counter.saturating_add(elapsed);
        }

        let threshold_ms = f64::from(health.max(0.0)) * 2.0;
        let counter_ms = self.distress_counter.as_secs_f64() * 1_000.0;
        if counter_ms >= threshold_ms && health < MAX_HEALTH && !state.is_terminal() {
            cues.push(Cue::Distress);
            self.distress_counter = Duration::ZERO;
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Score once more than one second has elapsed: kills per hundred seconds plus health percentage.
fn score(kills: u32, elapsed_seconds: u32, player: &PlayerSnapshot) -> Option<u32> {
    if elapsed_seconds <= 1 {
        return None;
    }
    let rate = kills.saturating_mul(100) / elapsed_seconds;
    Some(rate.saturating_add(player.health_percentage()))
}
