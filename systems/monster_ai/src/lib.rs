#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster behaviour system that chooses between pursuing the player and
//! patrolling toward an event site.

use std::time::Duration;

use outbreak_core::{
    Command, Cue, Event, EventSiteSnapshot, GameState, MonsterSnapshot, MonsterView,
    PlanarPosition, PlayerSnapshot, AGGRO_RADIUS, AUDIO_RADIUS, DAMAGE_RADIUS, PATROL_STEP,
    SITE_ARRIVAL_RADIUS, STOP_RADIUS,
};
use outbreak_system_respawn::RespawnSampler;

const REFERENCE_FRAME: Duration = Duration::from_millis(16);

/// Configuration parameters required to construct the monster AI.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    aggro_radius: f32,
    stop_radius: f32,
    damage_radius: f32,
    audio_radius: f32,
    patrol_step: f32,
    arrival_radius: f32,
    reference_frame: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `reference_frame` is the frame duration at which a pursuing monster
    /// covers exactly its kind's speed; longer frames cover proportionally more.
    #[must_use]
    pub const fn new(
        aggro_radius: f32,
        stop_radius: f32,
        damage_radius: f32,
        audio_radius: f32,
        patrol_step: f32,
        arrival_radius: f32,
        reference_frame: Duration,
    ) -> Self {
        Self {
            aggro_radius,
            stop_radius,
            damage_radius,
            audio_radius,
            patrol_step,
            arrival_radius,
            reference_frame,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            AGGRO_RADIUS,
            STOP_RADIUS,
            DAMAGE_RADIUS,
            AUDIO_RADIUS,
            PATROL_STEP,
            SITE_ARRIVAL_RADIUS,
            REFERENCE_FRAME,
        )
    }
}

/// Pure system that emits monster movement, damage, and respawn commands.
#[derive(Debug)]
pub struct MonsterAi {
    config: Config,
}

impl MonsterAi {
    /// Creates a new monster AI using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes world events and immutable views to emit monster commands.
    ///
    /// Every monster is evaluated against the same snapshot, so no monster
    /// observes another monster's update from the same tick.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        sites: &[EventSiteSnapshot],
        respawn: &mut RespawnSampler,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) {
        if !state.is_playing() {
            return;
        }

        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        let target = player.position.planar();
        for monster in monsters.iter() {
            let distance = monster.position.distance(target);
            if distance < self.config.aggro_radius || monster.is_wounded() {
                self.pursue(monster, target, distance, elapsed, out, cues);
            } else {
                let site = sites
                    .iter()
                    .find(|site| site.id == monster.id.kind().patrol_site());
                if let Some(site) = site {
                    self.patrol(monster, site.location.planar(), target, respawn, out);
                }
            }
        }
    }

    fn pursue(
        &self,
        monster: &MonsterSnapshot,
        target: PlanarPosition,
        distance: f32,
        elapsed: Duration,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) {
        if distance > self.config.stop_radius && !elapsed.is_zero() {
            let step = self.pursuit_step(monster.id.kind().speed(), elapsed);
            let position = PlanarPosition::new(
                approach(monster.position.x(), target.x(), step),
                approach(monster.position.z(), target.z(), step),
            );
            out.push(Command::MoveMonster {
                monster: monster.id,
                position,
            });
        }

        if distance < self.config.damage_radius && !elapsed.is_zero() {
            out.push(Command::DamagePlayer {
                amount: milliseconds(elapsed),
            });
        }

        if distance < self.config.audio_radius {
            cues.push(Cue::MonsterVocalized {
                monster: monster.id,
            });
        }
    }

    fn patrol(
        &self,
        monster: &MonsterSnapshot,
        site: PlanarPosition,
        player: PlanarPosition,
        respawn: &mut RespawnSampler,
        out: &mut Vec<Command>,
    ) {
        let distance = monster.position.distance(site);
        if distance > 0.0 {
            let scale = self.config.patrol_step / distance;
            let position = PlanarPosition::new(
                monster.position.x() + (site.x() - monster.position.x()) * scale,
                monster.position.z() + (site.z() - monster.position.z()) * scale,
            );
            out.push(Command::MoveMonster {
                monster: monster.id,
                position,
            });
        }

        if distance < self.config.arrival_radius {
            out.push(Command::RespawnMonster {
                monster: monster.id,
                position: respawn.sample(player),
            });
        }
    }

    fn pursuit_step(&self, speed: f32, elapsed: Duration) -> f32 {
        let reference = milliseconds(self.config.reference_frame);
        if reference <= 0.0 {
            return speed;
        }
        speed * milliseconds(elapsed) / reference
    }
}

impl Default for MonsterAi {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Moves `from` toward `to` by `step` along a single axis, staying put when aligned.
fn approach(from: f32, to: f32, step: f32) -> f32 {
    if from < to {
        from + step
    } else if from > to {
        from - step
    } else {
        from
    }
}

fn milliseconds(duration: Duration) -> f32 {
    duration.as_micros() as f32 / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_steps_by_sign_only() {
        assert_eq!(approach(0.0, 100.0, 0.5), 0.5);
        assert_eq!(approach(0.0, -100.0, 0.5), -0.5);
        assert_eq!(approach(3.0, 3.0, 0.5), 3.0);
    }

    #[test]
    fn pursuit_step_scales_with_elapsed_time() {
        let ai = MonsterAi::default();
        assert!((ai.pursuit_step(0.25, Duration::from_millis(16)) - 0.25).abs() < 1e-6);
        assert!((ai.pursuit_step(0.25, Duration::from_millis(32)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn milliseconds_keep_fractional_part() {
        assert_eq!(milliseconds(Duration::from_micros(1_500)), 1.5);
        assert_eq!(milliseconds(Duration::from_millis(50)), 50.0);
    }
}
