#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves the player's attacks against visible monsters.

use std::time::Duration;

use outbreak_core::{
    Command, Cue, GameState, MonsterView, PlayerSnapshot, SpatialQuery, HITS_TO_KILL,
    HIT_MARKER_DURATION,
};
use outbreak_system_respawn::RespawnSampler;

/// Configuration parameters required to construct the combat resolver.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    hits_to_kill: u8,
    marker_duration: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Hit markers are displayed for `marker_duration` plus the elapsed time of
    /// the frame in which the attack landed.
    #[must_use]
    pub const fn new(hits_to_kill: u8, marker_duration: Duration) -> Self {
        Self {
            hits_to_kill,
            marker_duration,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(HITS_TO_KILL, HIT_MARKER_DURATION)
    }
}

/// Combat resolver that turns attack inputs into hit and respawn commands.
#[derive(Debug)]
pub struct Combat {
    config: Config,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat resolver with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Resolves a single attack.
    ///
    /// Only monsters flagged visible by the most recent render pass are tested,
    /// each at most once, so a single attack may wound several monsters.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_attack<Q>(
        &mut self,
        state: GameState,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        spatial: &Q,
        elapsed: Duration,
        respawn: &mut RespawnSampler,
        out: &mut Vec<Command>,
        cues: &mut Vec<Cue>,
    ) where
        Q: SpatialQuery + ?Sized,
    {
        if !state.is_playing() {
            return;
        }

        cues.push(Cue::ShotFired);

        let ray = player.view_ray();
        let marker_duration = self.config.marker_duration.saturating_add(elapsed);
        self.scratch.clear();

        for monster in monsters.iter().filter(|monster| monster.visible) {
            if !spatial
                .ray_vs_sphere(&ray, &monster.bounding_sphere())
                .touches()
            {
                continue;
            }

            self.scratch.push(Command::RegisterHit {
                monster: monster.id,
                marker_duration,
            });

            if monster.hits.saturating_add(1) >= self.config.hits_to_kill {
                self.scratch.push(Command::RespawnMonster {
                    monster: monster.id,
                    position: respawn.sample(player.position.planar()),
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

impl Default for Combat {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
