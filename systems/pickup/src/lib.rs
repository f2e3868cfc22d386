#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that collects first-aid items the player walks over.

use outbreak_core::{Command, EventSiteSnapshot, GameState, PlayerSnapshot, COLLECT_RADIUS};

/// Configuration parameters required to construct the pickup system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    collect_radius: f32,
}

impl Config {
    /// Creates a new configuration using the provided collection radius.
    #[must_use]
    pub const fn new(collect_radius: f32) -> Self {
        Self { collect_radius }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(COLLECT_RADIUS)
    }
}

/// Pickup system that emits collection commands for nearby items.
#[derive(Debug)]
pub struct Pickup {
    collect_radius: f32,
}

impl Pickup {
    /// Creates a new pickup system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            collect_radius: config.collect_radius,
        }
    }

    /// Emits `Command::CollectFirstAid` for every uncollected item in reach.
    ///
    /// Items are only picked up on ticks where the player is moving.
    pub fn handle(
        &mut self,
        state: GameState,
        player: &PlayerSnapshot,
        sites: &[EventSiteSnapshot],
        out: &mut Vec<Command>,
    ) {
        if !state.is_playing() || player.movement.is_idle() {
            return;
        }

        let position = player.position.planar();
        out.extend(
            sites
                .iter()
                .filter(|site| !site.collected)
                .filter(|site| site.first_aid.distance(position) < self.collect_radius)
                .map(|site| Command::CollectFirstAid { site: site.id }),
        );
    }
}

impl Default for Pickup {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
