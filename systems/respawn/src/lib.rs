#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded sampler that chooses where killed or arrived monsters re-enter the level.

use log::warn;
use outbreak_core::{PlanarPosition, MIN_SPAWN_DISTANCE, WORLD_HALF_EXTENT};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
const DEFAULT_ATTEMPTS: u32 = 64;

/// Configuration parameters required to construct the respawn sampler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    half_extent: f32,
    min_distance: f32,
    max_attempts: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Positions are drawn from the square `[-half_extent, half_extent)` on both
    /// axes and rejected while closer than `min_distance` to the player. After
    /// `max_attempts` rejections the next draw is accepted unconditionally.
    #[must_use]
    pub const fn new(rng_seed: u64, half_extent: f32, min_distance: f32, max_attempts: u32) -> Self {
        Self {
            rng_seed,
            half_extent,
            min_distance,
            max_attempts,
        }
    }

    /// Returns a copy of the configuration using a different seed.
    #[must_use]
    pub const fn with_seed(self, rng_seed: u64) -> Self {
        Self { rng_seed, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SEED,
            WORLD_HALF_EXTENT,
            MIN_SPAWN_DISTANCE,
            DEFAULT_ATTEMPTS,
        )
    }
}

/// Rejection sampler for respawn locations.
#[derive(Debug)]
pub struct RespawnSampler {
    rng: ChaCha8Rng,
    half_extent: f32,
    min_distance: f32,
    max_attempts: u32,
}

impl RespawnSampler {
    /// Creates a new sampler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            half_extent: config.half_extent.abs(),
            min_distance: config.min_distance,
            max_attempts: config.max_attempts,
        }
    }

    /// Draws a position at least the configured minimum distance from `player`.
    ///
    /// When the retry budget is exhausted, which can only happen if the bounds
    /// leave no admissible area, the final unconstrained draw is returned.
    pub fn sample(&mut self, player: PlanarPosition) -> PlanarPosition {
        for _ in 0..self.max_attempts {
            let candidate = self.draw();
            if candidate.distance(player) >= self.min_distance {
                return candidate;
            }
        }

        let fallback = self.draw();
        warn!(
            "respawn sampler exhausted {} attempts near ({}, {}); using unconstrained draw",
            self.max_attempts,
            player.x(),
            player.z()
        );
        fallback
    }

    fn draw(&mut self) -> PlanarPosition {
        if self.half_extent == 0.0 {
            return PlanarPosition::default();
        }
        PlanarPosition::new(
            self.rng.gen_range(-self.half_extent..self.half_extent),
            self.rng.gen_range(-self.half_extent..self.half_extent),
        )
    }
}

impl Default for RespawnSampler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
