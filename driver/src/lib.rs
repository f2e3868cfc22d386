#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that sequences Outbreak's systems once per tick.
//!
//! The driver owns the world and every system, measures elapsed time through
//! a [`Clock`], and talks to the platform exclusively through the
//! [`InputSource`], [`AudioBackend`], [`Locomotion`], and
//! [`RenderingBackend`] seams.

mod audio;
mod collaborators;
mod input;
mod locomotion;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result as AnyResult};
use log::{debug, info};
use outbreak_core::{Command, Cue, Event, GameState};
use outbreak_rendering::{FrustumSpatialQuery, Projection, RenderingBackend, Scene};
use outbreak_system_combat::Combat;
use outbreak_system_monster_ai::MonsterAi;
use outbreak_system_pickup::Pickup;
use outbreak_system_progression::Progression;
use outbreak_system_respawn::RespawnSampler;
use outbreak_world::{self as world, query, World};
use thiserror::Error;

use self::input::{InputTranslator, Intent};

pub use audio::{AudioAssets, AudioRouter, SilentAudio};
pub use collaborators::{
    AudioBackend, Clock, InputEvent, InputSource, Key, Locomotion, MouseButton, MouseDelta,
    PlaybackMode, Pose, SoundHandle, SteppedClock, SystemClock,
};
pub use locomotion::FreeLook;

const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Startup failures of the frame driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A sound file could not be loaded by the audio backend.
    #[error("failed to load audio asset {}: {reason}", path.display())]
    AudioAsset {
        /// File that failed to load.
        path: PathBuf,
        /// Backend-provided failure description.
        reason: String,
    },
    /// A configuration value is out of range.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Aggregated configuration of every system the driver runs.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    /// Seed of the level layout.
    pub layout_seed: u64,
    /// Respawn sampler configuration.
    pub respawn: outbreak_system_respawn::Config,
    /// Monster AI configuration.
    pub monster_ai: outbreak_system_monster_ai::Config,
    /// Combat configuration.
    pub combat: outbreak_system_combat::Config,
    /// Pickup configuration.
    pub pickup: outbreak_system_pickup::Config,
    /// Progression configuration.
    pub progression: outbreak_system_progression::Config,
    /// Camera projection used for culling.
    pub projection: Projection,
}

impl DriverConfig {
    /// Creates a default configuration whose layout and respawn draws derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            layout_seed: seed,
            respawn: outbreak_system_respawn::Config::default().with_seed(seed.rotate_left(32)),
            monster_ai: outbreak_system_monster_ai::Config::default(),
            combat: outbreak_system_combat::Config::default(),
            pickup: outbreak_system_pickup::Config::default(),
            progression: outbreak_system_progression::Config::default(),
            projection: Projection::default(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Platform collaborators consumed by the frame driver.
#[derive(Debug)]
pub struct Collaborators<A, I, L, C, R> {
    /// Audio device.
    pub audio: A,
    /// Input event source.
    pub input: I,
    /// Player pose integrator.
    pub locomotion: L,
    /// Time source.
    pub clock: C,
    /// Scene presenter.
    pub renderer: R,
}

/// Owns the world and runs every system in a fixed order each tick.
#[derive(Debug)]
pub struct FrameDriver<A, I, L, C, R> {
    world: World,
    collaborators: Collaborators<A, I, L, C, R>,
    projection: Projection,
    audio: AudioRouter,
    translator: InputTranslator,
    respawn: RespawnSampler,
    monster_ai: MonsterAi,
    combat: Combat,
    pickup: Pickup,
    progression: Progression,
    last_tick: Option<Duration>,
    quit: bool,
    events: Vec<Event>,
    commands: Vec<Command>,
    cues: Vec<Cue>,
}

impl<A, I, L, C, R> FrameDriver<A, I, L, C, R>
where
    A: AudioBackend,
    I: InputSource,
    L: Locomotion,
    C: Clock,
    R: RenderingBackend,
{
    /// Builds the world and systems and loads every sound.
    pub fn new(
        config: DriverConfig,
        assets: &AudioAssets,
        mut collaborators: Collaborators<A, I, L, C, R>,
    ) -> Result<Self, DriverError> {
        let audio = AudioRouter::load(&mut collaborators.audio, assets)?;

        Ok(Self {
            world: World::with_seed(config.layout_seed),
            collaborators,
            projection: config.projection,
            audio,
            translator: InputTranslator::default(),
            respawn: RespawnSampler::new(config.respawn),
            monster_ai: MonsterAi::new(config.monster_ai),
            combat: Combat::new(config.combat),
            pickup: Pickup::new(config.pickup),
            progression: Progression::new(config.progression),
            last_tick: None,
            quit: false,
            events: Vec::new(),
            commands: Vec::new(),
            cues: Vec::new(),
        })
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Platform collaborators owned by the driver.
    #[must_use]
    pub fn collaborators(&self) -> &Collaborators<A, I, L, C, R> {
        &self.collaborators
    }

    /// Reports whether a quit request has been received.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Runs ticks until quit is requested or `max_ticks` have run.
    ///
    /// Returns the number of ticks executed.
    pub fn run(&mut self, max_ticks: Option<u64>) -> AnyResult<u64> {
        let mut ticks = 0_u64;
        while !self.quit && max_ticks.map_or(true, |limit| ticks < limit) {
            self.tick()?;
            ticks += 1;
        }
        info!(
            "frame driver stopped after {ticks} ticks in state {:?}",
            query::game_state(&self.world)
        );
        Ok(ticks)
    }

    /// Runs one complete tick. Does nothing once quit has been requested.
    pub fn tick(&mut self) -> AnyResult<()> {
        if self.quit {
            return Ok(());
        }

        let now = self.collaborators.clock.now();
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);

        self.events.clear();
        self.cues.clear();
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let attacks = self.process_input();
        self.integrate_player(dt);

        let player = query::player(&self.world);
        let monsters = query::monster_view(&self.world);
        let sites = query::event_sites(&self.world);
        self.monster_ai.handle(
            &self.events,
            query::game_state(&self.world),
            &player,
            &monsters,
            &sites,
            &mut self.respawn,
            &mut self.commands,
            &mut self.cues,
        );
        self.flush_commands();

        for _ in 0..attacks {
            let player = query::player(&self.world);
            let monsters = query::monster_view(&self.world);
            let spatial = FrustumSpatialQuery::from_player(self.projection, &player);
            self.combat.handle_attack(
                query::game_state(&self.world),
                &player,
                &monsters,
                &spatial,
                dt,
                &mut self.respawn,
                &mut self.commands,
                &mut self.cues,
            );
            self.flush_commands();
        }
        world::apply(
            &mut self.world,
            Command::AgeHitMarkers { dt },
            &mut self.events,
        );

        let player = query::player(&self.world);
        let sites = query::event_sites(&self.world);
        self.pickup.handle(
            query::game_state(&self.world),
            &player,
            &sites,
            &mut self.commands,
        );
        self.flush_commands();

        let player = query::player(&self.world);
        self.progression.handle(
            &self.events,
            query::game_state(&self.world),
            &player,
            query::progress(&self.world),
            query::all_first_aid_collected(&self.world),
            &mut self.commands,
            &mut self.cues,
        );
        self.flush_commands();

        let state = query::game_state(&self.world);
        let player = query::player(&self.world);
        let monsters = query::monster_view(&self.world);
        self.audio.update(
            &mut self.collaborators.audio,
            state,
            &player,
            &monsters,
            &self.events,
            &self.cues,
        );

        let spatial = FrustumSpatialQuery::from_player(self.projection, &player);
        let scene = Scene::capture(
            state,
            query::instructions_visible(&self.world),
            &player,
            &monsters,
            &query::event_sites(&self.world),
            &query::hit_markers(&self.world),
            query::progress(&self.world),
            &spatial,
        );
        let tick_index = query::tick_index(&self.world);
        self.collaborators
            .renderer
            .present(&scene)
            .with_context(|| format!("failed to present tick {tick_index}"))?;
        world::apply(&mut self.world, scene.visibility_command(), &mut self.events);

        debug!(
            "tick {} advanced {:?}: {} events, {} cues",
            query::tick_index(&self.world),
            dt,
            self.events.len(),
            self.cues.len()
        );
        Ok(())
    }

    /// Drains all pending input. Returns the number of attacks requested.
    fn process_input(&mut self) -> u32 {
        let mut attacks = 0_u32;
        while let Some(event) = self.collaborators.input.poll() {
            let state = query::game_state(&self.world);
            let command = match self.translator.translate(event, state) {
                Some(Intent::Quit) => {
                    info!("quit requested");
                    self.quit = true;
                    None
                }
                Some(Intent::ToggleInstructions) => Some(Command::ToggleInstructions),
                Some(Intent::Confirm) => Some(Command::SetGameState {
                    state: GameState::Playing,
                }),
                Some(Intent::ForceVictory) => Some(Command::ForceVictory),
                Some(Intent::Attack) => {
                    attacks = attacks.saturating_add(1);
                    None
                }
                None => None,
            };
            if let Some(command) = command {
                world::apply(&mut self.world, command, &mut self.events);
            }
        }

        let player = query::player(&self.world);
        let movement = self.translator.movement();
        let running = self.translator.running();
        if player.movement != movement || player.running != running {
            world::apply(
                &mut self.world,
                Command::SetMovement { movement, running },
                &mut self.events,
            );
        }
        attacks
    }

    fn integrate_player(&mut self, dt: Duration) {
        let look = self.collaborators.input.mouse_delta();
        if !query::game_state(&self.world).is_playing() {
            return;
        }

        let player = query::player(&self.world);
        let pose = self.collaborators.locomotion.integrate(
            Pose {
                position: player.position,
                heading: player.heading,
            },
            player.movement,
            player.running,
            look,
            dt,
        );
        world::apply(
            &mut self.world,
            Command::SetPlayerPose {
                position: pose.position,
                heading: pose.heading,
            },
            &mut self.events,
        );
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
