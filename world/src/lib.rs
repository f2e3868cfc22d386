#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Outbreak.

mod hit_markers;
mod layout;
mod player;

use std::time::Duration;

use log::{debug, info};
use outbreak_core::{
    Command, Event, GameState, MonsterId, PlanarPosition, SiteId, WorldPosition,
    COLLECTED_ITEM_PARKING, EVENT_SITE_COUNT, FIRST_AID_RESTORE, HITS_TO_KILL,
    MONSTERS_PER_KIND, MONSTER_KIND_COUNT,
};

use self::{hit_markers::HitMarkerRing, player::Player};

const DEFAULT_LAYOUT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const MONSTER_COUNT: usize = MONSTER_KIND_COUNT * MONSTERS_PER_KIND;
const SECOND: Duration = Duration::from_secs(1);

/// Represents the authoritative Outbreak world state.
#[derive(Debug)]
pub struct World {
    state: GameState,
    instructions_visible: bool,
    player: Player,
    monsters: [Monster; MONSTER_COUNT],
    sites: [EventSite; EVENT_SITE_COUNT],
    hit_markers: HitMarkerRing,
    clock: ProgressClock,
    kills: u32,
    score: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world on the title screen using the default layout seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_LAYOUT_SEED)
    }

    /// Creates a new world whose layout is drawn from the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let layout = layout::generate(seed);

        let mut monsters = [Monster::default(); MONSTER_COUNT];
        for seed in &layout.monsters {
            monsters[seed.id.index()].position = seed.position;
        }

        let mut sites = [EventSite::default(); EVENT_SITE_COUNT];
        for seed in &layout.sites {
            sites[usize::from(seed.id.get())] = EventSite {
                location: seed.location,
                first_aid: seed.first_aid,
                collected: false,
            };
        }

        Self {
            state: GameState::Title,
            instructions_visible: false,
            player: Player::spawn(),
            monsters,
            sites,
            hit_markers: HitMarkerRing::new(),
            clock: ProgressClock::default(),
            kills: 0,
            score: 0,
            tick_index: 0,
        }
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        self.state = to;
        info!("game state changed from {from:?} to {to:?}");
        out_events.push(Event::GameStateChanged { from, to });
    }

    fn monster_mut(&mut self, monster: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(monster.index())
    }

    fn site_mut(&mut self, site: SiteId) -> Option<&mut EventSite> {
        self.sites.get_mut(usize::from(site.get()))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay mutations (movement, monster updates, damage, hits, pickups) are
/// ignored unless the world is in [`GameState::Playing`], which suspends them on
/// the title screen and after either terminal state has latched.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock.advance(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::AgeHitMarkers { dt } => {
            if world.state.is_playing() {
                world.hit_markers.advance(dt);
            }
        }
        Command::SetGameState { state } => {
            if world.state.can_transition_to(state) {
                world.transition(state, out_events);
            } else {
                debug!("rejected game state change from {:?} to {state:?}", world.state);
            }
        }
        Command::ForceVictory => {
            if world.state.is_terminal() {
                debug!("ignored forced victory in terminal state {:?}", world.state);
            } else {
                world.transition(GameState::Victory, out_events);
            }
        }
        Command::ToggleInstructions => {
            world.instructions_visible = !world.instructions_visible;
            out_events.push(Event::InstructionsToggled {
                visible: world.instructions_visible,
            });
        }
        Command::SetMovement { movement, running } => {
            if world.state.is_playing() {
                world.player.set_movement(movement, running);
            }
        }
        Command::SetPlayerPose { position, heading } => {
            if world.state.is_playing() {
                world.player.set_pose(position, heading);
            }
        }
        Command::MoveMonster { monster, position } => {
            if !world.state.is_playing() {
                return;
            }
            if let Some(entry) = world.monster_mut(monster) {
                entry.position = position;
            }
        }
        Command::DamagePlayer { amount } => {
            if !world.state.is_playing() {
                return;
            }
            let removed = world.player.damage(amount);
            if removed > 0.0 {
                out_events.push(Event::PlayerDamaged {
                    amount: removed,
                    health: world.player.health(),
                });
            }
        }
        Command::RegisterHit {
            monster,
            marker_duration,
        } => {
            if !world.state.is_playing() {
                return;
            }
            let Some(entry) = world.monster_mut(monster) else {
                return;
            };
            let was_alive = entry.hits < HITS_TO_KILL;
            entry.hits = entry.hits.saturating_add(1).min(HITS_TO_KILL);
            let hits = entry.hits;
            let marker = monster.kind().bounding_sphere_at(entry.position).center;

            world.hit_markers.push(marker, marker_duration);
            out_events.push(Event::MonsterHit {
                monster,
                hits,
                marker,
            });

            if was_alive && hits >= HITS_TO_KILL {
                world.kills = world.kills.saturating_add(1);
                info!("monster {monster:?} killed, {} kills total", world.kills);
                out_events.push(Event::MonsterKilled { monster });
            }
        }
        Command::RespawnMonster { monster, position } => {
            if !world.state.is_playing() {
                return;
            }
            if let Some(entry) = world.monster_mut(monster) {
                entry.position = position;
                entry.hits = 0;
                out_events.push(Event::MonsterRespawned { monster, position });
            }
        }
        Command::CollectFirstAid { site } => {
            if !world.state.is_playing() {
                return;
            }
            if world.player.health() <= 0.0 {
                debug!("first aid at site {} left in place, player is dead", site.get());
                return;
            }
            let Some(entry) = world.site_mut(site) else {
                return;
            };
            if entry.collected {
                return;
            }
            entry.collected = true;
            entry.first_aid = COLLECTED_ITEM_PARKING;
            world.player.restore(FIRST_AID_RESTORE);
            let health = world.player.health();
            info!("first aid at site {} collected, health {health}", site.get());
            out_events.push(Event::FirstAidCollected { site, health });
        }
        Command::RecordScore { score } => {
            if world.state != GameState::Victory {
                world.score = score;
            }
        }
        Command::RecordVisibility { visible } => {
            for monster in &mut world.monsters {
                monster.visible = false;
            }
            for id in visible {
                if let Some(entry) = world.monster_mut(id) {
                    entry.visible = true;
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use outbreak_core::{
        EventSiteSnapshot, GameState, HitMarkerSnapshot, MonsterId, MonsterSnapshot, MonsterView,
        PlayerSnapshot, ProgressSnapshot, SiteId,
    };

    use super::World;

    /// Current main game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Whether the instructions overlay is shown.
    #[must_use]
    pub fn instructions_visible(world: &World) -> bool {
        world.instructions_visible
    }

    /// Captures the player's pose, intent, and health.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a single monster.
    #[must_use]
    pub fn monster(world: &World, monster: MonsterId) -> MonsterSnapshot {
        let entry = world.monsters[monster.index()];
        MonsterSnapshot {
            id: monster,
            position: entry.position,
            hits: entry.hits,
            visible: entry.visible,
        }
    }

    /// Captures a read-only view of every monster.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(MonsterId::all().map(|id| monster(world, id)).collect())
    }

    /// Captures every event site together with its first-aid item.
    #[must_use]
    pub fn event_sites(world: &World) -> Vec<EventSiteSnapshot> {
        SiteId::all()
            .map(|id| {
                let site = world.sites[usize::from(id.get())];
                EventSiteSnapshot {
                    id,
                    location: site.location,
                    first_aid: site.first_aid,
                    collected: site.collected,
                }
            })
            .collect()
    }

    /// Reports whether every first-aid item has been collected.
    #[must_use]
    pub fn all_first_aid_collected(world: &World) -> bool {
        world.sites.iter().all(|site| site.collected)
    }

    /// Captures the hit markers whose countdown has not expired.
    #[must_use]
    pub fn hit_markers(world: &World) -> Vec<HitMarkerSnapshot> {
        world.hit_markers.live()
    }

    /// Captures the playthrough progress counters.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        ProgressSnapshot {
            elapsed_seconds: world.clock.elapsed_seconds,
            kills: world.kills,
            score: world.score,
        }
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Monster {
    position: PlanarPosition,
    hits: u8,
    visible: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct EventSite {
    location: WorldPosition,
    first_aid: PlanarPosition,
    collected: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct ProgressClock {
    accumulated: Duration,
    elapsed_seconds: u32,
}

impl ProgressClock {
    fn advance(&mut self, dt: Duration) {
        self.accumulated = self.accumulated.saturating_add(dt);
        while self.accumulated >= SECOND {
            self.accumulated -= SECOND;
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }
}
