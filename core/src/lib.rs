#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outbreak simulation.
//!
//! This crate defines the message surface that connects the frame driver, the
//! authoritative world, and pure systems. The driver submits [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches and presentation [`Cue`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of distinct monster kinds roaming the level.
pub const MONSTER_KIND_COUNT: usize = 3;
/// Number of pre-allocated monster slots per kind.
pub const MONSTERS_PER_KIND: usize = 25;
/// Number of outbreak event sites, and therefore first-aid items.
pub const EVENT_SITE_COUNT: usize = 3;
/// Capacity of the hit-marker ring buffer.
pub const HIT_MARKER_CAPACITY: usize = 25;

/// Upper bound of the player's health meter.
pub const MAX_HEALTH: f32 = 3_000.0;
/// Half the side length of the square playable area centred on the origin.
pub const WORLD_HALF_EXTENT: f32 = 750.0;

/// Distance under which a monster unconditionally pursues the player.
pub const AGGRO_RADIUS: f32 = 150.0;
/// Distance under which a pursuing monster stops closing in.
pub const STOP_RADIUS: f32 = 10.0;
/// Distance under which a pursuing monster drains the player's health.
pub const DAMAGE_RADIUS: f32 = 15.0;
/// Distance under which a pursuing monster vocalises.
pub const AUDIO_RADIUS: f32 = 75.0;
/// Fixed per-tick distance covered by a patrolling monster.
pub const PATROL_STEP: f32 = 25.0 * 0.01;
/// Distance to its site under which a patrolling monster is respawned.
pub const SITE_ARRIVAL_RADIUS: f32 = 5.0;
/// Minimum planar distance between a respawned monster and the player.
pub const MIN_SPAWN_DISTANCE: f32 = 250.0;
/// Distance under which the player collects a first-aid item.
pub const COLLECT_RADIUS: f32 = 10.0;
/// Health restored by a single first-aid item.
pub const FIRST_AID_RESTORE: f32 = 500.0;
/// Offset applied on both planar axes between a site and its first-aid item.
pub const FIRST_AID_OFFSET: f32 = 5.0;
/// Location collected items are parked at, far outside the playable area.
pub const COLLECTED_ITEM_PARKING: PlanarPosition = PlanarPosition::new(2_000.0, 2_000.0);
/// Number of hits that kill a monster.
pub const HITS_TO_KILL: u8 = 3;
/// Base display duration of a hit marker.
pub const HIT_MARKER_DURATION: Duration = Duration::from_millis(1_000);
/// Height of monster positional audio sources above the ground.
pub const MONSTER_AUDIO_HEIGHT: f32 = 5.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a transition of the main game state.
    SetGameState {
        /// State the world should enter if the transition is permitted.
        state: GameState,
    },
    /// Debug override that forces victory from any non-terminal state.
    ForceVictory,
    /// Flips the visibility of the instructions overlay.
    ToggleInstructions,
    /// Replaces the player's movement command and run modifier.
    SetMovement {
        /// Directional movement bitmask.
        movement: Movement,
        /// Whether the fast-movement modifier is held.
        running: bool,
    },
    /// Stores the pose produced by the locomotion integrator.
    SetPlayerPose {
        /// New eye position of the player.
        position: WorldPosition,
        /// New view direction of the player.
        heading: Heading,
    },
    /// Relocates a monster after AI integration.
    MoveMonster {
        /// Monster being moved.
        monster: MonsterId,
        /// Destination on the ground plane.
        position: PlanarPosition,
    },
    /// Drains the player's health by the provided amount.
    DamagePlayer {
        /// Health points removed, one per millisecond of proximity.
        amount: f32,
    },
    /// Records a landed attack against a monster.
    RegisterHit {
        /// Monster that was struck.
        monster: MonsterId,
        /// Display countdown assigned to the resulting hit marker.
        marker_duration: Duration,
    },
    /// Counts every hit marker down by the frame time. Applied after the
    /// tick's attacks so new markers age in the frame that creates them.
    AgeHitMarkers {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places a monster at a fresh location and clears its wounds.
    RespawnMonster {
        /// Monster being respawned.
        monster: MonsterId,
        /// Sampled spawn location.
        position: PlanarPosition,
    },
    /// Collects the first-aid item belonging to a site.
    CollectFirstAid {
        /// Site that owns the item.
        site: SiteId,
    },
    /// Publishes a freshly computed score.
    RecordScore {
        /// Score derived from kills, elapsed time, and health.
        score: u32,
    },
    /// Replaces the per-monster visibility flags with the render pass output.
    RecordVisibility {
        /// Monsters that intersected the view frustum.
        visible: Vec<MonsterId>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of wall-clock time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a transition of the main game state.
    GameStateChanged {
        /// State that was left.
        from: GameState,
        /// State that became active.
        to: GameState,
    },
    /// Announces that the instructions overlay was shown or hidden.
    InstructionsToggled {
        /// Whether the overlay is now visible.
        visible: bool,
    },
    /// Confirms that the player lost health.
    PlayerDamaged {
        /// Health points removed.
        amount: f32,
        /// Health remaining after the damage was applied.
        health: f32,
    },
    /// Confirms that an attack landed on a monster.
    MonsterHit {
        /// Monster that was struck.
        monster: MonsterId,
        /// Hits accumulated by the monster, including this one.
        hits: u8,
        /// Location of the spawned hit marker.
        marker: WorldPosition,
    },
    /// Confirms that a monster accumulated enough hits to die.
    MonsterKilled {
        /// Monster that was killed.
        monster: MonsterId,
    },
    /// Confirms that a monster re-entered the level.
    MonsterRespawned {
        /// Monster that was respawned.
        monster: MonsterId,
        /// Location the monster now occupies.
        position: PlanarPosition,
    },
    /// Confirms that a first-aid item was collected.
    FirstAidCollected {
        /// Site that owned the item.
        site: SiteId,
        /// Health after restoration.
        health: f32,
    },
}

/// Presentation triggers emitted by systems that do not mutate the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A pursuing monster is close enough to be heard.
    MonsterVocalized {
        /// Monster producing the sound.
        monster: MonsterId,
    },
    /// The wounded player coughs; more frequent at lower health.
    Distress,
    /// The player fired a shot.
    ShotFired,
}

/// Main state of a playthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen shown before the player confirms.
    Title,
    /// Active gameplay.
    Playing,
    /// Terminal state entered when health is exhausted.
    GameOver,
    /// Terminal state entered when every first-aid item is collected.
    Victory,
}

impl GameState {
    /// Reports whether the state latches for the rest of the process lifetime.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }

    /// Reports whether gameplay mutation is processed in this state.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Reports whether the regular state machine permits moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: GameState) -> bool {
        matches!(
            (self, next),
            (Self::Title, Self::Playing)
                | (Self::Playing, Self::GameOver)
                | (Self::Playing, Self::Victory)
        )
    }
}

/// Species of monster; each kind has its own speed, bounds, and patrol site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Slow walker.
    Shambler,
    /// Medium-paced walker.
    Stalker,
    /// Fast, low-profile crawler.
    Crawler,
}

impl MonsterKind {
    /// Every monster kind in index order.
    pub const ALL: [MonsterKind; MONSTER_KIND_COUNT] =
        [Self::Shambler, Self::Stalker, Self::Crawler];

    /// Zero-based index of the kind.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Shambler => 0,
            Self::Stalker => 1,
            Self::Crawler => 2,
        }
    }

    /// Distance covered per pursuit step at the reference frame duration.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Shambler => 0.15,
            Self::Stalker => 0.25,
            Self::Crawler => 0.35,
        }
    }

    /// Radius of the kind's bounding sphere.
    #[must_use]
    pub const fn bounding_radius(self) -> f32 {
        match self {
            Self::Shambler | Self::Stalker => 5.0,
            Self::Crawler => 4.0,
        }
    }

    /// Height of the bounding sphere centre above the ground.
    #[must_use]
    pub const fn center_height(self) -> f32 {
        match self {
            Self::Shambler | Self::Stalker => 7.0,
            Self::Crawler => 2.5,
        }
    }

    /// Event site the kind patrols toward.
    #[must_use]
    pub const fn patrol_site(self) -> SiteId {
        SiteId::new(self.index() as u8)
    }

    /// Bounding sphere of a monster of this kind standing at `position`.
    #[must_use]
    pub fn bounding_sphere_at(self, position: PlanarPosition) -> BoundingSphere {
        BoundingSphere::new(
            WorldPosition::new(position.x(), self.center_height(), position.z()),
            self.bounding_radius(),
        )
    }
}

/// Identity of a monster: its kind and the slot it occupies in the kind's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId {
    kind: MonsterKind,
    slot: u16,
}

impl MonsterId {
    /// Creates a new monster identifier.
    #[must_use]
    pub const fn new(kind: MonsterKind, slot: u16) -> Self {
        Self { kind, slot }
    }

    /// Kind of the monster.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Slot within the kind's table.
    #[must_use]
    pub const fn slot(&self) -> u16 {
        self.slot
    }

    /// Dense index across all kinds, usable for flat tables.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.kind.index() * MONSTERS_PER_KIND + self.slot as usize
    }

    /// Iterator over every monster identifier in index order.
    pub fn all() -> impl Iterator<Item = MonsterId> {
        MonsterKind::ALL.into_iter().flat_map(|kind| {
            (0..MONSTERS_PER_KIND as u16).map(move |slot| MonsterId::new(kind, slot))
        })
    }
}

/// Identifier of an outbreak event site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(u8);

impl SiteId {
    /// Creates a new site identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Iterator over every site identifier.
    pub fn all() -> impl Iterator<Item = SiteId> {
        (0..EVENT_SITE_COUNT as u8).map(SiteId::new)
    }
}

/// Location on the ground plane; the vertical coordinate is implicit.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPosition {
    x: f32,
    z: f32,
}

impl PlanarPosition {
    /// Creates a new planar position.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Coordinate along the x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Euclidean distance to `other` on the ground plane.
    #[must_use]
    pub fn distance(self, other: PlanarPosition) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Lifts the position to the provided height.
    #[must_use]
    pub const fn at_height(self, y: f32) -> WorldPosition {
        WorldPosition::new(self.x, y, self.z)
    }
}

/// Point in world space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    x: f32,
    y: f32,
    z: f32,
}

impl WorldPosition {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along the x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the vertical axis.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Coordinate along the z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Projects the point onto the ground plane.
    #[must_use]
    pub const fn planar(&self) -> PlanarPosition {
        PlanarPosition::new(self.x, self.z)
    }
}

/// Direction the player is looking toward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    x: f32,
    y: f32,
    z: f32,
}

impl Heading {
    /// Heading along the positive z axis.
    pub const FORWARD: Heading = Heading::new(0.0, 0.0, 1.0);

    /// Creates a new heading from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component along the x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Component along the vertical axis.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Component along the z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::FORWARD
    }
}

/// Directional movement bitmask held by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Movement(u8);

impl Movement {
    /// No movement requested.
    pub const IDLE: Movement = Movement(0);
    /// Walk forward along the heading.
    pub const FORWARD: Movement = Movement(0b0001);
    /// Walk backward against the heading.
    pub const BACK: Movement = Movement(0b0010);
    /// Strafe left.
    pub const LEFT: Movement = Movement(0b0100);
    /// Strafe right.
    pub const RIGHT: Movement = Movement(0b1000);

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns the mask with `other` added.
    #[must_use]
    pub const fn with(self, other: Movement) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the mask with `other` cleared.
    #[must_use]
    pub const fn without(self, other: Movement) -> Self {
        Self(self.0 & !other.0)
    }

    /// Reports whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Movement) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        self.0 == 0
    }
}

/// Relation reported by spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The tested volume lies entirely within the reference volume.
    Inside,
    /// The tested volume partially overlaps the reference volume.
    Intersecting,
    /// The tested volume does not touch the reference volume.
    Outside,
}

impl Relation {
    /// Reports whether the relation counts as "in view" or "hit".
    #[must_use]
    pub const fn touches(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Half-line used for hit-testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Origin of the ray.
    pub origin: WorldPosition,
    /// Direction of travel; need not be normalised.
    pub direction: Heading,
}

/// Sphere bounding an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Centre of the sphere.
    pub center: WorldPosition,
    /// Radius of the sphere.
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    #[must_use]
    pub const fn new(center: WorldPosition, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned box expressed in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: WorldPosition,
    /// Maximum corner.
    pub max: WorldPosition,
}

/// Bounding-volume tests supplied by the rendering engine.
pub trait SpatialQuery {
    /// Classifies the ray against the sphere.
    fn ray_vs_sphere(&self, ray: &Ray, sphere: &BoundingSphere) -> Relation;

    /// Classifies the sphere against the current view frustum.
    fn sphere_vs_frustum(&self, sphere: &BoundingSphere) -> Relation;

    /// Classifies the box, translated by `offset`, against the current view frustum.
    fn box_vs_frustum(&self, bounds: &BoundingBox, offset: WorldPosition) -> Relation;
}

/// Immutable representation of a single monster used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Identity of the monster.
    pub id: MonsterId,
    /// Location on the ground plane.
    pub position: PlanarPosition,
    /// Hits accumulated since the last respawn.
    pub hits: u8,
    /// Visibility reported by the most recent render pass.
    pub visible: bool,
}

impl MonsterSnapshot {
    /// Bounding sphere of the monster at its current position.
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.id.kind().bounding_sphere_at(self.position)
    }

    /// Reports whether the monster has been wounded since its last respawn.
    #[must_use]
    pub const fn is_wounded(&self) -> bool {
        self.hits > 0
    }
}

/// Read-only snapshot describing every monster.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single monster.
    #[must_use]
    pub fn get(&self, monster: MonsterId) -> Option<&MonsterSnapshot> {
        self.snapshots
            .binary_search_by_key(&monster, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an event site and its first-aid item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventSiteSnapshot {
    /// Identifier of the site.
    pub id: SiteId,
    /// World location of the outbreak.
    pub location: WorldPosition,
    /// Current location of the site's first-aid item.
    pub first_aid: PlanarPosition,
    /// Whether the first-aid item has been collected.
    pub collected: bool,
}

/// Immutable representation of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Eye position of the player.
    pub position: WorldPosition,
    /// View direction of the player.
    pub heading: Heading,
    /// Directional movement currently held.
    pub movement: Movement,
    /// Whether the fast-movement modifier is held.
    pub running: bool,
    /// Current health.
    pub health: f32,
}

impl PlayerSnapshot {
    /// Health expressed as a whole percentage of [`MAX_HEALTH`].
    #[must_use]
    pub fn health_percentage(&self) -> u32 {
        health_percentage(self.health)
    }

    /// View ray used for attacks.
    #[must_use]
    pub const fn view_ray(&self) -> Ray {
        Ray {
            origin: self.position,
            direction: self.heading,
        }
    }
}

/// Converts a health value into a whole percentage of [`MAX_HEALTH`].
#[must_use]
pub fn health_percentage(health: f32) -> u32 {
    let ratio = (health / MAX_HEALTH).clamp(0.0, 1.0);
    (ratio * 100.0) as u32
}

/// Immutable representation of a live hit marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitMarkerSnapshot {
    /// Location the hit landed at.
    pub position: WorldPosition,
    /// Remaining display time.
    pub remaining: Duration,
}

impl HitMarkerSnapshot {
    /// Vertical rise of the marker as it ages, reaching 10 units at expiry.
    #[must_use]
    pub fn rise(&self) -> f32 {
        let remaining_ms = self.remaining.as_secs_f32() * 1_000.0;
        (1.0 - remaining_ms / 1_000.0) * 10.0
    }
}

/// Progress counters of the current playthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// Whole seconds elapsed since the process started ticking.
    pub elapsed_seconds: u32,
    /// Monsters killed by the player.
    pub kills: u32,
    /// Most recently published score.
    pub score: u32,
}
