//! Per-frame scene capture consumed by rendering backends.

use glam::{Mat4, Quat, Vec3};
use outbreak_core::{
    BoundingBox, BoundingSphere, Command, EventSiteSnapshot, GameState, Heading,
    HitMarkerSnapshot, MonsterId, MonsterView, PlayerSnapshot, ProgressSnapshot, SiteId,
    SpatialQuery, WorldPosition,
};

use crate::frustum::{heading_vec, vec3};

/// Height added above a hit marker's anchor before applying its rise.
const HIT_MARKER_LIFT: f32 = 9.0;
/// Bounding sphere radius of a first-aid billboard.
const FIRST_AID_RADIUS: f32 = 3.0;
/// Bounds of the fire effect burning at an event site.
const SITE_EFFECT_BOUNDS: BoundingBox = BoundingBox {
    min: WorldPosition::new(-8.0, 0.0, -8.0),
    max: WorldPosition::new(8.0, 20.0, 8.0),
};

const CRITICAL_HEALTH: f32 = 1_000.0;
const WOUNDED_HEALTH: f32 = 2_000.0;

/// Coarse health classification used to colour the health bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthBand {
    /// Below 1000 health.
    Critical,
    /// At least 1000 but below 2000 health.
    Wounded,
    /// 2000 health or more.
    Healthy,
}

impl HealthBand {
    /// Classifies a health value.
    #[must_use]
    pub fn from_health(health: f32) -> Self {
        if health < CRITICAL_HEALTH {
            Self::Critical
        } else if health < WOUNDED_HEALTH {
            Self::Wounded
        } else {
            Self::Healthy
        }
    }
}

/// Values shown on the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Main game state, selecting the title, play, or end screens.
    pub state: GameState,
    /// Whether the instructions overlay is drawn.
    pub instructions_visible: bool,
    /// Player health as a whole percentage.
    pub health_percentage: u32,
    /// Health band used for the bar colour.
    pub health_band: HealthBand,
    /// Most recently published score.
    pub score: u32,
    /// Monsters killed so far.
    pub kills: u32,
    /// Whole seconds since the process started.
    pub elapsed_seconds: u32,
}

/// Billboarded monster that survived frustum culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterPresentation {
    /// Monster being drawn.
    pub id: MonsterId,
    /// Model transform facing the camera.
    pub transform: Mat4,
    /// Whether the monster carries the wounded particle effect.
    pub wounded: bool,
}

/// Uncollected first-aid item that survived frustum culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstAidPresentation {
    /// Site owning the item.
    pub site: SiteId,
    /// Model transform facing the camera.
    pub transform: Mat4,
}

/// Fire effect burning at an event site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteEffectPresentation {
    /// Site the effect belongs to.
    pub site: SiteId,
    /// Effect transform.
    pub transform: Mat4,
}

/// Floating hit marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitMarkerPresentation {
    /// Marker transform, already raised by the marker's age.
    pub transform: Mat4,
}

/// Scene description assembled from world snapshots for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Camera eye position.
    pub eye: WorldPosition,
    /// Camera view direction.
    pub heading: Heading,
    /// Monsters inside the view frustum.
    pub monsters: Vec<MonsterPresentation>,
    /// First-aid items inside the view frustum.
    pub first_aid: Vec<FirstAidPresentation>,
    /// Site effects inside the view frustum.
    pub site_effects: Vec<SiteEffectPresentation>,
    /// Live hit markers.
    pub hit_markers: Vec<HitMarkerPresentation>,
    /// Heads-up display values.
    pub hud: Hud,
}

impl Scene {
    /// Captures the frame visible to the player.
    ///
    /// Monsters, items, and effects are culled against `spatial`; the set of
    /// monsters that survive culling becomes next frame's attack candidates.
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Capture enumerates every world channel explicitly.
    pub fn capture<Q>(
        state: GameState,
        instructions_visible: bool,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        sites: &[EventSiteSnapshot],
        hit_markers: &[HitMarkerSnapshot],
        progress: ProgressSnapshot,
        spatial: &Q,
    ) -> Self
    where
        Q: SpatialQuery + ?Sized,
    {
        let billboard = billboard_rotation(player.heading);

        let monsters = monsters
            .iter()
            .filter(|monster| {
                spatial
                    .sphere_vs_frustum(&monster.bounding_sphere())
                    .touches()
            })
            .map(|monster| MonsterPresentation {
                id: monster.id,
                transform: Mat4::from_rotation_translation(
                    billboard,
                    vec3(monster.position.at_height(0.0)),
                ),
                wounded: monster.is_wounded(),
            })
            .collect();

        let first_aid = sites
            .iter()
            .filter(|site| !site.collected)
            .filter(|site| {
                let sphere = BoundingSphere::new(
                    site.first_aid.at_height(site.location.y()),
                    FIRST_AID_RADIUS,
                );
                spatial.sphere_vs_frustum(&sphere).touches()
            })
            .map(|site| FirstAidPresentation {
                site: site.id,
                transform: Mat4::from_rotation_translation(
                    billboard,
                    vec3(site.first_aid.at_height(site.location.y())),
                ),
            })
            .collect();

        let site_effects = sites
            .iter()
            .filter(|site| {
                spatial
                    .box_vs_frustum(&SITE_EFFECT_BOUNDS, site.location)
                    .touches()
            })
            .map(|site| SiteEffectPresentation {
                site: site.id,
                transform: Mat4::from_translation(vec3(site.location)),
            })
            .collect();

        let hit_markers = hit_markers
            .iter()
            .map(|marker| {
                let anchor = vec3(marker.position);
                let lifted = anchor + Vec3::Y * (marker.rise() + HIT_MARKER_LIFT);
                HitMarkerPresentation {
                    transform: Mat4::from_rotation_translation(billboard, lifted),
                }
            })
            .collect();

        Self {
            eye: player.position,
            heading: player.heading,
            monsters,
            first_aid,
            site_effects,
            hit_markers,
            hud: Hud {
                state,
                instructions_visible,
                health_percentage: player.health_percentage(),
                health_band: HealthBand::from_health(player.health),
                score: progress.score,
                kills: progress.kills,
                elapsed_seconds: progress.elapsed_seconds,
            },
        }
    }

    /// Monsters that survived culling, in identifier order.
    #[must_use]
    pub fn visible_monsters(&self) -> Vec<MonsterId> {
        self.monsters.iter().map(|monster| monster.id).collect()
    }

    /// Command that publishes this frame's visibility flags to the world.
    #[must_use]
    pub fn visibility_command(&self) -> Command {
        Command::RecordVisibility {
            visible: self.visible_monsters(),
        }
    }
}

/// Rotation about the vertical axis that turns a `+z` facing billboard toward the camera.
fn billboard_rotation(heading: Heading) -> Quat {
    let direction = heading_vec(heading);
    if direction.x == 0.0 && direction.z == 0.0 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y((-direction.x).atan2(-direction.z))
}
