//! Seeded generation of the level layout.

use outbreak_core::{
    MonsterId, PlanarPosition, SiteId, WorldPosition, EVENT_SITE_COUNT, FIRST_AID_OFFSET,
    WORLD_HALF_EXTENT,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug)]
pub(crate) struct SiteSeed {
    pub(crate) id: SiteId,
    pub(crate) location: WorldPosition,
    pub(crate) first_aid: PlanarPosition,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct MonsterSeed {
    pub(crate) id: MonsterId,
    pub(crate) position: PlanarPosition,
}

#[derive(Clone, Debug)]
pub(crate) struct Layout {
    pub(crate) sites: Vec<SiteSeed>,
    pub(crate) monsters: Vec<MonsterSeed>,
}

/// Draws site and monster placements uniformly from the world bounds.
pub(crate) fn generate(seed: u64) -> Layout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let sites: Vec<SiteSeed> = SiteId::all()
        .map(|id| {
            let ground = random_point(&mut rng);
            SiteSeed {
                id,
                location: ground.at_height(0.0),
                first_aid: PlanarPosition::new(
                    ground.x() + FIRST_AID_OFFSET,
                    ground.z() + FIRST_AID_OFFSET,
                ),
            }
        })
        .collect();
    debug_assert_eq!(sites.len(), EVENT_SITE_COUNT);

    let monsters = MonsterId::all()
        .map(|id| MonsterSeed {
            id,
            position: random_point(&mut rng),
        })
        .collect();

    Layout { sites, monsters }
}

fn random_point(rng: &mut ChaCha8Rng) -> PlanarPosition {
    PlanarPosition::new(
        rng.gen_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
        rng.gen_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
    )
}
