use std::time::Duration;

use outbreak_core::{
    BoundingSphere, Command, Cue, Event, GameState, Heading, MonsterId, MonsterKind,
    PlanarPosition, Ray, Relation, SpatialQuery, WorldPosition, MIN_SPAWN_DISTANCE,
};
use outbreak_rendering::{FrustumSpatialQuery, Projection, Scene};
use outbreak_system_combat::Combat;
use outbreak_system_respawn::RespawnSampler;
use outbreak_world::{self as world, query, World};

const PARKING: PlanarPosition = PlanarPosition::new(740.0, -740.0);

fn arena() -> World {
    let mut world = World::with_seed(0xa11);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetGameState {
            state: GameState::Playing,
        },
        &mut events,
    );
    for monster in MonsterId::all() {
        world::apply(
            &mut world,
            Command::RespawnMonster {
                monster,
                position: PARKING,
            },
            &mut events,
        );
    }
    world::apply(
        &mut world,
        Command::SetPlayerPose {
            position: WorldPosition::new(0.0, 6.0, 0.0),
            heading: Heading::new(0.0, 0.0, 1.0),
        },
        &mut events,
    );
    world
}

fn place(world: &mut World, monster: MonsterId, position: PlanarPosition) {
    let mut events = Vec::new();
    world::apply(world, Command::RespawnMonster { monster, position }, &mut events);
}

fn render(world: &mut World) {
    let player = query::player(world);
    let spatial = FrustumSpatialQuery::from_player(Projection::default(), &player);
    let scene = Scene::capture(
        query::game_state(world),
        query::instructions_visible(world),
        &player,
        &query::monster_view(world),
        &query::event_sites(world),
        &query::hit_markers(world),
        query::progress(world),
        &spatial,
    );
    let mut events = Vec::new();
    world::apply(world, scene.visibility_command(), &mut events);
}

fn attack(
    world: &mut World,
    combat: &mut Combat,
    sampler: &mut RespawnSampler,
) -> (Vec<Event>, Vec<Cue>) {
    let player = query::player(world);
    let spatial = FrustumSpatialQuery::from_player(Projection::default(), &player);
    let mut commands = Vec::new();
    let mut cues = Vec::new();
    combat.handle_attack(
        query::game_state(world),
        &player,
        &query::monster_view(world),
        &spatial,
        Duration::from_millis(16),
        sampler,
        &mut commands,
        &mut cues,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    (events, cues)
}

#[test]
fn three_attacks_kill_once_and_respawn_far_away() {
    let mut world = arena();
    let target = MonsterId::new(MonsterKind::Stalker, 5);
    place(&mut world, target, PlanarPosition::new(0.0, 60.0));
    render(&mut world);

    let mut combat = Combat::default();
    let mut sampler = RespawnSampler::default();
    for _ in 0..3 {
        let (_, cues) = attack(&mut world, &mut combat, &mut sampler);
        assert_eq!(cues, vec![Cue::ShotFired]);
    }

    let progress = query::progress(&world);
    assert_eq!(progress.kills, 1);

    let snapshot = query::monster(&world, target);
    assert_eq!(snapshot.hits, 0);
    let player = query::player(&world).position.planar();
    assert!(snapshot.position.distance(player) >= MIN_SPAWN_DISTANCE);
    assert_eq!(query::hit_markers(&world).len(), 3);
}

#[test]
fn crawler_sphere_is_hit_at_its_own_height() {
    let mut world = arena();
    let crawler = MonsterId::new(MonsterKind::Crawler, 0);
    place(&mut world, crawler, PlanarPosition::new(0.0, 30.0));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayerPose {
            position: WorldPosition::new(0.0, 6.0, 0.0),
            heading: Heading::new(0.0, -0.12, 1.0),
        },
        &mut events,
    );
    render(&mut world);

    let mut combat = Combat::default();
    let mut sampler = RespawnSampler::default();
    let (events, _) = attack(&mut world, &mut combat, &mut sampler);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::MonsterHit { monster, hits: 1, .. } if *monster == crawler)));
}

#[test]
fn one_attack_wounds_every_monster_on_the_line() {
    let mut world = arena();
    let near = MonsterId::new(MonsterKind::Shambler, 0);
    let far = MonsterId::new(MonsterKind::Stalker, 0);
    place(&mut world, near, PlanarPosition::new(0.0, 40.0));
    place(&mut world, far, PlanarPosition::new(0.0, 90.0));
    render(&mut world);

    let mut combat = Combat::default();
    let mut sampler = RespawnSampler::default();
    let _ = attack(&mut world, &mut combat, &mut sampler);

    assert_eq!(query::monster(&world, near).hits, 1);
    assert_eq!(query::monster(&world, far).hits, 1);
}

#[test]
fn monster_off_the_view_ray_is_untouched() {
    let mut world = arena();
    let bystander = MonsterId::new(MonsterKind::Shambler, 3);
    place(&mut world, bystander, PlanarPosition::new(20.0, 60.0));
    render(&mut world);
    assert!(query::monster(&world, bystander).visible);

    let mut combat = Combat::default();
    let mut sampler = RespawnSampler::default();
    let (events, cues) = attack(&mut world, &mut combat, &mut sampler);

    assert!(events.is_empty());
    assert_eq!(cues, vec![Cue::ShotFired]);
    assert_eq!(query::monster(&world, bystander).hits, 0);
}

#[test]
fn visibility_from_previous_frame_gates_hits() {
    let mut world = arena();
    let target = MonsterId::new(MonsterKind::Shambler, 4);
    render(&mut world);
    place(&mut world, target, PlanarPosition::new(0.0, 50.0));

    let mut combat = Combat::default();
    let mut sampler = RespawnSampler::default();
    let (events, _) = attack(&mut world, &mut combat, &mut sampler);
    assert!(events.is_empty(), "monster moved into view after the render pass");

    render(&mut world);
    let (events, _) = attack(&mut world, &mut combat, &mut sampler);
    assert!(!events.is_empty());
}

#[test]
fn ray_property_centre_hits_and_offset_misses() {
    let spatial = FrustumSpatialQuery::new(
        Projection::default(),
        WorldPosition::new(0.0, 6.0, 0.0),
        Heading::FORWARD,
    );

    for kind in MonsterKind::ALL {
        for step in 1..40 {
            let distance = step as f32 * 12.5;
            let sphere = kind.bounding_sphere_at(PlanarPosition::new(3.0, distance));
            let aimed = Ray {
                origin: WorldPosition::new(0.0, 6.0, 0.0),
                direction: Heading::new(
                    sphere.center.x(),
                    sphere.center.y() - 6.0,
                    sphere.center.z(),
                ),
            };
            assert!(spatial.ray_vs_sphere(&aimed, &sphere).touches());

            let wide = BoundingSphere::new(
                WorldPosition::new(sphere.radius + 0.5, 6.0, sphere.center.z()),
                sphere.radius,
            );
            let straight = Ray {
                origin: WorldPosition::new(0.0, 6.0, 0.0),
                direction: Heading::FORWARD,
            };
            assert_eq!(spatial.ray_vs_sphere(&straight, &wide), Relation::Outside);
        }
    }
}
