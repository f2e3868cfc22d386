use std::time::Duration;

use outbreak_core::{
    Command, Cue, Event, GameState, Heading, MonsterId, MonsterKind, PlanarPosition,
    WorldPosition, MAX_HEALTH, MIN_SPAWN_DISTANCE,
};
use outbreak_system_monster_ai::MonsterAi;
use outbreak_system_respawn::RespawnSampler;
use outbreak_world::{self as world, query, World};

const FAR_AWAY: PlanarPosition = PlanarPosition::new(-740.0, 740.0);

fn playing_world() -> World {
    let mut world = World::with_seed(0x51de);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetGameState {
            state: GameState::Playing,
        },
        &mut events,
    );
    world
}

fn park_all_monsters(world: &mut World) {
    let mut events = Vec::new();
    for monster in MonsterId::all() {
        world::apply(
            world,
            Command::RespawnMonster {
                monster,
                position: FAR_AWAY,
            },
            &mut events,
        );
    }
}

fn place(world: &mut World, monster: MonsterId, position: PlanarPosition) {
    let mut events = Vec::new();
    world::apply(world, Command::RespawnMonster { monster, position }, &mut events);
}

fn tick(
    world: &mut World,
    ai: &mut MonsterAi,
    sampler: &mut RespawnSampler,
    dt: Duration,
) -> (Vec<Command>, Vec<Cue>) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    let mut cues = Vec::new();
    ai.handle(
        &events,
        query::game_state(world),
        &query::player(world),
        &query::monster_view(world),
        &query::event_sites(world),
        sampler,
        &mut commands,
        &mut cues,
    );

    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    (commands, cues)
}

#[test]
fn adjacent_monster_drains_one_health_per_millisecond() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let player = query::player(&world).position.planar();
    let biter = MonsterId::new(MonsterKind::Stalker, 0);
    place(
        &mut world,
        biter,
        PlanarPosition::new(player.x(), player.z() + 10.0),
    );

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    for _ in 0..15 {
        let _ = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(50));
    }

    assert_eq!(query::player(&world).health, MAX_HEALTH - 750.0);
    assert_eq!(
        query::monster(&world, biter).position,
        PlanarPosition::new(player.x(), player.z() + 10.0),
        "monster at the stop radius holds its ground"
    );
}

#[test]
fn pursuing_monster_steps_each_axis_toward_player() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let player = query::player(&world).position.planar();
    let hunter = MonsterId::new(MonsterKind::Crawler, 3);
    let start = PlanarPosition::new(player.x() + 60.0, player.z() - 60.0);
    place(&mut world, hunter, start);

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let _ = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(16));

    let moved = query::monster(&world, hunter).position;
    let step = MonsterKind::Crawler.speed();
    assert!((moved.x() - (start.x() - step)).abs() < 1e-4);
    assert!((moved.z() - (start.z() + step)).abs() < 1e-4);
    assert_eq!(query::player(&world).health, MAX_HEALTH);
}

#[test]
fn wounded_monster_pursues_from_any_distance() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let wounded = MonsterId::new(MonsterKind::Shambler, 9);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RegisterHit {
            monster: wounded,
            marker_duration: Duration::from_millis(1_000),
        },
        &mut events,
    );

    let player = query::player(&world).position.planar();
    let before = query::monster(&world, wounded).position.distance(player);

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let _ = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(16));

    let after = query::monster(&world, wounded).position.distance(player);
    assert!(after < before, "wounded monster should close in");
}

#[test]
fn close_pursuer_vocalises() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let player = query::player(&world).position.planar();
    let growler = MonsterId::new(MonsterKind::Shambler, 1);
    place(
        &mut world,
        growler,
        PlanarPosition::new(player.x() + 40.0, player.z()),
    );

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let (_, cues) = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(16));

    assert_eq!(cues, vec![Cue::MonsterVocalized { monster: growler }]);
}

#[test]
fn patrolling_monster_respawns_on_reaching_its_site() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let patroller = MonsterId::new(MonsterKind::Stalker, 7);
    let site = query::event_sites(&world)[MonsterKind::Stalker.patrol_site().get() as usize];
    let arrival = PlanarPosition::new(site.location.x() + 3.0, site.location.z());
    place(&mut world, patroller, arrival);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayerPose {
            position: WorldPosition::new(site.location.x() + 400.0, 6.0, site.location.z()),
            heading: Heading::FORWARD,
        },
        &mut events,
    );
    let player = query::player(&world).position.planar();

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let (commands, _) = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(16));

    assert!(commands
        .iter()
        .any(|command| matches!(command, Command::RespawnMonster { monster, .. } if *monster == patroller)));
    let snapshot = query::monster(&world, patroller);
    assert_eq!(snapshot.hits, 0);
    assert!(snapshot.position.distance(player) >= MIN_SPAWN_DISTANCE);
}

#[test]
fn patrol_covers_a_fixed_step_regardless_of_frame_time() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let walker = MonsterId::new(MonsterKind::Shambler, 2);
    let before = query::monster(&world, walker).position;
    let site = query::event_sites(&world)[0].location.planar();

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let _ = tick(&mut world, &mut ai, &mut sampler, Duration::from_millis(200));

    let after = query::monster(&world, walker).position;
    assert!((before.distance(after) - 0.25).abs() < 1e-3);
    assert!(after.distance(site) < before.distance(site));
}

#[test]
fn zero_length_tick_still_patrols_but_never_bites() {
    let mut world = playing_world();
    park_all_monsters(&mut world);
    let walker = MonsterId::new(MonsterKind::Shambler, 3);
    let before = query::monster(&world, walker).position;
    let player = query::player(&world).position.planar();
    let biter = MonsterId::new(MonsterKind::Crawler, 4);
    let bite_position = PlanarPosition::new(player.x() + 12.0, player.z());
    place(&mut world, biter, bite_position);

    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let (commands, cues) = tick(&mut world, &mut ai, &mut sampler, Duration::ZERO);

    let after = query::monster(&world, walker).position;
    assert!((before.distance(after) - 0.25).abs() < 1e-3);
    assert_eq!(query::monster(&world, biter).position, bite_position);
    assert!(!commands
        .iter()
        .any(|command| matches!(command, Command::DamagePlayer { .. })));
    assert_eq!(query::player(&world).health, MAX_HEALTH);
    assert!(cues.contains(&Cue::MonsterVocalized { monster: biter }));
}

#[test]
fn title_screen_freezes_monsters() {
    let world = World::with_seed(0x51de);
    let mut ai = MonsterAi::default();
    let mut sampler = RespawnSampler::default();
    let mut commands = Vec::new();
    let mut cues = Vec::new();

    ai.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }],
        query::game_state(&world),
        &query::player(&world),
        &query::monster_view(&world),
        &query::event_sites(&world),
        &mut sampler,
        &mut commands,
        &mut cues,
    );

    assert!(commands.is_empty());
    assert!(cues.is_empty());
}
