use outbreak_core::{
    Command, Event, GameState, Heading, Movement, SiteId, WorldPosition, COLLECTED_ITEM_PARKING,
    MAX_HEALTH,
};
use outbreak_system_pickup::Pickup;
use outbreak_system_progression::Progression;
use outbreak_world::{self as world, query, World};

fn playing_world() -> World {
    let mut world = World::with_seed(0x9a1d);
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

fn stand_near_item(world: &mut World, site: SiteId, offset: f32, movement: Movement) {
    let item = query::event_sites(world)[usize::from(site.get())].first_aid;
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetPlayerPose {
            position: WorldPosition::new(item.x() + offset, 6.0, item.z()),
            heading: Heading::FORWARD,
        },
        &mut events,
    );
    world::apply(
        world,
        Command::SetMovement {
            movement,
            running: false,
        },
        &mut events,
    );
}

fn run_pickup(world: &mut World, pickup: &mut Pickup) -> Vec<Event> {
    let mut commands = Vec::new();
    pickup.handle(
        query::game_state(world),
        &query::player(world),
        &query::event_sites(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn moving_player_collects_item_in_reach() {
    let mut world = playing_world();
    let site = SiteId::new(2);
    let mut events = Vec::new();
    world::apply(&mut world, Command::DamagePlayer { amount: 1_200.0 }, &mut events);
    stand_near_item(&mut world, site, 4.0, Movement::FORWARD);

    let mut pickup = Pickup::default();
    let events = run_pickup(&mut world, &mut pickup);

    assert_eq!(
        events,
        vec![Event::FirstAidCollected {
            site,
            health: MAX_HEALTH - 700.0,
        }]
    );
    let snapshot = query::event_sites(&world)[2];
    assert!(snapshot.collected);
    assert_eq!(snapshot.first_aid, COLLECTED_ITEM_PARKING);
}

#[test]
fn standing_still_never_collects() {
    let mut world = playing_world();
    let site = SiteId::new(0);
    stand_near_item(&mut world, site, 0.0, Movement::IDLE);

    let mut pickup = Pickup::default();
    assert!(run_pickup(&mut world, &mut pickup).is_empty());
    assert!(!query::event_sites(&world)[0].collected);
}

#[test]
fn item_beyond_radius_stays_put() {
    let mut world = playing_world();
    let site = SiteId::new(1);
    stand_near_item(&mut world, site, 10.5, Movement::LEFT);

    let mut pickup = Pickup::default();
    assert!(run_pickup(&mut world, &mut pickup).is_empty());
}

#[test]
fn collected_item_is_not_collected_twice() {
    let mut world = playing_world();
    let site = SiteId::new(0);
    stand_near_item(&mut world, site, 1.0, Movement::BACK);

    let mut pickup = Pickup::default();
    assert_eq!(run_pickup(&mut world, &mut pickup).len(), 1);
    assert!(run_pickup(&mut world, &mut pickup).is_empty());
    assert_eq!(query::player(&world).health, MAX_HEALTH);
}

#[test]
fn each_item_restores_five_hundred_and_the_third_wins() {
    let mut world = playing_world();
    let mut pickup = Pickup::default();
    let mut progression = Progression::default();

    for (collected, site) in SiteId::all().enumerate() {
        let mut events = Vec::new();
        let wounded = 2_000.0;
        let amount = query::player(&world).health - wounded;
        world::apply(&mut world, Command::DamagePlayer { amount }, &mut events);
        assert_eq!(query::player(&world).health, wounded);

        stand_near_item(&mut world, site, 0.0, Movement::FORWARD);
        let events = run_pickup(&mut world, &mut pickup);
        assert_eq!(
            events,
            vec![Event::FirstAidCollected {
                site,
                health: wounded + 500.0,
            }]
        );

        let mut commands = Vec::new();
        let mut cues = Vec::new();
        progression.handle(
            &events,
            query::game_state(&world),
            &query::player(&world),
            query::progress(&world),
            query::all_first_aid_collected(&world),
            &mut commands,
            &mut cues,
        );
        let mut ignored = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut ignored);
        }

        let expected = if collected == 2 {
            GameState::Victory
        } else {
            GameState::Playing
        };
        assert_eq!(query::game_state(&world), expected);
    }
    assert_eq!(query::player(&world).health, 2_500.0);
}
