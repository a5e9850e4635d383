use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::state::GameState;
use crate::common::test_utils::{read_messages, run_system_once};
use crate::plugins::effects::{init_explosion_pool, EXPLOSION_CATEGORY, EXPLOSION_NAME};
use crate::plugins::pooling::PoolKey;

fn world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables {
        explosion_pool_capacity: 2,
        ..default()
    });
    world.init_resource::<ObjectPool>();
    world.init_resource::<Messages<HealthChanged>>();
    world.init_resource::<Messages<LifeEnded>>();
    world.init_resource::<Messages<RecallBullets>>();
    run_system_once(&mut world, init_explosion_pool);
    world
}

fn row(destroy_bullets_on_death: bool) -> EnemySpawn {
    EnemySpawn {
        start: Vec2::new(10.0, 500.0),
        end: Vec2::new(10.0, 200.0),
        delay: 0.0,
        health: 3.0,
        attack: Attack::Ring { count: 8, interval: 0.5 },
        motion: Motion::Still,
        destroy_bullets_on_death,
    }
}

fn spawn(world: &mut World, spawn: EnemySpawn) -> Entity {
    run_system_once(world, move |mut commands: Commands| {
        spawn_enemy(&mut commands, &spawn, 100.0)
    })
}

fn free_explosions(world: &World) -> usize {
    world
        .resource::<ObjectPool>()
        .free_count(&PoolKey::new(EXPLOSION_CATEGORY, EXPLOSION_NAME))
}

fn lethal(entity: Entity) -> HealthChanged {
    HealthChanged {
        entity,
        new_health: 0.0,
        old_health: 1.0,
        max_health: 3.0,
    }
}

fn assert_deactivated(world: &World, e: Entity) {
    assert!(!world.get::<Vitals>(e).unwrap().is_enabled());
    assert!(!world.get::<Controller>(e).unwrap().is_enabled());
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(*world.get::<CollisionLayers>(e).unwrap(), non_interacting_enemy_layers());
    assert!(world.get::<PendingDespawn>(e).is_some());
}

#[test]
fn spawn_wave_builds_every_row_with_child_emitters() {
    let mut world = world();
    run_system_once(&mut world, spawn_wave);

    let expected = first_wave(Tunables::default().arena_half_extents).len();
    let mut q = world.query_filtered::<(&Controller, &Children), With<Enemy>>();
    let enemies: Vec<_> = q.iter(&world).collect();
    assert_eq!(enemies.len(), expected);

    for (controller, children) in enemies {
        let emitters = controller.emitters();
        assert!(!emitters.is_empty());
        assert!(emitters.iter().all(|e| children.contains(e)));
    }
}

#[test]
fn spawned_enemy_only_takes_bullet_hits() {
    let mut world = world();
    let e = spawn(&mut world, row(false));

    let vitals = world.get::<Vitals>(e).unwrap();
    assert_eq!(vitals.filter, HitFilter::Bullets);
    assert_eq!(vitals.health(), 3.0);
    assert!(world.get::<CollidingEntities>(e).is_some());
}

#[test]
fn lethal_damage_explodes_and_deactivates() {
    let mut world = world();
    let e = spawn(&mut world, row(false));

    world.write_message(lethal(e));
    run_system_once(&mut world, enemy_deaths);

    assert_deactivated(&world, e);
    assert_eq!(free_explosions(&world), 1);
    assert!(read_messages::<RecallBullets>(&mut world).is_empty());
}

#[test]
fn lethal_damage_recalls_bullets_when_configured() {
    let mut world = world();
    let e = spawn(&mut world, row(true));

    world.write_message(lethal(e));
    run_system_once(&mut world, enemy_deaths);

    assert_eq!(read_messages::<RecallBullets>(&mut world), vec![RecallBullets { author: e }]);
}

#[test]
fn lifespan_end_removes_quietly() {
    let mut world = world();
    let e = spawn(&mut world, row(true));

    world.write_message(LifeEnded { entity: e });
    run_system_once(&mut world, enemy_deaths);

    assert_deactivated(&world, e);
    assert_eq!(free_explosions(&world), 2);
    assert!(read_messages::<RecallBullets>(&mut world).is_empty());
}

#[test]
fn non_lethal_damage_is_ignored() {
    let mut world = world();
    let e = spawn(&mut world, row(false));

    world.write_message(HealthChanged {
        entity: e,
        new_health: 2.0,
        old_health: 3.0,
        max_health: 3.0,
    });
    run_system_once(&mut world, enemy_deaths);

    assert!(world.get::<Vitals>(e).unwrap().is_enabled());
    assert!(world.get::<PendingDespawn>(e).is_none());
}

#[test]
fn an_enemy_dies_once_per_tick() {
    let mut world = world();
    let e = spawn(&mut world, row(false));

    world.write_message(lethal(e));
    world.write_message(lethal(e));
    run_system_once(&mut world, enemy_deaths);

    assert_eq!(free_explosions(&world), 1);
}

#[test]
fn despawn_removes_the_enemy_and_its_emitters() {
    let mut world = world();
    let e = spawn(&mut world, row(false));
    let emitters = world.get::<Controller>(e).unwrap().emitters();

    world.entity_mut(e).insert(PendingDespawn);
    run_system_once(&mut world, despawn_marked_enemies);

    assert!(world.get_entity(e).is_err());
    assert!(emitters.iter().all(|&em| world.get_entity(em).is_err()));
}

#[test]
fn marked_enemies_are_only_despawned_in_game() {
    let mut app = App::new();
    plugin(&mut app);
    let e = app.world_mut().spawn((Enemy, PendingDespawn)).id();

    app.world_mut().run_schedule(PostUpdate);
    assert!(app.world().get_entity(e).is_ok());

    app.world_mut().insert_resource(State::new(GameState::InGame));
    app.world_mut().run_schedule(PostUpdate);
    assert!(app.world().get_entity(e).is_err());
}
