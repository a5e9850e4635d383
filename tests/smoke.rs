mod common;

use bevy::prelude::*;
use bullet_hell::common::tunables::Tunables;
use bullet_hell::plugins::enemies::{first_wave, Enemy};
use bullet_hell::plugins::player::Player;
use bullet_hell::plugins::pooling::ObjectPool;
use bullet_hell::plugins::projectiles::pool::bullet_key;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn entering_the_game_spawns_player_wave_and_pools() {
    let mut app = common::app_in_game();
    app.update();

    let world = app.world_mut();
    let players = world.query_filtered::<(), With<Player>>().iter(world).count();
    let enemies = world.query_filtered::<(), With<Enemy>>().iter(world).count();
    assert_eq!(players, 1);

    let tunables = world.resource::<Tunables>().clone();
    assert_eq!(enemies, first_wave(tunables.arena_half_extents).len());
    assert_eq!(
        world.resource::<ObjectPool>().free_count(&bullet_key()),
        tunables.bullet_pool_capacity
    );
}
