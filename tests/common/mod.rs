#![allow(dead_code)]

//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `bullet_hell::game::configure_headless` to install gameplay plugins.
//! - time advances by exactly one fixed step per `update`.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use bullet_hell::common::state::GameState;
use bullet_hell::common::tunables::Tunables;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    bullet_hell::game::configure_headless(&mut app);
    // `App::run` normally finalizes plugins; tests drive `update` directly.
    app.finish();
    app.cleanup();

    let hz = app.world().resource::<Tunables>().fixed_hz;
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / hz)));
    app
}

/// Headless app that has entered `InGame` (the default state) once.
pub fn app_in_game() -> App {
    let mut app = app_headless();
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    app
}

pub fn run_seconds(app: &mut App, secs: f32) {
    let hz = app.world().resource::<Tunables>().fixed_hz as f32;
    for _ in 0..(secs * hz).ceil() as usize {
        app.update();
    }
}
