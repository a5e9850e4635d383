//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod controllers;
pub mod core;
pub mod effects;
pub mod emitters;
pub mod enemies;
pub mod entities;
pub mod entry;
pub mod lifespan;
pub mod movement;
pub mod physics;
pub mod player;
pub mod pooling;
pub mod projectiles;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    pooling::plugin(app);
    lifespan::plugin(app);
    world::plugin(app);
    entities::plugin(app);
    controllers::plugin(app);
    emitters::plugin(app);
    entry::plugin(app);
    movement::plugin(app);
    effects::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
