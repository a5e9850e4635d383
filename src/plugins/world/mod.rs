//! World plugin: walls just outside the arena. They catch stray bullets.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

const THICKNESS: f32 = 30.0;
/// Room past the visible arena so bullets leave the screen before they are recycled.
const MARGIN: f32 = 120.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

pub fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>) {
    let half = tunables.arena_half_extents + Vec2::splat(MARGIN);

    let wall_layers = CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::PlayerBullet, Layer::EnemyBullet],
    );

    let mut spawn_wall = |name: &str, pos: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name.to_string()),
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    let span_x = half.x * 2.0 + THICKNESS * 2.0;
    let span_y = half.y * 2.0;
    spawn_wall("WallTop", Vec2::new(0.0, half.y + THICKNESS * 0.5), Vec2::new(span_x, THICKNESS));
    spawn_wall("WallBottom", Vec2::new(0.0, -half.y - THICKNESS * 0.5), Vec2::new(span_x, THICKNESS));
    spawn_wall("WallLeft", Vec2::new(-half.x - THICKNESS * 0.5, 0.0), Vec2::new(THICKNESS, span_y));
    spawn_wall("WallRight", Vec2::new(half.x + THICKNESS * 0.5, 0.0), Vec2::new(THICKNESS, span_y));
}
