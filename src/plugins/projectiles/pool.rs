use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::Tunables;
use crate::plugins::lifespan::Lifespan;
use crate::plugins::pooling::{ObjectPool, PoolKey, Pooled};

use super::components::{Bullet, BulletState, PooledBullet};
use super::messages::BulletKind;

pub const BULLET_CATEGORY: &str = "Bullets";
pub const BULLET_NAME: &str = "Bullet";

/// Z of a freshly fired bullet.
pub const BULLET_Z: f32 = 2.0;

pub fn bullet_key() -> PoolKey {
    PoolKey::new(BULLET_CATEGORY, BULLET_NAME)
}

#[inline]
pub fn active_player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::World, Layer::Enemy])
}

#[inline]
pub fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyBullet, [Layer::World, Layer::Player])
}

#[inline]
pub fn active_layers(kind: BulletKind) -> CollisionLayers {
    match kind {
        BulletKind::Player => active_player_layers(),
        BulletKind::Enemy => active_enemy_layers(),
    }
}

/// "Disabled" without structural changes: empty filters means we collide with nothing.
#[inline]
pub fn inactive_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyBullet, [] as [Layer; 0])
}

/// Pre-spawn pooled bullets (inactive).
///
/// Physics components stay present; inactive bullets never collide because their
/// filters are empty, and their lifespan is paused.
pub fn init_bullet_pool(
    mut commands: Commands,
    mut pool: ResMut<ObjectPool>,
    tunables: Res<Tunables>,
) {
    let key = bullet_key();
    pool.clear(&key);

    for _ in 0..tunables.bullet_pool_capacity {
        let e = commands
            .spawn((
                Name::new("Bullet(Pooled)"),
                PooledBullet,
                Pooled(key.clone()),
                BulletState::Inactive,
                Bullet::default(),
                Lifespan::dormant(tunables.bullet_lifespan),
                Sprite {
                    color: Color::srgb(1.0, 0.85, 0.3),
                    custom_size: Some(Vec2::splat(8.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, BULLET_Z),
                Visibility::Hidden,
                RigidBody::Kinematic,
                Collider::circle(4.0),
                Sensor,
                inactive_bullet_layers(),
                CollisionEventsEnabled,
            ))
            .id();

        pool.release(&key, e);
    }

    debug!("bullet pool filled with {} entities", tunables.bullet_pool_capacity);
}
