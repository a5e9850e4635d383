//! Spawn consumer: activate bullets from the pool.
//!
//! # Fail-fast invariants
//! - The bullet free list contains only valid pooled bullet entities.
//! - Therefore, a pooled entity must match the bullet query.
//!
//! If this is violated, we skip the request and log it; an empty pool is a capacity
//! decision and is not logged above debug.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::plugins::lifespan::Lifespan;
use crate::plugins::pooling::ObjectPool;

use super::components::{Bullet, BulletState, PooledBullet};
use super::messages::SpawnBulletRequest;
use super::pool::{active_layers, bullet_key, BULLET_Z};

/// Assign `layers` to the bullet and every collider below it in the hierarchy.
pub fn set_layer(
    root: Entity,
    layers: CollisionLayers,
    q_children: &Query<&Children>,
    q_layers: &mut Query<&mut CollisionLayers>,
) {
    let descendants: Vec<Entity> = q_children.iter_descendants(root).collect();
    for e in std::iter::once(root).chain(descendants) {
        if let Ok(mut l) = q_layers.get_mut(e) {
            *l = layers;
        }
    }
}

pub fn allocate_bullets_from_pool(
    mut pool: ResMut<ObjectPool>,
    mut reader: MessageReader<SpawnBulletRequest>,
    mut q: Query<(
        &mut BulletState,
        &mut Bullet,
        &mut Transform,
        &mut Visibility,
        &mut Lifespan,
    ), With<PooledBullet>>,
    q_children: Query<&Children>,
    mut q_layers: Query<&mut CollisionLayers>,
) {
    let key = bullet_key();

    for req in reader.read() {
        let Some(e) = pool.pop_free(&key) else {
            debug!("bullet pool exhausted, dropping {:?} request", req.kind);
            continue;
        };

        let Ok((mut state, mut bullet, mut tf, mut vis, mut lifespan)) = q.get_mut(e) else {
            warn!("bullet pool contained {e:?} without pooled bullet components");
            continue;
        };

        *state = BulletState::Active;
        bullet.reset_for_fire(req.speed, req.owner);
        tf.translation = req.pos.extend(BULLET_Z);
        tf.rotation = Quat::from_rotation_z(req.angle);
        *vis = Visibility::Visible;
        lifespan.rearm();

        set_layer(e, active_layers(req.kind), &q_children, &mut q_layers);
    }
}
