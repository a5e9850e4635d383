//! Return commit: recycle bullets back into the pool.
//!
//! This system is the "owner" of the *Inactive invariants*.
//!
//! Invariant: Inactive bullets must be:
//! - hidden
//! - lifespan paused
//! - collide with nothing (filters empty)
//!
//! Centralizing these writes here prevents inconsistencies.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::lifespan::{LifeEnded, Lifespan};
use crate::plugins::pooling::{ObjectPool, Pooled};

use super::allocator::set_layer;
use super::components::{Bullet, BulletState, PooledBullet};
use super::messages::RecallBullets;
use super::pool::inactive_bullet_layers;

/// Lifespan end: the bullet deactivates (returns to the pool), it is never despawned.
pub fn retire_expired_bullets(
    mut ended: MessageReader<LifeEnded>,
    mut q: Query<&mut BulletState, With<PooledBullet>>,
) {
    for ev in ended.read() {
        let Ok(mut state) = q.get_mut(ev.entity) else {
            continue;
        };
        if *state == BulletState::Active {
            *state = BulletState::PendingReturn;
        }
    }
}

/// Clear every active bullet fired on behalf of a recalled author.
pub fn recall_bullets(
    mut recalls: MessageReader<RecallBullets>,
    mut q: Query<(&Bullet, &mut BulletState), With<PooledBullet>>,
) {
    for recall in recalls.read() {
        for (bullet, mut state) in &mut q {
            if *state == BulletState::Active && bullet.author == Some(recall.author) {
                *state = BulletState::PendingReturn;
            }
        }
    }
}

pub fn return_to_pool_commit(
    mut pool: ResMut<ObjectPool>,
    mut q: Query<(
        Entity,
        &Pooled,
        &mut BulletState,
        &mut Visibility,
        &mut Lifespan,
    ), With<PooledBullet>>,
    q_children: Query<&Children>,
    mut q_layers: Query<&mut CollisionLayers>,
) {
    for (e, pooled, mut state, mut vis, mut lifespan) in &mut q {
        if *state != BulletState::PendingReturn {
            continue;
        }

        *state = BulletState::Inactive;
        *vis = Visibility::Hidden;
        lifespan.halt();
        set_layer(e, inactive_bullet_layers(), &q_children, &mut q_layers);

        pool.release(&pooled.0, e);
    }
}
