//! Bullet-side collision handling.
//!
//! Damage is applied by the hit entity (see `entities`); this module only decides
//! what happens to the bullet: anything it touches consumes it.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;

use super::components::{BulletState, PooledBullet};

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

#[inline]
fn consumes_bullet(layers: &CollisionLayers) -> bool {
    is_in_layer(layers, Layer::World)
        || is_in_layer(layers, Layer::Player)
        || is_in_layer(layers, Layer::Enemy)
}

pub fn process_bullet_collisions(
    mut started: MessageReader<CollisionStart>,
    // Fast "is this a pooled bullet?" check
    q_is_bullet: Query<(), With<PooledBullet>>,
    mut q_state: Query<&mut BulletState, With<PooledBullet>>,
    q_layers: Query<&CollisionLayers>,
    // Per-frame dedupe
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let b1 = q_is_bullet.contains(ev.collider1);
        let b2 = q_is_bullet.contains(ev.collider2);
        if !(b1 ^ b2) {
            continue; // must be exactly one bullet
        }
        let (bullet, other) = if b1 {
            (ev.collider1, ev.collider2)
        } else {
            (ev.collider2, ev.collider1)
        };

        if !seen.insert(bullet) {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other) else {
            continue;
        };
        if !consumes_bullet(other_layers) {
            continue;
        }

        let Ok(mut state) = q_state.get_mut(bullet) else {
            continue;
        };
        if *state == BulletState::Active {
            *state = BulletState::PendingReturn;
        }
    }
}
