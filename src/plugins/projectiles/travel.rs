//! Bullet travel: straight line along local up, plus optional depth drift.

use bevy::prelude::*;

use super::components::{Bullet, BulletState, PooledBullet};

pub fn bullet_travel(
    time: Res<Time<Fixed>>,
    mut q: Query<(&Bullet, &BulletState, &mut Transform), With<PooledBullet>>,
) {
    let dt = time.delta_secs();

    for (bullet, state, mut tf) in &mut q {
        if *state != BulletState::Active {
            continue;
        }
        let step = bullet.displacement(tf.rotation, dt);
        tf.translation += step;
    }
}
