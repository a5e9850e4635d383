//! Simple scripted motion for enemies: straight drift and zig-zag sweeps.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::entry::{self, EnemyEnter};

/// World-space drift at `speed` pixels per second along `direction`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveByVector {
    pub direction: Vec2,
    pub speed: f32,
}

impl MoveByVector {
    pub fn new(direction: Vec2, speed: f32) -> Self {
        Self { direction, speed }
    }

    /// Offset for one step. A zero direction does not move.
    pub fn step(&self, dt: f32) -> Vec2 {
        self.direction.normalize_or_zero() * self.speed * dt
    }
}

/// Steers a [`MoveByVector`] sideways: `direction.x = atan(cos(t))`, speed follows
/// the sideways component.
#[derive(Component, Debug, Clone, Copy)]
#[require(MoveByVector)]
pub struct ZigZag {
    pub multiplier: f32,
}

impl ZigZag {
    pub fn new(multiplier: f32) -> Self {
        Self { multiplier }
    }

    pub fn steer(&self, t: f32, mv: &mut MoveByVector) {
        mv.direction.x = t.cos().atan();
        mv.speed = self.multiplier * mv.direction.x.abs();
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (
            zig_zag,
            move_by_vector
                .after(zig_zag)
                .after(entry::advance_entries),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

pub fn zig_zag(time: Res<Time<Fixed>>, mut q: Query<(&ZigZag, &mut MoveByVector)>) {
    let t = time.elapsed_secs();
    for (zz, mut mv) in &mut q {
        zz.steer(t, &mut mv);
    }
}

/// Entities still running their entry are left to it.
pub fn move_by_vector(
    time: Res<Time<Fixed>>,
    mut q: Query<(&MoveByVector, &mut Transform, Option<&EnemyEnter>)>,
) {
    let dt = time.delta_secs();
    for (mv, mut tf, enter) in &mut q {
        if enter.is_some_and(|e| !e.has_arrived()) {
            continue;
        }
        tf.translation += mv.step(dt).extend(0.0);
    }
}
