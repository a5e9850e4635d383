use bevy::prelude::*;

use crate::plugins::emitters::{apply_calls, Emitter, EmitterCall};

use super::{Controller, FireInput};

/// Bind every emitter of a newly inserted controller to its side and author.
pub fn adopt_new_controllers(
    q: Query<(Entity, &Controller), Added<Controller>>,
    mut emitters: Query<&mut Emitter>,
) {
    let mut calls = Vec::new();
    for (owner, controller) in &q {
        calls.extend(
            controller
                .emitters()
                .into_iter()
                .filter_map(|e| controller.adopt(owner, e)),
        );
    }
    apply_calls(&calls, &mut emitters);
}

/// Fixed-tick driver: advance every controller, then perform its emitter calls in order.
///
/// Consumes the fire edge: `just_pressed` is cleared once every controller saw it.
pub fn tick_controllers(
    time: Res<Time<Fixed>>,
    mut fire: ResMut<FireInput>,
    mut q: Query<&mut Controller>,
    mut emitters: Query<&mut Emitter>,
    mut calls: Local<Vec<EmitterCall>>,
) {
    let dt = time.delta_secs();
    let input = *fire;

    for mut controller in &mut q {
        calls.clear();
        controller.tick(dt, input, &mut calls);
        apply_calls(&calls, &mut emitters);
    }

    fire.just_pressed = false;
}
