//! Controllers: the timing layer between gameplay and emitters.
//!
//! Three kinds share one component (tagged variant, no hook inheritance):
//! - `Constant`: loops one pattern through Start -> Attack -> End.
//! - `Rotating`: same cycle, moving to the next pattern of a list each time the cycle wraps.
//! - `Player`: fires on request (held or pressed), no cycle.
//!
//! ```text
//!   End --(leave End: rotate pattern)--> Start --[on_start]--> ... start actions
//!   Start -----------------------------> Attack   (emitter ticked while here)
//!   Attack ----------------------------> End  --[on_end]--> ... end actions
//! ```
//!
//! The state machine itself is pure: `Controller::tick` records `EmitterCall`s, the
//! system applies them to `Emitter` components afterwards.

use bevy::prelude::*;

use crate::common::state::GameState;

mod components;
pub mod systems;

pub use components::*;

pub fn plugin(app: &mut App) {
    app.init_resource::<FireInput>().add_systems(
        FixedUpdate,
        (
            systems::adopt_new_controllers,
            systems::tick_controllers.after(systems::adopt_new_controllers),
        )
            .run_if(in_state(GameState::InGame)),
    );
}
