//! Entities: health, damage gating and hit feedback for anything that can be shot.
//!
//! Rules:
//! - `Vitals::damage` is the only way health goes down.
//! - every accepted hit writes exactly one `HealthChanged`; readers (enemies, player)
//!   decide what a change means, including death.
//! - the hit flash is plain state advanced by the same fixed tick as the iframes.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;

mod components;
pub mod systems;

pub use components::*;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub new_health: f32,
    pub old_health: f32,
    pub max_health: f32,
}

impl HealthChanged {
    pub fn new(entity: Entity, change: HealthChange) -> Self {
        Self {
            entity,
            new_health: change.new_health,
            old_health: change.old_health,
            max_health: change.max_health,
        }
    }

    #[inline]
    pub fn is_lethal(&self) -> bool {
        self.new_health <= 0.0
    }
}

/// Entry sequence notification: `active == false` while the entity is still arriving.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryActivation {
    pub entity: Entity,
    pub active: bool,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetEntity {
    pub entity: Entity,
}

pub fn plugin(app: &mut App) {
    app.add_message::<HealthChanged>()
        .add_message::<EntryActivation>()
        .add_message::<ResetEntity>();

    app.add_systems(
        FixedUpdate,
        (systems::reset_entities, systems::tick_vitals.after(systems::reset_entities))
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        (
            systems::apply_entry_activation,
            systems::damage_on_contact
                .after(CollisionEventSystems)
                .after(systems::apply_entry_activation),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

#[cfg(test)]
mod tests;
