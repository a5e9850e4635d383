//! Lifespan: external time-to-live that notifies owners instead of despawning them.
//!
//! Consumers read `LifeEnded` and decide what "end of life" means for them
//! (bullets go back to the pool, enemies deactivate, effects recycle).

use bevy::prelude::*;

use crate::common::state::GameState;

/// Time-to-live. A paused timer does not count down (pooled, inactive entities).
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Lifespan(pub Timer);

impl Lifespan {
    pub fn from_seconds(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }

    /// A lifespan that does not run until `rearm` is called.
    pub fn dormant(secs: f32) -> Self {
        let mut timer = Timer::from_seconds(secs, TimerMode::Once);
        timer.pause();
        Self(timer)
    }

    pub fn rearm(&mut self) {
        self.0.reset();
        self.0.unpause();
    }

    pub fn halt(&mut self) {
        self.0.pause();
        self.0.reset();
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeEnded {
    pub entity: Entity,
}

pub fn plugin(app: &mut App) {
    app.add_message::<LifeEnded>()
        .add_systems(
            FixedUpdate,
            tick_lifespans.run_if(in_state(GameState::InGame)),
        );
}

pub fn tick_lifespans(
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &mut Lifespan)>,
    mut writer: MessageWriter<LifeEnded>,
) {
    for (entity, mut lifespan) in &mut q {
        if lifespan.tick(time.delta()).just_finished() {
            writer.write(LifeEnded { entity });
        }
    }
}
