//! Scripted arrival: an enemy flies in along a parabola before it joins the fight.
//!
//! While the arrival is pending (enabled but still in its delay) the entity is
//! deactivated through `EntryActivation`. Once the delay runs out damage immunity drops;
//! on arrival every consumer is activated again.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::entities::{EntryActivation, Vitals};

#[derive(Component, Debug, Clone)]
pub struct EnemyEnter {
    /// Seconds needed to travel to `end`.
    pub duration: f32,
    pub delay: f32,
    /// Height of the arc.
    pub height: f32,
    pub end: Vec3,
    start: Option<Vec3>,
    time: f32,
    released: bool,
    arrived: bool,
}

impl EnemyEnter {
    pub fn new(end: Vec3, duration: f32, height: f32) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            delay: 0.0,
            height,
            end,
            start: None,
            time: 0.0,
            released: false,
            arrived: false,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived
    }
}

/// Point on the arc from `start` to `end` at `t` in `[0, 1]`.
///
/// Horizontal motion is linear; vertical adds `-4 h t^2 + 4 h t`, which peaks at `h`
/// halfway through.
pub fn parabola(start: Vec2, end: Vec2, height: f32, t: f32) -> Vec2 {
    let arc = -4.0 * height * t * t + 4.0 * height * t;
    let mid = start.lerp(end, t);
    Vec2::new(mid.x, arc + start.y + (end.y - start.y) * t)
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        advance_entries.run_if(in_state(GameState::InGame)),
    );
}

pub fn advance_entries(
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &mut EnemyEnter, &mut Transform, Option<&mut Vitals>)>,
    mut writer: MessageWriter<EntryActivation>,
) {
    let dt = time.delta_secs();

    for (entity, mut enter, mut tf, vitals) in &mut q {
        if enter.arrived {
            continue;
        }

        // The first tick only records the start; the deactivation lands before any release.
        let Some(start) = enter.start else {
            enter.start = Some(tf.translation);
            writer.write(EntryActivation { entity, active: false });
            continue;
        };

        enter.delay -= dt;
        if enter.delay > 0.0 {
            continue;
        }

        if !enter.released {
            enter.released = true;
            if let Some(mut vitals) = vitals {
                vitals.invincible = false;
            }
        }

        let t = (enter.time / enter.duration).clamp(0.0, 1.0);
        let pos = parabola(start.truncate(), enter.end.truncate(), enter.height, t);
        tf.translation = pos.extend(start.z);

        enter.time += dt;

        if enter.time >= enter.duration {
            enter.arrived = true;
            tf.translation = enter.end;
            writer.write(EntryActivation { entity, active: true });
            debug!("{entity:?} finished its entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;

    use super::*;
    use crate::common::test_utils::{insert_fixed_step, read_messages, run_system_once};

    #[test]
    fn parabola_hits_endpoints_and_peaks_midway() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(10.0, 0.0);

        assert_eq!(parabola(start, end, 5.0, 0.0), start);
        assert_eq!(parabola(start, end, 5.0, 1.0), end);
        assert_eq!(parabola(start, end, 5.0, 0.5), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn entry_holds_immunity_through_the_delay_then_arrives() {
        let mut world = World::new();
        insert_fixed_step(&mut world, 0.25);
        world.init_resource::<Messages<EntryActivation>>();

        let end = Vec3::new(0.0, 100.0, 1.0);
        let mut vitals = Vitals::new(3.0);
        vitals.invincible = true;
        let e = world
            .spawn((
                EnemyEnter::new(end, 0.5, 20.0).with_delay(0.5),
                Transform::from_xyz(0.0, 400.0, 1.0),
                vitals,
            ))
            .id();

        run_system_once(&mut world, advance_entries);
        let activations = read_messages::<EntryActivation>(&mut world);
        assert_eq!(activations, vec![EntryActivation { entity: e, active: false }]);

        run_system_once(&mut world, advance_entries);
        assert!(world.get::<Vitals>(e).unwrap().invincible);

        // Delay runs out: immunity drops, movement starts at the recorded start.
        run_system_once(&mut world, advance_entries);
        assert!(!world.get::<Vitals>(e).unwrap().invincible);
        assert_eq!(world.get::<Transform>(e).unwrap().translation, Vec3::new(0.0, 400.0, 1.0));

        run_system_once(&mut world, advance_entries);
        assert!(world.get::<EnemyEnter>(e).unwrap().has_arrived());
        assert_eq!(world.get::<Transform>(e).unwrap().translation, end);

        let activations = read_messages::<EntryActivation>(&mut world);
        assert_eq!(activations.last(), Some(&EntryActivation { entity: e, active: true }));
    }
}
