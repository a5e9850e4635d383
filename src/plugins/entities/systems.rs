use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::controllers::Controller;
use crate::plugins::projectiles::components::PooledBullet;

use super::{EntryActivation, HealthChanged, HitFlash, ResetEntity, Vitals};

/// Damage an entity and kick its hit flash when the hit was not lethal.
pub fn apply_hit(
    entity: Entity,
    vitals: &mut Vitals,
    flash: Option<&mut HitFlash>,
    amount: f32,
    tick_interval: f32,
) -> Option<HealthChanged> {
    let change = vitals.damage(amount, tick_interval)?;
    if !change.is_lethal() {
        if let Some(flash) = flash {
            flash.trigger();
        }
    }
    Some(HealthChanged::new(entity, change))
}

/// Per-tick upkeep: iframes, flash progress and the sprite colour it implies.
///
/// A disabled entity never keeps flashing: the flash is cancelled and the base colour restored.
pub fn tick_vitals(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Vitals, Option<&mut HitFlash>, Option<&mut Sprite>)>,
) {
    let dt = time.delta_secs();

    for (mut vitals, flash, sprite) in &mut q {
        vitals.tick();

        let Some(mut flash) = flash else {
            continue;
        };
        if !vitals.is_enabled() && flash.is_active() {
            flash.cancel();
        }
        flash.advance(dt);

        if let Some(mut sprite) = sprite {
            sprite.color = flash.current_color();
        }
    }
}

/// Every current contact (enter and stay) that passes the filter deals one damage.
pub fn damage_on_contact(
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &CollidingEntities, &mut Vitals, Option<&mut HitFlash>)>,
    q_bullets: Query<(), With<PooledBullet>>,
    mut writer: MessageWriter<HealthChanged>,
) {
    let step = time.timestep().as_secs_f32();

    for (entity, contacts, mut vitals, mut flash) in &mut q {
        for &other in contacts.iter() {
            if !vitals.filter.accepts(q_bullets.contains(other)) {
                continue;
            }
            if let Some(ev) = apply_hit(entity, &mut vitals, flash.as_deref_mut(), 1.0, step) {
                writer.write(ev);
            }
        }
    }
}

pub fn apply_entry_activation(
    mut reader: MessageReader<EntryActivation>,
    mut q: Query<&mut Vitals>,
) {
    for ev in reader.read() {
        if let Ok(mut vitals) = q.get_mut(ev.entity) {
            vitals.set_active(ev.active);
        }
    }
}

/// Put an entity back in its initial condition: full health, no iframes, fresh flash
/// timer, controllers forced to start a new cycle.
pub fn reset_entities(
    mut reader: MessageReader<ResetEntity>,
    mut q: Query<(Option<&mut Vitals>, Option<&mut HitFlash>, Option<&mut Controller>)>,
) {
    for ev in reader.read() {
        let Ok((vitals, flash, controller)) = q.get_mut(ev.entity) else {
            debug!("reset requested for missing entity {:?}", ev.entity);
            continue;
        };
        if let Some(mut vitals) = vitals {
            vitals.reset();
        }
        if let Some(mut flash) = flash {
            flash.restart_timer();
        }
        if let Some(mut controller) = controller {
            controller.reset();
        }
    }
}
