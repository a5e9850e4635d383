use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{insert_fixed_step, read_messages, run_system_once};
use crate::plugins::controllers::{BulletPattern, Controller, CycleState, FireInput};
use crate::plugins::projectiles::components::PooledBullet;

const BASE: Color = Color::srgb(0.9, 0.25, 0.25);
const FLASH: Color = Color::WHITE;

fn flash() -> HitFlash {
    HitFlash::new(BASE, FLASH)
}

// -----------------------------------------------------------------------------
// Vitals
// -----------------------------------------------------------------------------

#[test]
fn damage_grants_iframes_from_the_fixed_step() {
    let mut v = Vitals::new(10.0).with_invincibility_time(1.0);

    let change = v.damage(3.0, 0.1).expect("hit should land");
    assert_eq!(change, HealthChange { new_health: 7.0, old_health: 10.0, max_health: 10.0 });
    assert_eq!(v.health(), 7.0);
    assert_eq!(v.iframes(), 10);
}

#[test]
fn damage_is_ignored_while_gated() {
    let mut v = Vitals::new(10.0).with_invincibility_time(1.0);
    v.damage(1.0, 0.1);
    assert!(v.iframes() > 0);
    assert_eq!(v.damage(1.0, 0.1), None);
    assert_eq!(v.health(), 9.0);

    let mut v = Vitals::new(10.0);
    v.invincible = true;
    assert_eq!(v.damage(1.0, 0.1), None);

    let mut v = Vitals::new(10.0);
    v.disable();
    assert_eq!(v.damage(1.0, 0.1), None);
    assert_eq!(v.health(), 10.0);
}

#[test]
fn modifier_adjusts_and_can_cancel_damage() {
    let mut v = Vitals::new(10.0).with_modifier(DamageModifier::Scale(2.0));
    assert_eq!(v.damage(1.5, 0.1).map(|c| c.new_health), Some(7.0));

    let mut v = Vitals::new(10.0).with_modifier(DamageModifier::Reduce(2.0));
    assert_eq!(v.damage(1.0, 0.1), None);
    assert_eq!(v.health(), 10.0);
    assert_eq!(v.iframes(), 0);
}

#[test]
fn lethal_hit_grants_no_iframes() {
    let mut v = Vitals::new(2.0).with_invincibility_time(1.0);
    let change = v.damage(5.0, 0.1).unwrap();
    assert!(change.is_lethal());
    assert_eq!(v.health(), 0.0);
    assert_eq!(v.iframes(), 0);
}

#[test]
fn iframes_count_down_and_stop_at_zero() {
    let mut v = Vitals::new(10.0).with_invincibility_time(0.3);
    v.damage(1.0, 0.1);
    assert_eq!(v.iframes(), 3);
    for _ in 0..10 {
        v.tick();
    }
    assert_eq!(v.iframes(), 0);
    assert!(v.damage(1.0, 0.1).is_some());
}

#[test]
fn reset_restores_full_health_and_clears_iframes() {
    let mut v = Vitals::new(10.0).with_invincibility_time(1.0);
    v.damage(4.0, 0.1);
    v.reset();
    assert_eq!(v.health(), 10.0);
    assert_eq!(v.iframes(), 0);
}

#[test]
fn entry_activation_toggles_invincibility() {
    let mut v = Vitals::new(1.0);
    v.set_active(false);
    assert!(v.invincible);
    v.set_active(true);
    assert!(!v.invincible);
}

#[test]
fn hit_filter_restricts_to_bullets() {
    assert!(HitFilter::Any.accepts(false));
    assert!(HitFilter::Bullets.accepts(true));
    assert!(!HitFilter::Bullets.accepts(false));
}

// -----------------------------------------------------------------------------
// Hit flash
// -----------------------------------------------------------------------------

#[test]
fn flash_sequence_is_base_flash_base_then_done() {
    let mut f = flash();
    f.trigger();
    assert!(f.is_active());
    assert_eq!(f.current_color(), BASE);

    f.advance(HIT_BLINK_INTERVAL);
    assert_eq!(f.current_color(), FLASH);

    f.advance(HIT_BLINK_INTERVAL);
    assert_eq!(f.current_color(), BASE);
    assert!(f.is_active());

    f.advance(HIT_BLINK_INTERVAL);
    assert!(!f.is_active());
    assert_eq!(f.current_color(), BASE);
}

#[test]
fn retrigger_extends_the_running_flash() {
    let mut f = flash();
    f.trigger();
    f.advance(HIT_BLINK_INTERVAL);
    f.advance(HIT_BLINK_INTERVAL);

    // Still one flash; its duration starts over.
    f.trigger();
    for _ in 0..HIT_BLINK_STEPS {
        assert!(f.is_active());
        f.advance(HIT_BLINK_INTERVAL);
    }
    assert!(!f.is_active());
}

#[test]
fn cancel_restores_base_colour() {
    let mut f = flash();
    f.trigger();
    f.advance(HIT_BLINK_INTERVAL);
    assert!(f.is_showing_flash());

    f.cancel();
    assert!(!f.is_active());
    assert_eq!(f.current_color(), BASE);
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

#[test]
fn apply_hit_flashes_only_on_survivable_hits() {
    let mut world = World::new();
    let e = world.spawn_empty().id();

    let mut v = Vitals::new(10.0).with_invincibility_time(1.0);
    let mut f = flash();
    let ev = apply_hit_checked(e, &mut v, &mut f, 3.0);
    assert_eq!(
        ev,
        Some(HealthChanged { entity: e, new_health: 7.0, old_health: 10.0, max_health: 10.0 })
    );
    assert!(f.is_active());

    let mut v = Vitals::new(1.0).with_invincibility_time(1.0);
    let mut f = flash();
    let ev = apply_hit_checked(e, &mut v, &mut f, 3.0).unwrap();
    assert!(ev.is_lethal());
    assert!(!f.is_active());
}

fn apply_hit_checked(e: Entity, v: &mut Vitals, f: &mut HitFlash, amount: f32) -> Option<HealthChanged> {
    systems::apply_hit(e, v, Some(f), amount, 0.1)
}

#[test]
fn contacts_damage_once_per_window_and_notify() {
    let mut world = World::new();
    insert_fixed_step(&mut world, 0.1);
    world.init_resource::<Messages<HealthChanged>>();

    let bullet_a = world.spawn(PooledBullet).id();
    let bullet_b = world.spawn(PooledBullet).id();

    let mut contacts = CollidingEntities::default();
    contacts.insert(bullet_a);
    contacts.insert(bullet_b);

    let target = world
        .spawn((
            Vitals::new(10.0).with_invincibility_time(1.0).with_filter(HitFilter::Bullets),
            flash(),
            contacts,
        ))
        .id();

    run_system_once(&mut world, systems::damage_on_contact);

    // Second contact lands inside the iframe window.
    let v = world.get::<Vitals>(target).unwrap();
    assert_eq!(v.health(), 9.0);
    assert_eq!(v.iframes(), 10);

    let events = read_messages::<HealthChanged>(&mut world);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity, target);
    assert!(world.get::<HitFlash>(target).unwrap().is_active());
}

#[test]
fn filter_ignores_non_bullet_contacts() {
    let mut world = World::new();
    insert_fixed_step(&mut world, 0.1);
    world.init_resource::<Messages<HealthChanged>>();

    let body = world.spawn_empty().id();
    let mut contacts = CollidingEntities::default();
    contacts.insert(body);

    let target = world
        .spawn((Vitals::new(10.0).with_filter(HitFilter::Bullets), contacts))
        .id();

    run_system_once(&mut world, systems::damage_on_contact);

    assert_eq!(world.get::<Vitals>(target).unwrap().health(), 10.0);
    assert!(read_messages::<HealthChanged>(&mut world).is_empty());
}

#[test]
fn disabling_mid_flash_restores_the_sprite() {
    let mut world = World::new();
    insert_fixed_step(&mut world, HIT_BLINK_INTERVAL);

    let mut f = flash();
    f.trigger();
    f.advance(HIT_BLINK_INTERVAL);
    assert!(f.is_showing_flash());

    let mut v = Vitals::new(5.0);
    v.disable();
    let e = world.spawn((v, f, Sprite::from_color(FLASH, Vec2::ONE))).id();

    run_system_once(&mut world, systems::tick_vitals);

    assert!(!world.get::<HitFlash>(e).unwrap().is_active());
    assert_eq!(world.get::<Sprite>(e).unwrap().color, BASE);
}

#[test]
fn tick_vitals_drives_the_flash_colour() {
    let mut world = World::new();
    insert_fixed_step(&mut world, HIT_BLINK_INTERVAL);

    let mut f = flash();
    f.trigger();
    let e = world.spawn((Vitals::new(5.0), f, Sprite::from_color(BASE, Vec2::ONE))).id();

    run_system_once(&mut world, systems::tick_vitals);
    assert_eq!(world.get::<Sprite>(e).unwrap().color, FLASH);
}

#[test]
fn entry_activation_messages_reach_vitals() {
    let mut world = World::new();
    world.init_resource::<Messages<EntryActivation>>();
    let e = world.spawn(Vitals::new(5.0)).id();

    world.write_message(EntryActivation { entity: e, active: false });
    run_system_once(&mut world, systems::apply_entry_activation);
    assert!(world.get::<Vitals>(e).unwrap().invincible);
}

#[test]
fn reset_message_restores_entity_and_controller() {
    let mut world = World::new();
    world.init_resource::<Messages<ResetEntity>>();

    let emitter = world.spawn_empty().id();
    let mut controller = Controller::constant(BulletPattern::new(1.0, 1.0, 1.0, Some(emitter)));
    controller.tick(1.5, FireInput::default(), &mut Vec::new());
    assert_eq!(controller.state(), CycleState::Attack);

    let mut v = Vitals::new(10.0).with_invincibility_time(1.0);
    v.damage(4.0, 0.1);
    let e = world.spawn((v, controller)).id();

    world.write_message(ResetEntity { entity: e });
    run_system_once(&mut world, systems::reset_entities);

    let v = world.get::<Vitals>(e).unwrap();
    assert_eq!((v.health(), v.iframes()), (10.0, 0));
    assert_eq!(world.get::<Controller>(e).unwrap().state(), CycleState::End);
}
