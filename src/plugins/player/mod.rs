//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write `PlayerInput` and latch `FireInput`
//! - FixedUpdate: move the kinematic ship, clamped to the arena
//! - FixedPostUpdate: pick the emitter matching the current health
//!
//! Firing itself goes through the player `Controller` like every other shooter.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::controllers::{Controller, FireInput};
use crate::plugins::emitters::{apply_calls, Emitter, Volley};
use crate::plugins::entities::{systems as entity_systems, HealthChanged, HitFlash, Vitals};

#[derive(Component)]
pub struct Player;

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

/// Emitter to use once health drops to `health`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterForHealth {
    pub emitter: Entity,
    /// Literal health, or a fraction of max health in `[0, 1]` when `is_percent`.
    pub health: f32,
    pub is_percent: bool,
}

#[derive(Component, Clone, Debug, Default)]
pub struct HealthEmitters(pub Vec<EmitterForHealth>);

const PLAYER_RADIUS: f32 = 13.0;
const PLAYER_HEALTH: f32 = 5.0;
const PLAYER_IFRAMES_SECS: f32 = 1.0;
const PLAYER_BASE: Color = Color::srgb(0.2, 0.75, 0.9);
const PLAYER_FLASH: Color = Color::srgb(1.0, 0.3, 0.3);

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<FireInput>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input)
        .add_systems(
            FixedUpdate,
            apply_movement.run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            switch_emitter_on_health
                .after(entity_systems::damage_on_contact)
                .run_if(in_state(GameState::InGame)),
        );
}

/// The last entry whose threshold is at or above `health` wins.
pub fn select_emitter_for_health(
    entries: &[EmitterForHealth],
    health: f32,
    max_health: f32,
) -> Option<Entity> {
    let fraction = if max_health > 0.0 { health / max_health } else { 0.0 };
    entries
        .iter()
        .filter(|item| {
            let current = if item.is_percent { fraction } else { health };
            item.health >= current
        })
        .last()
        .map(|item| item.emitter)
}

pub fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::EnemyBullet],
    );

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            Vitals::new(PLAYER_HEALTH).with_invincibility_time(PLAYER_IFRAMES_SECS),
            HitFlash::new(PLAYER_BASE, PLAYER_FLASH),
            Sprite {
                color: PLAYER_BASE,
                custom_size: Some(Vec2::splat(PLAYER_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(0.0, -tunables.arena_half_extents.y * 0.6, 1.0),
            RigidBody::Kinematic,
            Collider::circle(PLAYER_RADIUS),
            layers,
            CollidingEntities::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let speed = tunables.player_bullet_speed;
    let tiers = [
        (Volley::single(speed), 0.12, 1.0),
        (Volley { count: 3, spread: 0.25, speed }, 0.14, 0.6),
        (Volley { count: 5, spread: 0.6, speed }, 0.16, 0.3),
    ];

    let entries: Vec<EmitterForHealth> = tiers
        .into_iter()
        .map(|(volley, interval, health)| EmitterForHealth {
            emitter: commands
                .spawn((
                    Emitter::new(volley, interval),
                    Transform::from_xyz(0.0, PLAYER_RADIUS, 0.0),
                    ChildOf(player),
                ))
                .id(),
            health,
            is_percent: true,
        })
        .collect();

    let first = select_emitter_for_health(&entries, PLAYER_HEALTH, PLAYER_HEALTH);
    commands
        .entity(player)
        .insert((Controller::player(first, true), HealthEmitters(entries)));
}

pub fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<PlayerInput>,
    mut fire: ResMut<FireInput>,
) {
    let Some(keys) = keys else {
        return;
    };

    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();

    fire.held = keys.pressed(KeyCode::Space);
    // Latched until a fixed tick consumes it.
    if keys.just_pressed(KeyCode::Space) {
        fire.just_pressed = true;
    }
}

pub fn apply_movement(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut tf) = q_player.single_mut() else {
        return;
    };

    let bound = (tunables.arena_half_extents - Vec2::splat(PLAYER_RADIUS)).max(Vec2::ZERO);
    let next = tf.translation.truncate() + input.move_axis * tunables.player_speed * time.delta_secs();
    let clamped = next.clamp(-bound, bound);
    tf.translation.x = clamped.x;
    tf.translation.y = clamped.y;
}

pub fn switch_emitter_on_health(
    mut reader: MessageReader<HealthChanged>,
    mut q: Query<(&HealthEmitters, &mut Controller), With<Player>>,
    mut emitters: Query<&mut Emitter>,
) {
    for ev in reader.read() {
        let Ok((table, mut controller)) = q.get_mut(ev.entity) else {
            continue;
        };

        if ev.is_lethal() {
            info!("player {:?} destroyed", ev.entity);
        }

        let Some(emitter) = select_emitter_for_health(&table.0, ev.new_health, ev.max_health) else {
            continue;
        };
        if !controller.set_emitter(emitter) {
            continue;
        }
        if let Some(call) = controller.adopt(ev.entity, emitter) {
            apply_calls(&[call], &mut emitters);
        }
        debug!("player switched to emitter {emitter:?} at {} health", ev.new_health);
    }
}
