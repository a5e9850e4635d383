//! Enemies plugin: scripted waves of shooters and what happens when they die.
//!
//! ```text
//! OnEnter(InGame): spawn_wave -> enemy roots + child emitters
//! FixedPostUpdate: damage_on_contact -> HealthChanged --+
//!                  LifeEnded ---------------------------+-> enemy_deaths -> RecallBullets
//! PostUpdate:      despawn_marked_enemies
//! ```
//!
//! A dying enemy is deactivated in place (hidden, no collisions, controller off) and only
//! marked `PendingDespawn`; the despawn itself happens outside the fixed step.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::controllers::{BulletPattern, Controller, EmitterAction};
use crate::plugins::effects::{self, PooledEffect};
use crate::plugins::emitters::{Emitter, Volley};
use crate::plugins::entities::{systems as entity_systems, HealthChanged, HitFilter, HitFlash, Vitals};
use crate::plugins::entry::EnemyEnter;
use crate::plugins::lifespan::{LifeEnded, Lifespan};
use crate::plugins::movement::{MoveByVector, ZigZag};
use crate::plugins::pooling::ObjectPool;
use crate::plugins::projectiles::commit;
use crate::plugins::projectiles::messages::RecallBullets;

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// What an enemy leaves behind when the player kills it.
#[derive(Component, Debug, Clone)]
pub struct EnemyDeath {
    /// Pooled effect shown at the death position.
    pub explosion: String,
    pub destroy_bullets_on_death: bool,
}

impl Default for EnemyDeath {
    fn default() -> Self {
        Self {
            explosion: effects::EXPLOSION_NAME.to_string(),
            destroy_bullets_on_death: false,
        }
    }
}

/// Marker: enemy should be removed from the world.
///
/// We don't despawn in the fixed step; we mark and despawn later in PostUpdate.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

const ENEMY_BASE: Color = Color::srgb(0.85, 0.25, 0.3);
const ENEMY_FLASH: Color = Color::WHITE;
const ENEMY_Z: f32 = 1.0;
const ENEMY_LIFESPAN: f32 = 40.0;

#[derive(Clone, Debug)]
pub enum Attack {
    /// One emitter looping a single pattern.
    Ring { count: u32, interval: f32 },
    /// Aimed fan and a spiral taking turns.
    FanThenSpiral,
}

#[derive(Clone, Debug)]
pub enum Motion {
    Still,
    Drift(Vec2, f32),
    ZigZag(f32),
}

/// One row of a wave table.
#[derive(Clone, Debug)]
pub struct EnemySpawn {
    pub start: Vec2,
    pub end: Vec2,
    pub delay: f32,
    pub health: f32,
    pub attack: Attack,
    pub motion: Motion,
    pub destroy_bullets_on_death: bool,
}

pub fn first_wave(arena: Vec2) -> Vec<EnemySpawn> {
    let top = arena.y + 60.0;
    let row = arena.y * 0.55;
    vec![
        EnemySpawn {
            start: Vec2::new(-arena.x * 0.5, top),
            end: Vec2::new(-arena.x * 0.5, row),
            delay: 0.0,
            health: 12.0,
            attack: Attack::Ring { count: 12, interval: 0.5 },
            motion: Motion::Still,
            destroy_bullets_on_death: false,
        },
        EnemySpawn {
            start: Vec2::new(arena.x * 0.5, top),
            end: Vec2::new(arena.x * 0.5, row),
            delay: 0.5,
            health: 12.0,
            attack: Attack::Ring { count: 12, interval: 0.5 },
            motion: Motion::Still,
            destroy_bullets_on_death: false,
        },
        EnemySpawn {
            start: Vec2::new(0.0, top),
            end: Vec2::new(0.0, row + 60.0),
            delay: 1.5,
            health: 40.0,
            attack: Attack::FanThenSpiral,
            motion: Motion::ZigZag(120.0),
            destroy_bullets_on_death: true,
        },
        EnemySpawn {
            start: Vec2::new(-arena.x - 40.0, row - 80.0),
            end: Vec2::new(-arena.x * 0.2, row - 80.0),
            delay: 4.0,
            health: 8.0,
            attack: Attack::Ring { count: 6, interval: 0.8 },
            motion: Motion::Drift(Vec2::new(1.0, -0.2), 40.0),
            destroy_bullets_on_death: false,
        },
    ]
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_wave);

    app.add_systems(
        FixedPostUpdate,
        enemy_deaths
            .after(entity_systems::damage_on_contact)
            .before(commit::recall_bullets)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_enemies.run_if(in_state(GameState::InGame)),
    );
}

pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet])
}

pub fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

pub fn spawn_wave(mut commands: Commands, tunables: Res<Tunables>) {
    let wave = first_wave(tunables.arena_half_extents);
    for spawn in &wave {
        spawn_enemy(&mut commands, spawn, tunables.enemy_bullet_speed);
    }
    debug!("spawned wave of {} enemies", wave.len());
}

pub fn spawn_enemy(commands: &mut Commands, spawn: &EnemySpawn, bullet_speed: f32) -> Entity {
    let enemy = commands
        .spawn((
            Name::new("Enemy"),
            Enemy,
            EnemyDeath {
                destroy_bullets_on_death: spawn.destroy_bullets_on_death,
                ..default()
            },
            Vitals::new(spawn.health).with_filter(HitFilter::Bullets),
            HitFlash::new(ENEMY_BASE, ENEMY_FLASH),
            EnemyEnter::new(spawn.end.extend(ENEMY_Z), 1.2, 80.0).with_delay(spawn.delay),
            Lifespan::from_seconds(ENEMY_LIFESPAN),
            Sprite::from_color(ENEMY_BASE, Vec2::splat(30.0)),
            Transform::from_translation(spawn.start.extend(ENEMY_Z)),
            RigidBody::Kinematic,
            Collider::circle(15.0),
            enemy_layers(),
            CollidingEntities::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let mut emitter = |e: Emitter| commands.spawn((e, Transform::default(), ChildOf(enemy))).id();

    let controller = match spawn.attack {
        Attack::Ring { count, interval } => {
            let ring = emitter(Emitter::new(Volley::ring(count, bullet_speed), interval).with_spin(0.4));
            Controller::constant(BulletPattern::new(0.5, 3.0, 1.0, Some(ring)))
        }
        Attack::FanThenSpiral => {
            let fan = Volley {
                count: 5,
                spread: 0.9,
                speed: bullet_speed * 1.2,
            };
            let aimed = emitter(
                Emitter::new(fan, 0.35)
                    .with_aim(std::f32::consts::PI)
                    .with_max_volleys(6),
            );
            let spiral = emitter(Emitter::new(Volley::ring(4, bullet_speed), 0.08).with_spin(2.5));
            Controller::rotating(
                vec![
                    BulletPattern::new(0.4, 2.0, 0.6, Some(aimed)),
                    BulletPattern::new(0.4, 3.0, 0.8, Some(spiral)),
                ],
                Some(aimed),
            )
            .with_end_actions(vec![EmitterAction::Restart(spiral)])
        }
    };

    let mut entity = commands.entity(enemy);
    entity.insert(controller);
    match spawn.motion {
        Motion::Still => {}
        Motion::Drift(direction, speed) => {
            entity.insert(MoveByVector::new(direction, speed));
        }
        Motion::ZigZag(multiplier) => {
            entity.insert((MoveByVector::new(Vec2::new(0.0, -0.1), 0.0), ZigZag::new(multiplier)));
        }
    }

    enemy
}

/// Lethal damage kills with an explosion; a lifespan running out removes the enemy quietly.
pub fn enemy_deaths(
    mut commands: Commands,
    mut health: MessageReader<HealthChanged>,
    mut ended: MessageReader<LifeEnded>,
    mut pool: ResMut<ObjectPool>,
    mut q: Query<
        (
            &EnemyDeath,
            &Transform,
            &mut Vitals,
            Option<&mut HitFlash>,
            &mut Visibility,
            &mut CollisionLayers,
            Option<&mut Controller>,
        ),
        (With<Enemy>, Without<PendingDespawn>, Without<PooledEffect>),
    >,
    mut q_fx: Query<(&mut Transform, &mut Visibility, &mut Lifespan), With<PooledEffect>>,
    mut recalls: MessageWriter<RecallBullets>,
) {
    let deaths = health
        .read()
        .filter(|ev| ev.is_lethal())
        .map(|ev| (ev.entity, true))
        .chain(ended.read().map(|ev| (ev.entity, false)))
        .collect::<Vec<_>>();

    for (entity, from_player) in deaths {
        let Ok((death, tf, mut vitals, flash, mut vis, mut layers, controller)) = q.get_mut(entity)
        else {
            continue;
        };
        // Already killed earlier in this tick.
        if !vitals.is_enabled() {
            continue;
        }

        if from_player {
            effects::spawn_explosion(&mut pool, &death.explosion, tf.translation.truncate(), &mut q_fx);
            if death.destroy_bullets_on_death {
                recalls.write(RecallBullets { author: entity });
            }
        }

        vitals.disable();
        if let Some(mut flash) = flash {
            flash.cancel();
        }
        if let Some(mut controller) = controller {
            controller.set_enabled(false);
        }
        *vis = Visibility::Hidden;
        *layers = non_interacting_enemy_layers();
        commands.entity(entity).insert(PendingDespawn);

        debug!("{entity:?} died (killed by player: {from_player})");
    }
}

pub fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests;
