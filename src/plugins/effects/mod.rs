//! Pooled one-shot effects (explosions).
//!
//! Effects are pre-spawned hidden with a dormant lifespan. `spawn_explosion` pops one,
//! places it and re-arms its lifespan; `recycle_effects` hides it again on `LifeEnded`.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::lifespan::{LifeEnded, Lifespan};
use crate::plugins::pooling::{ObjectPool, PoolKey, Pooled};

pub const EXPLOSION_CATEGORY: &str = "Explosions";
pub const EXPLOSION_NAME: &str = "Explosion";

const EXPLOSION_SECS: f32 = 0.4;
const EXPLOSION_Z: f32 = 3.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct PooledEffect;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, init_explosion_pool).add_systems(
        FixedPostUpdate,
        recycle_effects.run_if(in_state(GameState::InGame)),
    );
}

pub fn init_explosion_pool(
    mut commands: Commands,
    mut pool: ResMut<ObjectPool>,
    tunables: Res<Tunables>,
) {
    let key = PoolKey::new(EXPLOSION_CATEGORY, EXPLOSION_NAME);
    pool.clear(&key);

    for _ in 0..tunables.explosion_pool_capacity {
        let e = commands
            .spawn((
                Name::new("Explosion(Pooled)"),
                PooledEffect,
                Pooled(key.clone()),
                Lifespan::dormant(EXPLOSION_SECS),
                Sprite {
                    color: Color::srgb(1.0, 0.55, 0.15),
                    custom_size: Some(Vec2::splat(40.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, EXPLOSION_Z),
                Visibility::Hidden,
            ))
            .id();
        pool.release(&key, e);
    }
}

/// Show a pooled effect registered as `name` at `pos`. Returns the entity, or `None`
/// when the pool is dry.
pub fn spawn_explosion(
    pool: &mut ObjectPool,
    name: &str,
    pos: Vec2,
    q: &mut Query<(&mut Transform, &mut Visibility, &mut Lifespan), With<PooledEffect>>,
) -> Option<Entity> {
    let Some(e) = pool.get_pooled_object(name, EXPLOSION_CATEGORY) else {
        debug!("no pooled {name:?} left in {EXPLOSION_CATEGORY:?}");
        return None;
    };
    let Ok((mut tf, mut vis, mut lifespan)) = q.get_mut(e) else {
        warn!("pooled effect {e:?} is missing its components");
        return None;
    };
    tf.translation = pos.extend(EXPLOSION_Z);
    *vis = Visibility::Visible;
    lifespan.rearm();
    Some(e)
}

pub fn recycle_effects(
    mut ended: MessageReader<LifeEnded>,
    mut pool: ResMut<ObjectPool>,
    mut q: Query<(&Pooled, &mut Visibility, &mut Lifespan), With<PooledEffect>>,
) {
    for ev in ended.read() {
        let Ok((pooled, mut vis, mut lifespan)) = q.get_mut(ev.entity) else {
            continue;
        };
        *vis = Visibility::Hidden;
        lifespan.halt();
        pool.release(&pooled.0, ev.entity);
    }
}
