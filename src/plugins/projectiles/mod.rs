//! Projectiles plugin: **message-based producer → consumer** spawning + pooled bullets.
//!
//! # Data flow
//! ```text
//!   FixedUpdate (fixed dt)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) Producers: emitters::fire_emitters                                    │
//!│      - writes: SpawnBulletRequest message (one per bullet)                 │
//!│                                                                            │
//!│  (B) Consumer: allocate_bullets_from_pool                                  │
//!│      - mutates: ObjectPool["Bullets"/"Bullet"]                             │
//!│      - mutates: BulletState, Bullet, Transform, Visibility, Lifespan,      │
//!│                 CollisionLayers (root + child colliders)                   │
//!│                                                                            │
//!│  (C) bullet_travel: speed * dt along local up (+ depth drift)             │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!FixedPostUpdate (fixed dt)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (D) Physics emits CollisionStart messages (Avian)                         │
//!│  (E) process_bullet_collisions: Active -> PendingReturn                    │
//!│  (F) retire_expired_bullets (LifeEnded), recall_bullets (RecallBullets)    │
//!│  (G) return_to_pool_commit: PendingReturn -> Inactive, push free list      │
//!└────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow the pool. The allocator is the single writer that pops,
//! the commit is the single writer that pushes.

pub mod components;
pub mod pool;
pub mod collision;
pub mod travel;

pub mod messages;
pub mod allocator;
pub mod commit;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::emitters;

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<messages::SpawnBulletRequest>()
            .add_message::<messages::RecallBullets>()
            .add_systems(Startup, pool::init_bullet_pool);

        app.add_systems(
            FixedUpdate,
            (
                allocator::allocate_bullets_from_pool.after(emitters::fire_emitters),
                travel::bullet_travel.after(allocator::allocate_bullets_from_pool),
            )
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                collision::process_bullet_collisions.after(CollisionEventSystems),
                commit::retire_expired_bullets,
                commit::recall_bullets,
            )
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            commit::return_to_pool_commit
                .after(collision::process_bullet_collisions)
                .after(commit::retire_expired_bullets)
                .after(commit::recall_bullets)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
