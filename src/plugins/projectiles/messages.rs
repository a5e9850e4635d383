//! Buffered bullet requests.
//!
//! Producers (emitters, enemy death) only write intent. The projectile systems are the
//! single writers of pooled bullet state.

use bevy::prelude::*;

use crate::common::layers::Layer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BulletKind {
    Player,
    #[default]
    Enemy,
}

impl BulletKind {
    /// Side whose bullets land on `layer`. Non-bullet layers have no side.
    pub fn from_layer(layer: Layer) -> Option<Self> {
        match layer {
            Layer::PlayerBullet => Some(Self::Player),
            Layer::EnemyBullet => Some(Self::Enemy),
            _ => None,
        }
    }

    pub fn layer(self) -> Layer {
        match self {
            Self::Player => Layer::PlayerBullet,
            Self::Enemy => Layer::EnemyBullet,
        }
    }
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBulletRequest {
    pub kind: BulletKind,
    pub pos: Vec2,
    /// Rotation (radians, counter-clockwise) applied to the bullet's local up axis.
    pub angle: f32,
    pub speed: f32,
    pub owner: Option<Entity>,
}

/// Return every active bullet authored by `author` to the pool.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecallBullets {
    pub author: Entity,
}
