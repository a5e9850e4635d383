//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

impl Layer {
    /// Resolve a symbolic layer name.
    ///
    /// Bullet layers keep their authored names ("BulletPlayer" / "BulletEnemy").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Default" => Some(Self::Default),
            "World" => Some(Self::World),
            "Player" => Some(Self::Player),
            "Enemy" => Some(Self::Enemy),
            "BulletPlayer" => Some(Self::PlayerBullet),
            "BulletEnemy" => Some(Self::EnemyBullet),
            _ => None,
        }
    }
}
