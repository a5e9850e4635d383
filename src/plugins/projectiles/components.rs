use bevy::prelude::*;

#[derive(Component)]
pub struct PooledBullet;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Per-tick z offset applied while `depth_drift` is on.
///
/// Constant per tick, not a rate: older bullets sink below newer ones.
pub const DEPTH_DRIFT_PER_TICK: f32 = 0.0001;

/// Straight-line traveller.
///
/// Moves along its local up axis; the owner side is encoded in collision layers,
/// `author` is only carried for attribution.
#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub speed: f32,
    pub depth_drift: bool,
    pub author: Option<Entity>,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            speed: 1.0,
            depth_drift: true,
            author: None,
        }
    }
}

impl Bullet {
    #[inline]
    pub fn reset_for_fire(&mut self, speed: f32, author: Option<Entity>) {
        self.speed = speed;
        self.author = author;
    }

    /// Displacement for one tick, in world space, given the bullet's rotation.
    #[inline]
    pub fn displacement(&self, rotation: Quat, elapsed: f32) -> Vec3 {
        let mut local = Vec3::Y * (self.speed * elapsed);
        if self.depth_drift {
            local.z += DEPTH_DRIFT_PER_TICK;
        }
        rotation * local
    }
}
