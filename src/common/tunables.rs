//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    /// Seconds a fired bullet stays active before it is recycled.
    pub bullet_lifespan: f32,
    pub bullet_pool_capacity: usize,
    pub explosion_pool_capacity: usize,
    pub fixed_hz: f64,
    /// Half size of the playfield, centered on the origin.
    pub arena_half_extents: Vec2,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 320.0,
            player_bullet_speed: 900.0,
            enemy_bullet_speed: 260.0,
            bullet_lifespan: 4.0,
            bullet_pool_capacity: 1024,
            explosion_pool_capacity: 16,
            fixed_hz: 50.0,
            arena_half_extents: Vec2::new(360.0, 420.0),
        }
    }
}
