//! Emitters: the things that actually shoot.
//!
//! Controllers never touch bullets. They drive an emitter through a small capability
//! surface (`tick`, `on_start`, `on_end`, enabled flag) expressed as [`EmitterCall`]s,
//! and the emitter queues volleys that `fire_emitters` turns into spawn requests.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::controllers;
use crate::plugins::projectiles::messages::{BulletKind, SpawnBulletRequest};

/// Shape of one shot: `count` bullets fanned across `spread` radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volley {
    pub count: u32,
    pub spread: f32,
    pub speed: f32,
}

impl Volley {
    pub fn single(speed: f32) -> Self {
        Self { count: 1, spread: 0.0, speed }
    }

    pub fn ring(count: u32, speed: f32) -> Self {
        Self { count, spread: TAU, speed }
    }

    /// Angles of every bullet, centered on `aim`.
    ///
    /// A full ring spaces bullets evenly without doubling the seam.
    pub fn angles(&self, aim: f32) -> impl Iterator<Item = f32> + '_ {
        let n = self.count;
        let full_ring = self.spread >= TAU - 1e-4;
        let step = match n {
            0 | 1 => 0.0,
            _ if full_ring => self.spread / n as f32,
            _ => self.spread / (n - 1) as f32,
        };
        let first = if n <= 1 || full_ring { aim } else { aim - self.spread * 0.5 };
        (0..n).map(move |i| first + step * i as f32)
    }
}

#[derive(Component, Debug, Clone)]
pub struct Emitter {
    pub enabled: bool,
    pub volley: Volley,
    /// Seconds between volleys.
    pub interval: f32,
    /// Radians per second added to the aim angle (spirals).
    pub spin: f32,
    /// Cap on volleys per pattern run (`on_start` resets the count).
    pub max_volleys: Option<u32>,
    /// Side the bullets belong to; set when a controller adopts the emitter.
    pub kind: BulletKind,
    pub author: Option<Entity>,
    aim: f32,
    cooldown: f32,
    volleys_this_run: u32,
    queued: u32,
}

impl Emitter {
    pub fn new(volley: Volley, interval: f32) -> Self {
        Self {
            enabled: true,
            volley,
            interval: interval.max(0.0),
            spin: 0.0,
            max_volleys: None,
            kind: BulletKind::default(),
            author: None,
            aim: 0.0,
            cooldown: 0.0,
            volleys_this_run: 0,
            queued: 0,
        }
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_aim(mut self, aim: f32) -> Self {
        self.aim = aim;
        self
    }

    pub fn with_max_volleys(mut self, max: u32) -> Self {
        self.max_volleys = Some(max);
        self
    }

    pub fn aim(&self) -> f32 {
        self.aim
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn queued(&self) -> u32 {
        self.queued
    }

    #[inline]
    fn capped(&self) -> bool {
        self.max_volleys.is_some_and(|max| self.volleys_this_run >= max)
    }

    /// Advance the emitter by `elapsed`.
    ///
    /// Cools down always; fires only if `fire_when_ready` and the cooldown has run out.
    /// Returns whether a volley was queued. The cooldown never carries a backlog below
    /// zero, so a long pause does not produce a burst.
    pub fn tick(&mut self, elapsed: f32, fire_when_ready: bool) -> bool {
        if !self.enabled {
            return false;
        }

        self.aim = (self.aim + self.spin * elapsed).rem_euclid(TAU);
        self.cooldown -= elapsed;

        if !fire_when_ready || self.cooldown > 0.0 || self.capped() {
            self.cooldown = self.cooldown.max(0.0);
            return false;
        }

        self.cooldown = (self.cooldown + self.interval).max(0.0);
        self.volleys_this_run += 1;
        self.queued += 1;
        true
    }

    /// Pattern (re)entered: ready to fire immediately.
    pub fn on_start(&mut self) {
        self.cooldown = 0.0;
        self.volleys_this_run = 0;
    }

    /// Pattern left: drop volleys that were queued but not yet fired.
    pub fn on_end(&mut self) {
        self.queued = 0;
        self.cooldown = 0.0;
    }

    pub fn take_queued(&mut self) -> u32 {
        std::mem::take(&mut self.queued)
    }
}

/// One interaction a controller wants performed on an emitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmitterCall {
    Start(Entity),
    End(Entity),
    Tick {
        emitter: Entity,
        elapsed: f32,
        fire_when_ready: bool,
    },
    SetEnabled(Entity, bool),
    /// Bind the emitter to its controller's side and author.
    Adopt {
        emitter: Entity,
        kind: BulletKind,
        author: Entity,
    },
}

impl EmitterCall {
    pub fn emitter(&self) -> Entity {
        match *self {
            Self::Start(e) | Self::End(e) | Self::SetEnabled(e, _) => e,
            Self::Tick { emitter, .. } | Self::Adopt { emitter, .. } => emitter,
        }
    }
}

/// Apply calls in order. A call aimed at a missing emitter is a no-op.
pub fn apply_calls(calls: &[EmitterCall], q: &mut Query<&mut Emitter>) {
    for call in calls {
        let Ok(mut emitter) = q.get_mut(call.emitter()) else {
            debug!("emitter {:?} missing, skipping {call:?}", call.emitter());
            continue;
        };

        match *call {
            EmitterCall::Start(_) => emitter.on_start(),
            EmitterCall::End(_) => emitter.on_end(),
            EmitterCall::Tick { elapsed, fire_when_ready, .. } => {
                emitter.tick(elapsed, fire_when_ready);
            }
            EmitterCall::SetEnabled(_, enabled) => emitter.enabled = enabled,
            EmitterCall::Adopt { kind, author, .. } => {
                emitter.kind = kind;
                emitter.author = Some(author);
            }
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        fire_emitters
            .after(controllers::systems::tick_controllers)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Turn queued volleys into spawn requests.
pub fn fire_emitters(
    mut q: Query<(&mut Emitter, &GlobalTransform)>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    for (mut emitter, gtf) in &mut q {
        let volleys = emitter.take_queued();
        if volleys == 0 {
            continue;
        }

        let (_, rotation, translation) = gtf.to_scale_rotation_translation();
        let (_, _, world_angle) = rotation.to_euler(EulerRot::XYZ);
        let base = world_angle + emitter.aim;
        let pos = translation.truncate();

        for _ in 0..volleys {
            for angle in emitter.volley.angles(base) {
                writer.write(SpawnBulletRequest {
                    kind: emitter.kind,
                    pos,
                    angle,
                    speed: emitter.volley.speed,
                    owner: emitter.author,
                });
            }
        }
    }
}
