use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::emitters::EmitterCall;
use crate::plugins::projectiles::messages::BulletKind;

/// Phase durations (seconds) plus the emitter they drive.
///
/// Authored data: never mutated at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletPattern {
    pub start_time: f32,
    pub duration: f32,
    pub exit_time: f32,
    pub emitter: Option<Entity>,
}

impl BulletPattern {
    pub fn new(start_time: f32, duration: f32, exit_time: f32, emitter: Option<Entity>) -> Self {
        Self {
            start_time,
            duration,
            exit_time,
            emitter,
        }
    }

    #[inline]
    pub fn phase_duration(&self, state: CycleState) -> f32 {
        let secs = match state {
            CycleState::Start => self.start_time,
            CycleState::Attack => self.duration,
            CycleState::End => self.exit_time,
        };
        secs.max(0.0)
    }

    #[inline]
    pub fn cycle(&self) -> f32 {
        self.phase_duration(CycleState::Start)
            + self.phase_duration(CycleState::Attack)
            + self.phase_duration(CycleState::End)
    }
}

/// Start -> Attack -> End -> Start ...
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CycleState {
    Start,
    Attack,
    #[default]
    End,
}

impl CycleState {
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Self::Start => Self::Attack,
            Self::Attack => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Extra emitter interaction run when any pattern of a rotating controller starts or ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterAction {
    Enable(Entity),
    Disable(Entity),
    Restart(Entity),
}

impl EmitterAction {
    fn call(self) -> EmitterCall {
        match self {
            Self::Enable(e) => EmitterCall::SetEnabled(e, true),
            Self::Disable(e) => EmitterCall::SetEnabled(e, false),
            Self::Restart(e) => EmitterCall::Start(e),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PatternRotation {
    patterns: Vec<BulletPattern>,
    index: Option<usize>,
    fallback: Option<Entity>,
    pub start_actions: Vec<EmitterAction>,
    pub end_actions: Vec<EmitterAction>,
}

impl PatternRotation {
    fn current(&self) -> Option<BulletPattern> {
        self.index.and_then(|i| self.patterns.get(i)).copied()
    }

    fn advance(&mut self) {
        if self.patterns.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(i) if i + 1 < self.patterns.len() => i + 1,
            _ => 0,
        });
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerFire {
    pub emitter: Option<Entity>,
    /// Hold to fire (true) or fire once per press (false).
    pub automatic: bool,
}

#[derive(Clone, Debug)]
pub enum ControllerKind {
    /// Loops a single pattern forever.
    Constant(BulletPattern),
    /// Moves to the next pattern each time a cycle wraps.
    Rotating(PatternRotation),
    /// Fires on player request.
    Player(PlayerFire),
}

/// Latest fire request from the input source.
///
/// `just_pressed` is latched by the input sampler and cleared once a fixed tick consumed it.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FireInput {
    pub held: bool,
    pub just_pressed: bool,
}

/// Timed driver for emitters.
///
/// A fresh controller sits in the reset condition (`End`, timer 0): its first
/// non-zero tick enters `Start`.
#[derive(Component, Debug, Clone)]
pub struct Controller {
    kind: ControllerKind,
    state: CycleState,
    timer: f32,
    enabled: bool,
}

impl Controller {
    fn with_kind(kind: ControllerKind) -> Self {
        Self {
            kind,
            state: CycleState::End,
            timer: 0.0,
            enabled: true,
        }
    }

    pub fn constant(pattern: BulletPattern) -> Self {
        Self::with_kind(ControllerKind::Constant(pattern))
    }

    /// An empty pattern list disables the controller; `fallback` stays its only emitter.
    pub fn rotating(patterns: Vec<BulletPattern>, fallback: Option<Entity>) -> Self {
        let empty = patterns.is_empty();
        let mut controller = Self::with_kind(ControllerKind::Rotating(PatternRotation {
            patterns,
            fallback,
            ..default()
        }));
        if empty {
            warn!("rotating controller has no patterns, disabling it");
            controller.enabled = false;
        }
        controller
    }

    pub fn player(emitter: Option<Entity>, automatic: bool) -> Self {
        Self::with_kind(ControllerKind::Player(PlayerFire { emitter, automatic }))
    }

    pub fn with_start_actions(mut self, actions: Vec<EmitterAction>) -> Self {
        if let ControllerKind::Rotating(rot) = &mut self.kind {
            rot.start_actions = actions;
        }
        self
    }

    pub fn with_end_actions(mut self, actions: Vec<EmitterAction>) -> Self {
        if let ControllerKind::Rotating(rot) = &mut self.kind {
            rot.end_actions = actions;
        }
        self
    }

    pub fn kind(&self) -> &ControllerKind {
        &self.kind
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn pattern_index(&self) -> Option<usize> {
        match &self.kind {
            ControllerKind::Rotating(rot) => rot.index,
            _ => None,
        }
    }

    pub fn active_pattern(&self) -> Option<BulletPattern> {
        match &self.kind {
            ControllerKind::Constant(p) => Some(*p),
            ControllerKind::Rotating(rot) => rot.current(),
            ControllerKind::Player(_) => None,
        }
    }

    /// Every emitter this controller drives.
    pub fn emitters(&self) -> Vec<Entity> {
        match &self.kind {
            ControllerKind::Constant(p) => p.emitter.into_iter().collect(),
            ControllerKind::Rotating(rot) if rot.patterns.is_empty() => {
                rot.fallback.into_iter().collect()
            }
            ControllerKind::Rotating(rot) => {
                let mut out: Vec<Entity> = Vec::with_capacity(rot.patterns.len());
                for e in rot.patterns.iter().filter_map(|p| p.emitter) {
                    if !out.contains(&e) {
                        out.push(e);
                    }
                }
                out
            }
            ControllerKind::Player(fire) => fire.emitter.into_iter().collect(),
        }
    }

    /// Symbolic name of the layer this controller's bullets go to.
    pub fn target_layer_name(&self) -> &'static str {
        match self.kind {
            ControllerKind::Player(_) => "BulletPlayer",
            _ => "BulletEnemy",
        }
    }

    /// Call binding `emitter` to this controller (owned by `owner`).
    pub fn adopt(&self, owner: Entity, emitter: Entity) -> Option<EmitterCall> {
        let name = self.target_layer_name();
        let Some(kind) = Layer::from_name(name).and_then(BulletKind::from_layer) else {
            warn!("controller target layer {name:?} does not resolve to a bullet layer");
            return None;
        };
        Some(EmitterCall::Adopt {
            emitter,
            kind,
            author: owner,
        })
    }

    /// Swap the player emitter. Other kinds ignore this.
    pub fn set_emitter(&mut self, emitter: Entity) -> bool {
        match &mut self.kind {
            ControllerKind::Player(fire) => {
                let changed = fire.emitter != Some(emitter);
                fire.emitter = Some(emitter);
                changed
            }
            _ => false,
        }
    }

    /// Force `End` so the next non-zero tick starts a fresh cycle.
    pub fn reset(&mut self) {
        self.state = CycleState::End;
        self.timer = 0.0;
    }

    /// Advance by `elapsed` seconds, recording emitter interactions in `calls`.
    pub fn tick(&mut self, elapsed: f32, input: FireInput, calls: &mut Vec<EmitterCall>) {
        if !self.enabled {
            return;
        }
        let elapsed = elapsed.max(0.0);

        if let ControllerKind::Player(fire) = &self.kind {
            let Some(emitter) = fire.emitter else {
                return;
            };
            let wants = if fire.automatic {
                input.held
            } else {
                input.just_pressed
            };
            calls.push(EmitterCall::Tick {
                emitter,
                elapsed,
                fire_when_ready: wants,
            });
            return;
        }

        // The emitter sees at most one tick per controller tick: the first Attack segment.
        let mut attack_ticked = false;
        if self.state == CycleState::Attack {
            let spent = elapsed.min(self.timer.max(0.0));
            self.push_attack_tick(spent, calls);
            attack_ticked = true;
        }

        self.timer -= elapsed;
        if elapsed <= 0.0 {
            return;
        }

        // Several transitions may fit in one tick; leftover time carries into each new state.
        while self.timer <= 0.0 {
            self.advance_state(calls);

            let Some(pattern) = self.active_pattern() else {
                break;
            };
            let cycle = pattern.cycle();

            // Collapse whole cycles beyond the last one; their hooks are not replayed.
            if cycle > 0.0 && -self.timer >= 2.0 * cycle {
                self.timer = -((-self.timer) % cycle + cycle);
            }

            let overflow = -self.timer;
            let duration = pattern.phase_duration(self.state);
            self.timer += duration;

            if self.state == CycleState::Attack && !attack_ticked {
                let spent = overflow.min(duration);
                if spent > 0.0 {
                    self.push_attack_tick(spent, calls);
                    attack_ticked = true;
                }
            }

            if cycle <= 0.0 {
                debug!("pattern with a zero-length cycle, one transition per tick");
                break;
            }
        }
    }

    fn push_attack_tick(&self, elapsed: f32, calls: &mut Vec<EmitterCall>) {
        if let Some(emitter) = self.active_pattern().and_then(|p| p.emitter) {
            calls.push(EmitterCall::Tick {
                emitter,
                elapsed,
                fire_when_ready: true,
            });
        }
    }

    /// Step to the next state. Leaving `End` first rotates the pattern, so the hooks of
    /// the new `Start` see the new pattern's emitter.
    fn advance_state(&mut self, calls: &mut Vec<EmitterCall>) {
        if self.state == CycleState::End {
            if let ControllerKind::Rotating(rot) = &mut self.kind {
                rot.advance();
            }
        }

        self.state = self.state.next();

        let emitter = self.active_pattern().and_then(|p| p.emitter);
        match (self.state, emitter) {
            (CycleState::Start, Some(e)) => calls.push(EmitterCall::Start(e)),
            (CycleState::End, Some(e)) => calls.push(EmitterCall::End(e)),
            _ => {}
        }

        self.on_state_advanced(calls);
    }

    fn on_state_advanced(&self, calls: &mut Vec<EmitterCall>) {
        let ControllerKind::Rotating(rot) = &self.kind else {
            return;
        };
        let actions = match self.state {
            CycleState::Start => &rot.start_actions,
            CycleState::End => &rot.end_actions,
            CycleState::Attack => return,
        };
        calls.extend(actions.iter().map(|a| a.call()));
    }
}
