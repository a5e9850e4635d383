use bevy::prelude::*;

/// Seconds between two colour toggles of the hit flash.
pub const HIT_BLINK_INTERVAL: f32 = 0.05;
/// Number of toggles in one flash.
pub const HIT_BLINK_STEPS: u32 = 3;
pub const HIT_BLINK_DURATION: f32 = HIT_BLINK_INTERVAL * HIT_BLINK_STEPS as f32;

/// Rewrites incoming damage before it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DamageModifier {
    #[default]
    Identity,
    Scale(f32),
    /// Flat reduction, never below zero.
    Reduce(f32),
}

impl DamageModifier {
    #[inline]
    pub fn apply(self, amount: f32) -> f32 {
        match self {
            Self::Identity => amount,
            Self::Scale(k) => amount * k,
            Self::Reduce(r) => (amount - r).max(0.0),
        }
    }
}

/// Which contacts count as hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitFilter {
    #[default]
    Any,
    Bullets,
}

impl HitFilter {
    #[inline]
    pub fn accepts(self, other_is_bullet: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Bullets => other_is_bullet,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthChange {
    pub new_health: f32,
    pub old_health: f32,
    pub max_health: f32,
}

impl HealthChange {
    #[inline]
    pub fn is_lethal(&self) -> bool {
        self.new_health <= 0.0
    }
}

/// Health, invincibility frames and damage gating.
///
/// Health only changes through `damage` (and `reset`), and stays in `[0, max_health]`.
#[derive(Component, Debug, Clone)]
pub struct Vitals {
    health: f32,
    max_health: f32,
    /// Seconds of immunity granted by a non-lethal hit.
    pub invincibility_time: f32,
    iframes: u32,
    /// Held while an entry sequence runs.
    pub invincible: bool,
    enabled: bool,
    pub modifier: DamageModifier,
    pub filter: HitFilter,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            invincibility_time: 0.0,
            iframes: 0,
            invincible: false,
            enabled: true,
            modifier: DamageModifier::Identity,
            filter: HitFilter::Any,
        }
    }

    pub fn with_invincibility_time(mut self, secs: f32) -> Self {
        self.invincibility_time = secs.max(0.0);
        self
    }

    pub fn with_modifier(mut self, modifier: DamageModifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_filter(mut self, filter: HitFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn iframes(&self) -> u32 {
        self.iframes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// One fixed tick: iframes count down, never below zero.
    #[inline]
    pub fn tick(&mut self) {
        self.iframes = self.iframes.saturating_sub(1);
    }

    /// Entry activation: an inactive entity cannot be hurt.
    pub fn set_active(&mut self, active: bool) {
        self.invincible = !active;
    }

    pub fn reset(&mut self) {
        self.iframes = 0;
        self.health = self.max_health;
    }

    /// Apply `amount` damage.
    ///
    /// `None` when the hit was ignored (iframes, disabled, invincible, or modified to zero).
    /// A lethal hit grants no iframes; death handling belongs to `HealthChanged` readers.
    pub fn damage(&mut self, amount: f32, tick_interval: f32) -> Option<HealthChange> {
        if self.iframes != 0 || !self.enabled || self.invincible {
            return None;
        }

        let amount = self.modifier.apply(amount);
        if amount == 0.0 {
            return None;
        }

        let old_health = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);

        let change = HealthChange {
            new_health: self.health,
            old_health,
            max_health: self.max_health,
        };
        if change.is_lethal() {
            return Some(change);
        }

        self.iframes = if tick_interval > 0.0 {
            (self.invincibility_time / tick_interval).floor() as u32
        } else {
            0
        };
        Some(change)
    }
}

/// Hit feedback: alternates base / flash colour every `HIT_BLINK_INTERVAL`.
///
/// At most one flash runs per entity: triggering while active only restarts the count.
#[derive(Component, Debug, Clone)]
pub struct HitFlash {
    pub base_color: Color,
    pub flash_color: Color,
    active: bool,
    showing_flash: bool,
    steps: u32,
    index: u32,
    since_step: f32,
}

impl HitFlash {
    pub fn new(base_color: Color, flash_color: Color) -> Self {
        Self {
            base_color,
            flash_color,
            active: false,
            showing_flash: false,
            steps: 0,
            index: 0,
            since_step: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_showing_flash(&self) -> bool {
        self.showing_flash
    }

    pub fn current_color(&self) -> Color {
        if self.showing_flash {
            self.flash_color
        } else {
            self.base_color
        }
    }

    pub fn trigger(&mut self) {
        if self.active {
            self.restart_timer();
            return;
        }
        self.active = true;
        self.index = 0;
        self.steps = 0;
        self.since_step = 0.0;
        self.step();
    }

    /// Restart the duration of a running flash; the colour sequence keeps its phase.
    pub fn restart_timer(&mut self) {
        self.steps = 0;
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.since_step += dt;
        while self.active && self.since_step >= HIT_BLINK_INTERVAL {
            self.since_step -= HIT_BLINK_INTERVAL;
            self.step();
        }
    }

    /// Stop immediately and show the base colour.
    pub fn cancel(&mut self) {
        self.active = false;
        self.showing_flash = false;
        self.steps = 0;
        self.since_step = 0.0;
    }

    fn step(&mut self) {
        if self.steps >= HIT_BLINK_STEPS {
            self.cancel();
            return;
        }
        self.showing_flash = self.index % 2 == 1;
        self.steps += 1;
        self.index += 1;
    }
}
