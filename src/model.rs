//! The animation state machine driving the tear effect.
//!
//! [`TearModel`] consumes clock instants and drag deltas and produces an
//! immutable [`RenderState`] snapshot after every call; that snapshot is the
//! only channel the renderer observes. The model never touches GPU objects.

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use crate::config::{Assets, TearConfig};
use crate::ease::{clamp, ease_in, ease_in_out, ease_out, lerp, progress};
use crate::rng::{TearRng, UniformRandom};

/// Launch vector for one panel of a throw: world-space translation plus a
/// roll around Z, all scaled by the eased throw progress at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowSide {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rot_z: f32,
}

impl ThrowSide {
    pub const ZERO: ThrowSide = ThrowSide {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        rot_z: 0.0,
    };
}

/// Current animation mode. Exactly one phase is active at any instant;
/// phases end only by transitioning into another phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Sheet dropping in from above with a settling rotation.
    Intro { start: Instant, rotation: f32 },
    Idle,
    Dragging,
    /// Both halves flying off-screen; drag input is refused until done.
    Throwing {
        start: Instant,
        tear_start: f32,
        tear_target: f32,
        left: ThrowSide,
        right: ThrowSide,
    },
    /// Tear easing back to zero after an uncommitted release.
    Resetting { start: Instant, tear_start: f32 },
}

impl Phase {
    /// True while the phase needs per-frame ticks to make progress.
    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            Phase::Intro { .. } | Phase::Throwing { .. } | Phase::Resetting { .. }
        )
    }
}

/// Value snapshot of everything the renderer needs for one frame.
/// Recomputed by the model after every mutating call; compared by the
/// renderer to skip redraws when nothing moved.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub tear_amount: f32,
    pub throw_progress: f32,
    pub throw_left: ThrowSide,
    pub throw_right: ThrowSide,
    pub group_y: f32,
    pub group_rot_z: f32,
    pub photo_name: String,
    pub rip_name: String,
}

pub struct TearModel {
    config: TearConfig,
    assets: Assets,
    random: Box<dyn UniformRandom>,

    phase: Phase,
    render_state: RenderState,
    photo_index: usize,

    tear_amount: f32,
    throw_progress: f32,
    throw_left: ThrowSide,
    throw_right: ThrowSide,
    group_y: f32,
    group_rot_z: f32,
    has_appeared: bool,
}

impl TearModel {
    pub fn new(config: TearConfig, assets: Assets, random: impl UniformRandom + 'static) -> Self {
        let render_state = RenderState {
            tear_amount: 0.0,
            throw_progress: 0.0,
            throw_left: ThrowSide::ZERO,
            throw_right: ThrowSide::ZERO,
            group_y: 0.0,
            group_rot_z: 0.0,
            photo_name: assets.photos.first().cloned().unwrap_or_default(),
            rip_name: assets.rip_name.clone(),
        };
        Self {
            config,
            assets,
            random: Box::new(random),
            phase: Phase::Idle,
            render_state,
            photo_index: 0,
            tear_amount: 0.0,
            throw_progress: 0.0,
            throw_left: ThrowSide::ZERO,
            throw_right: ThrowSide::ZERO,
            group_y: 0.0,
            group_rot_z: 0.0,
            has_appeared: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    pub fn photo_index(&self) -> usize {
        self.photo_index
    }

    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    /// Names worth prewarming before first paint.
    pub fn texture_names(&self) -> Vec<String> {
        self.assets.texture_names()
    }

    pub fn on_appear(&mut self) {
        self.on_appear_at(Instant::now());
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn drag_changed(&mut self, delta_y: f32) {
        self.drag_changed_at(delta_y, Instant::now());
    }

    pub fn drag_ended(&mut self) {
        self.drag_ended_at(Instant::now());
    }

    /// Starts the intro the first time the effect becomes visible.
    /// Later calls are no-ops.
    pub fn on_appear_at(&mut self, now: Instant) {
        if self.has_appeared {
            return;
        }
        self.has_appeared = true;
        self.start_intro(now);
        self.update_render_state();
    }

    /// Advances the active phase. Call once per display frame while
    /// [`is_animating`](Self::is_animating) is true; harmless otherwise.
    pub fn tick_at(&mut self, now: Instant) {
        match self.phase {
            Phase::Intro { start, rotation } => {
                let p = self.intro_progress(now, start);
                let eased = ease_in_out(p);
                self.group_y = lerp(self.config.intro_start_y, 0.0, eased);
                self.group_rot_z = lerp(rotation, 0.0, eased);
                if p >= 1.0 {
                    self.finish_intro();
                }
            }

            Phase::Throwing {
                start,
                tear_start,
                tear_target,
                left,
                right,
            } => {
                let p = self.phase_progress(now, start, self.config.throw_duration);
                self.throw_progress = ease_in(p);
                let tear_t = ease_out(p);
                self.tear_amount = lerp(tear_start, tear_target, tear_t);
                self.throw_left = left;
                self.throw_right = right;
                if p >= 1.0 {
                    self.finish_throw(now);
                }
            }

            Phase::Resetting { start, tear_start } => {
                let p = self.phase_progress(now, start, self.config.reset_duration);
                let eased = ease_out(p);
                self.tear_amount = lerp(tear_start, 0.0, eased);
                if p >= 1.0 {
                    self.finish_reset();
                }
            }

            Phase::Idle | Phase::Dragging => {}
        }

        self.update_render_state();
    }

    /// Maps the gesture's vertical translation onto the tear amount.
    /// Refused during Intro and Throwing; cancels a Resetting phase into
    /// Dragging so the tear follows the finger again without snapping.
    pub fn drag_changed_at(&mut self, delta_y: f32, now: Instant) {
        match self.phase {
            Phase::Intro { .. } | Phase::Throwing { .. } => return,
            Phase::Resetting { .. } => self.phase = Phase::Dragging,
            Phase::Idle | Phase::Dragging => {}
        }

        let normalized = clamp(
            2.0 * delta_y / self.config.drag_distance,
            0.0,
            self.config.max_tear,
        );
        self.tear_amount = normalized;
        self.phase = Phase::Dragging;

        if self.tear_amount >= self.config.throw_start_threshold {
            self.start_throw(now);
        }

        self.update_render_state();
    }

    /// Commits the gesture: throw if torn past the complete threshold,
    /// otherwise ease back. Refused during Intro and Throwing.
    pub fn drag_ended_at(&mut self, now: Instant) {
        match self.phase {
            Phase::Intro { .. } | Phase::Throwing { .. } => return,
            Phase::Idle | Phase::Dragging | Phase::Resetting { .. } => {}
        }

        if self.tear_amount >= self.config.complete_threshold {
            self.start_throw(now);
        } else {
            self.start_reset(now);
        }

        self.update_render_state();
    }

    fn start_throw(&mut self, now: Instant) {
        if let Phase::Throwing { .. } = self.phase {
            return;
        }

        let tear_target = self
            .random
            .uniform(self.config.throw_tear_min, self.config.throw_tear_max);
        let x_magnitude = (2.0 + self.random.uniform(0.0, 3.0)) * 0.5;
        let y_magnitude = -(3.0 + self.random.uniform(0.0, 3.0));
        let rot_magnitude = (2.0 + self.random.uniform(0.0, 3.0)) * 0.5;

        let left = ThrowSide {
            x: -x_magnitude,
            y: y_magnitude,
            z: 1.0,
            rot_z: rot_magnitude,
        };
        let right = ThrowSide {
            x: x_magnitude,
            y: y_magnitude,
            z: 1.0,
            rot_z: -rot_magnitude,
        };

        self.throw_progress = 0.0;
        self.throw_left = left;
        self.throw_right = right;

        self.phase = Phase::Throwing {
            start: now,
            tear_start: self.tear_amount,
            tear_target,
            left,
            right,
        };
    }

    fn finish_throw(&mut self, now: Instant) {
        if !self.assets.photos.is_empty() {
            self.photo_index = (self.photo_index + 1) % self.assets.photos.len();
        }
        self.tear_amount = 0.0;
        self.throw_progress = 0.0;
        self.throw_left = ThrowSide::ZERO;
        self.throw_right = ThrowSide::ZERO;
        // Chain straight into the next intro; no idle frame in between.
        self.start_intro(now);
    }

    fn start_reset(&mut self, now: Instant) {
        self.throw_progress = 0.0;
        self.throw_left = ThrowSide::ZERO;
        self.throw_right = ThrowSide::ZERO;
        self.phase = Phase::Resetting {
            start: now,
            tear_start: self.tear_amount,
        };
    }

    fn finish_reset(&mut self) {
        self.tear_amount = 0.0;
        self.throw_progress = 0.0;
        self.phase = Phase::Idle;
    }

    fn start_intro(&mut self, now: Instant) {
        let rotation = self.random.uniform(-PI, PI);
        self.group_y = self.config.intro_start_y;
        self.group_rot_z = rotation;
        self.phase = Phase::Intro {
            start: now,
            rotation,
        };
    }

    fn finish_intro(&mut self) {
        self.group_y = 0.0;
        self.group_rot_z = 0.0;
        self.phase = Phase::Idle;
    }

    /// Intro progress holds at zero through the delay, then runs over the
    /// intro duration.
    fn intro_progress(&self, now: Instant, start: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(start);
        match elapsed.checked_sub(self.config.intro_delay) {
            None => 0.0,
            Some(after_delay) => progress(after_delay, self.config.intro_duration),
        }
    }

    fn phase_progress(&self, now: Instant, start: Instant, duration: Duration) -> f32 {
        progress(now.saturating_duration_since(start), duration)
    }

    fn update_render_state(&mut self) {
        self.render_state = RenderState {
            tear_amount: self.tear_amount,
            throw_progress: self.throw_progress,
            throw_left: self.throw_left,
            throw_right: self.throw_right,
            group_y: self.group_y,
            group_rot_z: self.group_rot_z,
            photo_name: self.current_photo_name(),
            rip_name: self.assets.rip_name.clone(),
        };
    }

    fn current_photo_name(&self) -> String {
        if self.assets.photos.is_empty() {
            return String::new();
        }
        self.assets.photos[self.photo_index % self.assets.photos.len()].clone()
    }
}

impl Default for TearModel {
    fn default() -> Self {
        Self::new(
            TearConfig::default(),
            Assets::default(),
            TearRng::from_entropy(),
        )
    }
}
