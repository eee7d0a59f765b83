//! Per-frame chase math
//!
//! `Motion` holds configuration and runtime state of one chaser and knows
//! nothing about subscriptions or listeners; the [`Chaser`](super::Chaser)
//! wraps it with those.

use tracing::trace;

use super::easing::Ease;
use crate::config::ChaseConfig;
use crate::ticker::FrameEvent;

#[derive(Debug, Clone)]
pub(crate) struct Motion {
    pub min: f64,
    pub max: f64,
    /// Working tolerance, `10^digits`
    pub tolerance: f64,
    pub friction: f64,
    pub initial: Option<f64>,
    pub ease: Option<Ease>,
    pub idle: bool,

    pub target: Option<f64>,
    pub current: Option<f64>,
    pub raw: Option<f64>,
    pub needs_update: bool,
    pub needs_change: bool,
    pub last_frame: Option<FrameEvent>,
}

impl Motion {
    pub fn new(config: ChaseConfig) -> Self {
        let mut motion = Self {
            min: config.min,
            max: config.max,
            tolerance: 1.0,
            friction: config.friction,
            initial: config.initial,
            ease: config.ease,
            idle: config.idle,
            target: None,
            current: None,
            raw: None,
            needs_update: false,
            needs_change: false,
            last_frame: None,
        };
        motion.set_tolerance(config.tolerance);
        motion
    }

    pub fn set_tolerance(&mut self, digits: u32) {
        self.tolerance = 10f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    }

    /// Set a new target, clamped to `max`. Returns true when the target changed.
    pub fn set_progress(&mut self, value: f64) -> bool {
        let value = if value > self.max { self.max } else { value };

        if self.target == Some(value) {
            return false;
        }

        self.target = Some(value);
        self.needs_update = true;
        true
    }

    /// Jump straight to `value`, skipping interpolation
    pub fn set_value(&mut self, value: f64) {
        self.target = Some(value);
        self.current = Some(value);
        self.raw = Some(value);
        self.needs_update = false;
        self.needs_change = true;
    }

    /// Whether the rounded value sits exactly on the target
    pub fn arrived(&self) -> bool {
        self.current == self.target
    }

    /// Write the current values onto an outgoing frame
    pub fn stamp(&self, frame: &mut FrameEvent) {
        frame.progress = self.current;
        frame.raw = self.raw;
    }

    fn ratio(&self, value: f64) -> f64 {
        (self.max - (self.max - value)) / (self.max - self.min)
    }

    /// Velocity multiplier derived from the easing curve, 1 without one
    fn eased_velocity(&self, target: f64, current: f64) -> f64 {
        match &self.ease {
            Some(ease) => {
                let closeness = 1.0 - (self.ratio(target) - self.ratio(current)).abs();
                let eased = ease.call(closeness, 0.0, 1.0, 1.0);
                1.0 + (eased - closeness)
            }
            None => 1.0,
        }
    }

    /// Advance `current` one step toward `target`
    pub fn advance(&mut self, frame: &FrameEvent) {
        self.last_frame = Some(*frame);

        // Nothing to chase before the first target is set
        let Some(target) = self.target else {
            return;
        };
        let current = *self.current.get_or_insert(target);

        let eased_velocity = self.eased_velocity(target, current);
        let fps_coefficient = frame.fps_coefficient();

        let distance = target - current;
        let step = distance * eased_velocity * fps_coefficient * (1.0 / self.friction);
        let next = ((current + step) * self.tolerance).round() / self.tolerance;

        if next == current {
            // Step is below the rounding precision: settle on the target
            self.raw = Some(next);
            self.current = Some(target);
        } else {
            self.raw = Some(next);
            self.current = Some(next);
        }

        trace!(target, current = next, step, "Chase step");
        self.needs_change = true;
    }
}
