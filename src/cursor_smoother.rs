//! Exponential smoothing of the pointing direction and mapping to the screen.

use crate::{
    angle_mapper::DirectionVector,
    constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_SETTLE_DURATION, DEFAULT_SMOOTHING_ALPHA, EPSILON},
};
use log::trace;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Absolute screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

/// Screen dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Map a normalized direction to absolute coordinates.
    ///
    /// `(-1, 1)` is the top-left corner and `(1, -1)` the bottom-right one;
    /// the y axis is inverted because looking up decreases the screen row.
    #[must_use]
    pub fn to_position(self, vector: DirectionVector) -> ScreenPosition {
        ScreenPosition {
            x: (1.0 + vector.x) * (f64::from(self.width) / 2.0),
            y: (1.0 - vector.y) * (f64::from(self.height) / 2.0),
        }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

/// Clamp a smoothing factor into `(0, 1]`
#[must_use]
pub fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        DEFAULT_SMOOTHING_ALPHA
    } else {
        alpha.clamp(EPSILON, 1.0)
    }
}

/// Cursor smoother with post-click settling
#[derive(Debug, Clone)]
pub struct CursorSmoother {
    alpha: f64,
    settle_duration: Duration,
    screen: ScreenSize,
    smoothed: DirectionVector,
    last_action_time: Option<Instant>,
}

impl CursorSmoother {
    /// Create a smoother; `alpha` is clamped into `(0, 1]`
    #[must_use]
    pub fn new(alpha: f64, settle_duration: Duration, screen: ScreenSize) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            settle_duration,
            screen,
            smoothed: DirectionVector::zero(),
            last_action_time: None,
        }
    }

    /// Feed a raw direction and get the new absolute cursor position.
    ///
    /// Returns `None` while the settle window after a dispatched action is
    /// still open; the smoothed vector is left untouched in that case.
    pub fn update(&mut self, raw: DirectionVector, now: Instant) -> Option<ScreenPosition> {
        if self.is_settling(now) {
            trace!("Cursor update suppressed while settling");
            return None;
        }

        self.smoothed.x = self.alpha * raw.x + (1.0 - self.alpha) * self.smoothed.x;
        self.smoothed.y = self.alpha * raw.y + (1.0 - self.alpha) * self.smoothed.y;

        Some(self.screen.to_position(self.smoothed))
    }

    /// Record that a click was just dispatched
    pub fn on_action_dispatched(&mut self, now: Instant) {
        self.last_action_time = Some(now);
    }

    fn is_settling(&self, now: Instant) -> bool {
        self.last_action_time
            .is_some_and(|last| now.saturating_duration_since(last) < self.settle_duration)
    }

    /// Current smoothed direction
    #[must_use]
    pub const fn smoothed(&self) -> DirectionVector {
        self.smoothed
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = clamp_alpha(alpha);
    }

    #[must_use]
    pub const fn settle_duration(&self) -> Duration {
        self.settle_duration
    }

    pub fn set_settle_duration(&mut self, settle_duration: Duration) {
        self.settle_duration = settle_duration;
    }

    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Forget the smoothed vector and any pending settle window
    pub fn reset(&mut self) {
        self.smoothed = DirectionVector::zero();
        self.last_action_time = None;
    }
}

impl Default for CursorSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_ALPHA, DEFAULT_SETTLE_DURATION, ScreenSize::default())
    }
}
