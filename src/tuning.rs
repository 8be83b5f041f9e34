//! Runtime-tunable pipeline parameters.
//!
//! Settings surfaces (voice commands, sliders) may run on another thread than
//! the frame loop. They write through a [`TuningHandle`]; the orchestrator
//! takes one snapshot per frame. Values are clamped here, on write, so the
//! per-frame code never has to.

use crate::{
    angle_mapper::{clamp_deadzone, clamp_sensitivity, SensitivityConfig},
    blink::BlinkThresholds,
    constants::{DEFAULT_CLICK_INTERVAL, DEFAULT_SETTLE_DURATION, DEFAULT_SMOOTHING_ALPHA, MAX_SENSITIVITY},
    cursor_smoother::clamp_alpha,
};
use log::debug;
use parking_lot::RwLock;
use std::{sync::Arc, time::Duration};

/// Snapshot of all tunable parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Scales the mapped direction magnitude
    pub sensitivity: SensitivityConfig,
    /// Trades motion latency for noise rejection, in `(0, 1]`
    pub smoothing_alpha: f64,
    /// Blink accumulation window
    pub click_interval: Duration,
    /// Motion suppression after a click
    pub settle_duration: Duration,
    /// Eye closure thresholds
    pub blink_thresholds: BlinkThresholds,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sensitivity: SensitivityConfig::default(),
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            click_interval: DEFAULT_CLICK_INTERVAL,
            settle_duration: DEFAULT_SETTLE_DURATION,
            blink_thresholds: BlinkThresholds::default(),
        }
    }
}

impl Tuning {
    /// Return a copy with every value inside its documented range
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.sensitivity = SensitivityConfig::new(self.sensitivity.sensitivity, self.sensitivity.deadzone);
        self.smoothing_alpha = clamp_alpha(self.smoothing_alpha);
        self
    }
}

/// Shared, lock-protected tuning
#[derive(Debug, Clone, Default)]
pub struct TuningHandle {
    inner: Arc<RwLock<Tuning>>,
}

impl TuningHandle {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tuning.clamped())),
        }
    }

    /// Copy of the current values
    #[must_use]
    pub fn snapshot(&self) -> Tuning {
        *self.inner.read()
    }

    /// Replace all values at once
    pub fn replace(&self, tuning: Tuning) {
        *self.inner.write() = tuning.clamped();
    }

    pub fn set_sensitivity(&self, sensitivity: f64) {
        let value = clamp_sensitivity(sensitivity);
        debug!("Sensitivity set to {value}");
        self.inner.write().sensitivity.sensitivity = value;
    }

    /// Add `delta` to the sensitivity, keeping it within `[0, MAX_SENSITIVITY]`
    pub fn adjust_sensitivity(&self, delta: f64) -> f64 {
        let mut tuning = self.inner.write();
        let value = clamp_sensitivity(tuning.sensitivity.sensitivity + delta).min(MAX_SENSITIVITY);
        tuning.sensitivity.sensitivity = value;
        debug!("Sensitivity adjusted to {value}");
        value
    }

    pub fn set_deadzone(&self, deadzone: f64) {
        let value = clamp_deadzone(deadzone);
        debug!("Deadzone set to {value}");
        self.inner.write().sensitivity.deadzone = value;
    }

    /// Set sensitivity and deadzone together
    pub fn set_sensitivity_params(&self, sensitivity: f64, deadzone: f64) {
        self.inner.write().sensitivity = SensitivityConfig::new(sensitivity, deadzone);
    }

    pub fn set_smoothing_alpha(&self, alpha: f64) {
        self.inner.write().smoothing_alpha = clamp_alpha(alpha);
    }

    pub fn set_click_interval(&self, interval: Duration) {
        debug!("Click interval set to {:?}", interval);
        self.inner.write().click_interval = interval;
    }

    pub fn set_settle_duration(&self, duration: Duration) {
        self.inner.write().settle_duration = duration;
    }

    pub fn set_blink_thresholds(&self, thresholds: BlinkThresholds) {
        self.inner.write().blink_thresholds = thresholds;
    }
}
