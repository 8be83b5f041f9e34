//! Per-frame eye closure classification.
//!
//! Openness is measured as the eyelid distance divided by the eye-corner
//! distance. The classifier keeps no state between frames; temporal logic
//! lives in [`crate::click_debouncer`].

use crate::constants::{EAR_THRESHOLD, EAR_THRESHOLD_EYEWEAR, EPSILON};
use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};

/// Four landmarks of one eye in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks {
    pub top: Point2<f64>,
    pub bottom: Point2<f64>,
    pub outer: Point2<f64>,
    pub inner: Point2<f64>,
}

impl EyeLandmarks {
    #[must_use]
    pub const fn new(top: Point2<f64>, bottom: Point2<f64>, outer: Point2<f64>, inner: Point2<f64>) -> Self {
        Self {
            top,
            bottom,
            outer,
            inner,
        }
    }

    /// Vertical over horizontal eye distance.
    ///
    /// Returns `None` when the corners (nearly) coincide or the ratio is not finite.
    #[must_use]
    pub fn openness(&self) -> Option<f64> {
        let horizontal = distance(&self.outer, &self.inner);
        if horizontal < EPSILON {
            return None;
        }
        let ratio = distance(&self.top, &self.bottom) / horizontal;
        ratio.is_finite().then_some(ratio)
    }
}

/// Landmarks of both eyes for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarkSet {
    pub left: EyeLandmarks,
    pub right: EyeLandmarks,
}

/// Openness thresholds, normal and eyewear-compensated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkThresholds {
    /// Threshold used without eyewear
    pub normal: f64,
    /// Raised threshold used while eyewear distorts the landmarks
    pub eyewear: f64,
}

impl BlinkThresholds {
    /// Threshold that applies for the given eyewear signal
    #[must_use]
    pub const fn select(&self, eyewear: bool) -> f64 {
        if eyewear {
            self.eyewear
        } else {
            self.normal
        }
    }
}

impl Default for BlinkThresholds {
    fn default() -> Self {
        Self {
            normal: EAR_THRESHOLD,
            eyewear: EAR_THRESHOLD_EYEWEAR,
        }
    }
}

/// Classification of one eye in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeState {
    /// Openness ratio, `None` for degenerate geometry
    pub openness: Option<f64>,
    pub closed: bool,
}

/// Classification of both eyes in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkReport {
    pub left: EyeState,
    pub right: EyeState,
    /// Threshold that was applied
    pub threshold: f64,
}

impl BlinkReport {
    /// True if either eye is closed
    #[must_use]
    pub const fn blinked(&self) -> bool {
        self.left.closed || self.right.closed
    }
}

/// Stateless blink classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinkSignal {
    thresholds: BlinkThresholds,
}

impl BlinkSignal {
    #[must_use]
    pub const fn new(thresholds: BlinkThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> BlinkThresholds {
        self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: BlinkThresholds) {
        self.thresholds = thresholds;
    }

    /// True if either eye is closed in this frame
    #[must_use]
    pub fn detect(&self, eyes: &EyeLandmarkSet, eyewear: bool) -> bool {
        self.classify(eyes, eyewear).blinked()
    }

    /// Per-eye breakdown of [`Self::detect`]
    #[must_use]
    pub fn classify(&self, eyes: &EyeLandmarkSet, eyewear: bool) -> BlinkReport {
        let threshold = self.thresholds.select(eyewear);
        BlinkReport {
            left: eye_state(&eyes.left, threshold),
            right: eye_state(&eyes.right, threshold),
            threshold,
        }
    }
}

fn eye_state(eye: &EyeLandmarks, threshold: f64) -> EyeState {
    let openness = eye.openness();
    EyeState {
        openness,
        // Undefined openness counts as open
        closed: openness.is_some_and(|ratio| ratio < threshold),
    }
}
