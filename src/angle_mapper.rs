//! Head rotation to screen-space direction mapping.
//!
//! Yaw drives the horizontal axis and pitch the vertical axis. Both are
//! normalized against the expected head rotation range, rounded to suppress
//! model jitter, scaled by the user's sensitivity, clipped to `[-1, 1]` and
//! finally passed through a deadzone that zeroes small involuntary motion.

use crate::constants::{
    ANGLE_ROUND_PLACES, DEFAULT_DEADZONE, DEFAULT_SENSITIVITY, MAX_PITCH_DEGREES, MAX_YAW_DEGREES,
};
use serde::{Deserialize, Serialize};

/// Head rotation for one frame, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationAngles {
    /// Rotation around the viewing axis (unused for pointing)
    pub roll: f64,
    /// Positive when looking up
    pub pitch: f64,
    /// Positive when looking right
    pub yaw: f64,
}

impl RotationAngles {
    /// Create angles from roll, pitch and yaw in degrees
    #[must_use]
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Neutral orientation, used when no head transform is available
    #[must_use]
    pub const fn neutral() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Normalized pointing direction; `x` grows to the right, `y` grows upwards
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionVector {
    pub x: f64,
    pub y: f64,
}

impl DirectionVector {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The centered, non-moving direction
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Sensitivity parameters read by the mapper on every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Scale factor applied to the normalized direction (>= 0)
    pub sensitivity: f64,
    /// Magnitude at or below which a component is zeroed, in `[0, 1]`
    pub deadzone: f64,
}

impl SensitivityConfig {
    /// Build a config, clamping both values into their documented ranges
    #[must_use]
    pub fn new(sensitivity: f64, deadzone: f64) -> Self {
        Self {
            sensitivity: clamp_sensitivity(sensitivity),
            deadzone: clamp_deadzone(deadzone),
        }
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            deadzone: DEFAULT_DEADZONE,
        }
    }
}

/// Clamp a sensitivity value to be non-negative (NaN becomes 0)
#[must_use]
pub fn clamp_sensitivity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Clamp a deadzone value into `[0, 1]` (NaN becomes 0)
#[must_use]
pub fn clamp_deadzone(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Map head rotation to a direction vector
#[must_use]
pub fn map(angles: RotationAngles, config: SensitivityConfig) -> DirectionVector {
    let x = scale_axis(angles.yaw, MAX_YAW_DEGREES, config.sensitivity);
    let y = scale_axis(angles.pitch, MAX_PITCH_DEGREES, config.sensitivity);

    DirectionVector::new(
        filter_deadzone(x, config.deadzone),
        filter_deadzone(y, config.deadzone),
    )
}

/// Normalize, round, scale and clip a single axis
fn scale_axis(angle: f64, max_angle: f64, sensitivity: f64) -> f64 {
    let normalized = round_places(angle / max_angle, ANGLE_ROUND_PLACES);
    (normalized * sensitivity).clamp(-1.0, 1.0)
}

/// Round to a fixed number of decimal places
fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Zero a component unless it exceeds the deadzone in its own direction
#[must_use]
pub fn filter_deadzone(value: f64, deadzone: f64) -> f64 {
    if value > deadzone || value < -deadzone {
        value
    } else {
        0.0
    }
}
