//! Constants used throughout the pipeline

use std::time::Duration;

/// Yaw (degrees) that maps to a full-scale horizontal direction
pub const MAX_YAW_DEGREES: f64 = 40.0;

/// Pitch (degrees) that maps to a full-scale vertical direction
pub const MAX_PITCH_DEGREES: f64 = 35.0;

/// Decimal places kept after normalizing angles
pub const ANGLE_ROUND_PLACES: i32 = 3;

/// Default sensitivity and deadzone
pub const DEFAULT_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_DEADZONE: f64 = 0.05;

/// Upper bound accepted for sensitivity from settings surfaces
pub const MAX_SENSITIVITY: f64 = 10.0;

/// Default exponential smoothing factor for cursor motion
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.2;

/// Default blink accumulation window
pub const DEFAULT_CLICK_INTERVAL: Duration = Duration::from_millis(200);

/// Motion suppression after a dispatched click
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_millis(100);

/// Openness ratio below which an eye counts as closed
pub const EAR_THRESHOLD: f64 = 0.25;

/// Raised openness threshold used while eyewear is detected
pub const EAR_THRESHOLD_EYEWEAR: f64 = 0.5;

/// Screen size assumed when neither the actuator nor config provides one
pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;

/// Normalized x range outside which eye/nose landmarks suggest eyewear
pub const EYEWEAR_MIN_X: f64 = 0.25;
pub const EYEWEAR_MAX_X: f64 = 0.8;

/// Face-mesh landmark indices
pub const LEFT_EYE_TOP: usize = 159;
pub const LEFT_EYE_BOTTOM: usize = 145;
pub const LEFT_EYE_OUTER: usize = 133;
pub const LEFT_EYE_INNER: usize = 33;
pub const RIGHT_EYE_TOP: usize = 386;
pub const RIGHT_EYE_BOTTOM: usize = 374;
pub const RIGHT_EYE_OUTER: usize = 362;
pub const RIGHT_EYE_INNER: usize = 263;
pub const NOSE_LANDMARKS: [usize; 4] = [1, 2, 168, 169];

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
