//! Recorded observation traces.
//!
//! A trace is a YAML document with one entry per processed camera frame.
//! Each frame carries its timestamp in seconds and either a head
//! transformation matrix or plain Euler angles, plus optional eye landmarks
//! (open eyes are assumed when they are omitted):
//!
//! ```yaml
//! frames:
//!   - t: 0.000
//!     angles: { roll: 0.0, pitch: 5.0, yaw: -12.0 }
//!   - t: 0.033
//!     head:
//!       - [1.0, 0.0, 0.0, 0.0]
//!       - [0.0, 1.0, 0.0, 0.0]
//!       - [0.0, 0.0, 1.0, 0.0]
//!       - [0.0, 0.0, 0.0, 1.0]
//!     eyes:
//!       left:  { top: [0.40, 0.47], bottom: [0.40, 0.53], outer: [0.45, 0.5], inner: [0.35, 0.5] }
//!       right: { top: [0.60, 0.47], bottom: [0.60, 0.53], outer: [0.55, 0.5], inner: [0.65, 0.5] }
//!     eyewear: false
//! ```

use crate::{
    angle_mapper::RotationAngles,
    blink::{EyeLandmarkSet, EyeLandmarks},
    interfaces::{FaceObservation, PoseLandmarkProvider},
    Error, Result,
};
use log::{debug, info};
use nalgebra::{Matrix4, Point2, Rotation3};
use serde::{Deserialize, Serialize};
use std::{
    path::Path,
    time::{Duration, Instant},
};

/// Whole recorded trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub frames: Vec<TraceFrame>,
}

/// One recorded frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Seconds since the start of the recording
    pub t: f64,
    /// Row-major head transformation, takes precedence over `angles`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<[[f64; 4]; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<AnglesRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyes: Option<EyesRecord>,
    #[serde(default)]
    pub eyewear: bool,
}

/// Euler angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnglesRecord {
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub yaw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyesRecord {
    pub left: EyeRecord,
    pub right: EyeRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeRecord {
    pub top: [f64; 2],
    pub bottom: [f64; 2],
    pub outer: [f64; 2],
    pub inner: [f64; 2],
}

impl EyeRecord {
    fn to_landmarks(self) -> EyeLandmarks {
        let p = |[x, y]: [f64; 2]| Point2::new(x, y);
        EyeLandmarks::new(p(self.top), p(self.bottom), p(self.outer), p(self.inner))
    }

    /// Eye centered at `cx` with an openness ratio of `openness`
    #[must_use]
    pub fn with_openness(cx: f64, openness: f64) -> Self {
        const HALF_WIDTH: f64 = 0.05;
        let half_gap = openness * HALF_WIDTH;
        Self {
            top: [cx, 0.5 - half_gap],
            bottom: [cx, 0.5 + half_gap],
            outer: [cx + HALF_WIDTH, 0.5],
            inner: [cx - HALF_WIDTH, 0.5],
        }
    }
}

impl EyesRecord {
    /// Both eyes with the same openness ratio
    #[must_use]
    pub fn with_openness(openness: f64) -> Self {
        Self {
            left: EyeRecord::with_openness(0.4, openness),
            right: EyeRecord::with_openness(0.6, openness),
        }
    }
}

impl Default for EyesRecord {
    /// Open under both the normal and the eyewear threshold
    fn default() -> Self {
        Self::with_openness(0.6)
    }
}

impl From<RotationAngles> for AnglesRecord {
    fn from(a: RotationAngles) -> Self {
        Self {
            roll: a.roll,
            pitch: a.pitch,
            yaw: a.yaw,
        }
    }
}

/// Head transform whose decomposition yields the given angles
#[must_use]
pub fn transform_from_angles(angles: AnglesRecord) -> Matrix4<f64> {
    Rotation3::from_euler_angles(
        (-angles.pitch).to_radians(),
        angles.yaw.to_radians(),
        angles.roll.to_radians(),
    )
    .to_homogeneous()
}

impl TraceFrame {
    /// Timestamp as an offset from the start of the recording.
    ///
    /// Saturates at `Duration::MAX` for timestamps that [`Trace::validate`] rejects.
    #[must_use]
    pub fn offset(&self) -> Duration {
        Duration::try_from_secs_f64(self.t.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Wall-clock instant of this frame for a replay started at `start`
    ///
    /// # Errors
    ///
    /// Returns a `TraceError` if the instant is not representable
    pub fn at(&self, start: Instant) -> Result<Instant> {
        start
            .checked_add(self.offset())
            .ok_or_else(|| Error::TraceError(format!("timestamp {} is out of range", self.t)))
    }

    /// Convert into the observation a live model would have produced
    #[must_use]
    pub fn to_observation(&self) -> FaceObservation {
        let head_transform = match (self.head, self.angles) {
            (Some(rows), _) => Some(Matrix4::from_fn(|r, c| rows[r][c])),
            (None, Some(angles)) => Some(transform_from_angles(angles)),
            (None, None) => None,
        };
        let eyes = self.eyes.unwrap_or_default();

        FaceObservation {
            head_transform,
            eyes: EyeLandmarkSet {
                left: eyes.left.to_landmarks(),
                right: eyes.right.to_landmarks(),
            },
            eyewear: self.eyewear,
        }
    }
}

impl Trace {
    /// Load a trace from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let trace = Self::from_yaml(&content)?;
        info!("Loaded {} frames from {}", trace.frames.len(), path.display());
        Ok(trace)
    }

    /// Parse and validate a trace
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or invalid timestamps
    pub fn from_yaml(content: &str) -> Result<Self> {
        let trace: Self =
            serde_yaml::from_str(content).map_err(|e| Error::TraceError(format!("Failed to parse trace: {e}")))?;
        trace.validate()?;
        Ok(trace)
    }

    /// Serialize the trace to YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::TraceError(format!("Failed to serialize trace: {e}")))
    }

    /// Timestamps must be finite, non-negative, representable as a duration and non-decreasing
    ///
    /// # Errors
    ///
    /// Returns a `TraceError` naming the first offending frame
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for (idx, frame) in self.frames.iter().enumerate() {
            if Duration::try_from_secs_f64(frame.t).is_err() {
                return Err(Error::TraceError(format!("Frame {idx}: invalid timestamp {}", frame.t)));
            }
            if frame.t < previous {
                return Err(Error::TraceError(format!(
                    "Frame {idx}: timestamp {} goes back in time (previous {previous})",
                    frame.t
                )));
            }
            previous = frame.t;
        }
        Ok(())
    }

    /// Recording length
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.frames.last().map(TraceFrame::offset).unwrap_or_default()
    }
}

/// Provider that replays recorded frames
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceProvider {
    processed: usize,
}

impl TraceProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames replayed so far
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }
}

impl PoseLandmarkProvider for TraceProvider {
    type Frame = TraceFrame;

    fn process(&mut self, frame: &TraceFrame) -> Result<FaceObservation> {
        self.processed += 1;
        debug!("Replaying frame {} at t={:.3}s", self.processed, frame.t);
        Ok(frame.to_observation())
    }
}
