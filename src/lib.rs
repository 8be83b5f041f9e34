//! Hands-free pointer control from head pose and eye blinks.
//!
//! This library turns per-frame head orientation and eye landmarks into
//! cursor motion and click actions:
//! - head rotation is mapped to a deadzone-filtered direction vector
//! - the direction is exponentially smoothed into an absolute screen position
//! - eye openness is compared with an adaptive threshold to detect blinks
//! - blink counts within a short window are classified into clicks
//!
//! The face landmark model and the pointer device are collaborators behind
//! the [`interfaces::PoseLandmarkProvider`] and [`interfaces::CursorActuator`]
//! traits.
//!
//! # Examples
//!
//! ## Mapping head rotation
//!
//! ```
//! use blink_pilot::angle_mapper::{map, RotationAngles, SensitivityConfig};
//!
//! let direction = map(RotationAngles::new(0.0, 17.5, 0.0), SensitivityConfig::new(1.0, 0.0));
//! assert!((direction.y - 0.5).abs() < 1e-9);
//! ```
//!
//! ## Counting blinks into clicks
//!
//! ```
//! use blink_pilot::{click_debouncer::ClickDebouncer, interfaces::ClickKind};
//! use std::time::{Duration, Instant};
//!
//! let mut debouncer = ClickDebouncer::new(Duration::from_millis(200));
//! let t0 = Instant::now();
//! debouncer.on_blink(t0);
//! debouncer.on_blink(t0 + Duration::from_millis(50));
//!
//! assert_eq!(debouncer.on_tick(t0 + Duration::from_millis(100)), None);
//! assert_eq!(debouncer.on_tick(t0 + Duration::from_millis(250)), Some(ClickKind::Primary));
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```
//! use blink_pilot::{
//!     cursor_control::DryRunActuator,
//!     cursor_smoother::ScreenSize,
//!     orchestrator::GestureOrchestrator,
//!     trace::{Trace, TraceProvider},
//!     tuning::TuningHandle,
//! };
//! use std::time::Instant;
//!
//! # fn main() -> blink_pilot::Result<()> {
//! let trace = Trace::from_yaml("frames:\n  - t: 0.0\n    angles: { yaw: 20.0 }\n")?;
//! let actuator = DryRunActuator::new(Some(ScreenSize::new(1920, 1080)));
//! let mut pipeline = GestureOrchestrator::new(TraceProvider::new(), actuator, TuningHandle::default());
//!
//! let start = Instant::now();
//! for frame in &trace.frames {
//!     let outcome = pipeline.process_frame(frame, frame.at(start)?)?;
//!     println!("direction {:?} cursor {:?}", outcome.direction, outcome.cursor);
//! }
//! # Ok(())
//! # }
//! ```

/// Head rotation to direction vector mapping
pub mod angle_mapper;

/// Exponential cursor smoothing and screen mapping
pub mod cursor_smoother;

/// Per-frame eye closure classification
pub mod blink;

/// Blink-count debouncing into clicks
pub mod click_debouncer;

/// Per-frame pipeline driver
pub mod orchestrator;

/// Head transformation matrix decomposition
pub mod pose;

/// Face-mesh landmark selection and eyewear detection
pub mod landmarks;

/// Provider and actuator contracts
pub mod interfaces;

/// Runtime-tunable parameters
pub mod tuning;

/// Recorded observation traces
pub mod trace;

/// Cursor actuators (X11 and dry run)
pub mod cursor_control;

/// Error types and result handling
pub mod error;

/// Constants used throughout the pipeline
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
