//! Boundary contracts with the perception model and the pointer device.

use crate::{blink::EyeLandmarkSet, cursor_smoother::ScreenSize, Result};
use nalgebra::Matrix4;
use std::fmt;

/// Click action dispatched to the pointer device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    /// Left click
    Primary,
    /// Right click
    Secondary,
    /// Left double click
    Double,
}

impl ClickKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for ClickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the perception model reports for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FaceObservation {
    /// Head transformation (row-major 4x4), `None` if no face was found
    pub head_transform: Option<Matrix4<f64>>,
    pub eyes: EyeLandmarkSet,
    /// Eyewear detected; raises the blink threshold
    pub eyewear: bool,
}

/// Face landmark and head pose model
pub trait PoseLandmarkProvider {
    /// Input consumed per frame (camera image, recorded sample, ...)
    type Frame;

    /// Run the model on one frame
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot process the frame
    fn process(&mut self, frame: &Self::Frame) -> Result<FaceObservation>;
}

/// Pointer device
///
/// Failures stay inside the implementation; the pipeline does not retry.
pub trait CursorActuator {
    /// Move the pointer to an absolute position
    fn move_to(&mut self, x: f64, y: f64);

    /// Perform a click at the current position
    fn click(&mut self, kind: ClickKind);

    /// Size of the screen the pointer moves on, if known
    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }
}

impl<A: CursorActuator + ?Sized> CursorActuator for Box<A> {
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y);
    }

    fn click(&mut self, kind: ClickKind) {
        (**self).click(kind);
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        (**self).screen_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_kind_names() {
        assert_eq!(ClickKind::Primary.to_string(), "primary");
        assert_eq!(ClickKind::Secondary.to_string(), "secondary");
        assert_eq!(ClickKind::Double.to_string(), "double");
    }
}
