//! Face-mesh landmark selection and eyewear detection.
//!
//! Perception models report a dense mesh of normalized landmarks. The
//! pipeline only needs the lid and corner points of each eye plus a few nose
//! bridge points; this module picks them out and hosts the pluggable
//! eyewear signal.

use crate::{
    blink::{EyeLandmarkSet, EyeLandmarks},
    constants::{
        EYEWEAR_MAX_X, EYEWEAR_MIN_X, LEFT_EYE_BOTTOM, LEFT_EYE_INNER, LEFT_EYE_OUTER, LEFT_EYE_TOP,
        NOSE_LANDMARKS, RIGHT_EYE_BOTTOM, RIGHT_EYE_INNER, RIGHT_EYE_OUTER, RIGHT_EYE_TOP,
    },
    interfaces::FaceObservation,
};
use log::debug;
use nalgebra::{Matrix4, Point2};

/// Mesh indices of the four landmarks of one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeIndices {
    pub top: usize,
    pub bottom: usize,
    pub outer: usize,
    pub inner: usize,
}

impl EyeIndices {
    pub const LEFT: Self = Self {
        top: LEFT_EYE_TOP,
        bottom: LEFT_EYE_BOTTOM,
        outer: LEFT_EYE_OUTER,
        inner: LEFT_EYE_INNER,
    };

    pub const RIGHT: Self = Self {
        top: RIGHT_EYE_TOP,
        bottom: RIGHT_EYE_BOTTOM,
        outer: RIGHT_EYE_OUTER,
        inner: RIGHT_EYE_INNER,
    };

    #[must_use]
    pub const fn as_array(&self) -> [usize; 4] {
        [self.top, self.bottom, self.outer, self.inner]
    }

    fn extract(&self, mesh: &[Point2<f64>]) -> Option<EyeLandmarks> {
        Some(EyeLandmarks::new(
            *mesh.get(self.top)?,
            *mesh.get(self.bottom)?,
            *mesh.get(self.outer)?,
            *mesh.get(self.inner)?,
        ))
    }
}

impl EyeLandmarkSet {
    /// Pick both eyes out of a full face mesh; `None` if the mesh is too short
    #[must_use]
    pub fn from_mesh(mesh: &[Point2<f64>]) -> Option<Self> {
        Some(Self {
            left: EyeIndices::LEFT.extract(mesh)?,
            right: EyeIndices::RIGHT.extract(mesh)?,
        })
    }
}

/// Indices checked by the eyewear heuristics: both eyes, then the nose bridge
#[must_use]
pub fn eyewear_indices() -> impl Iterator<Item = usize> {
    EyeIndices::LEFT
        .as_array()
        .into_iter()
        .chain(EyeIndices::RIGHT.as_array())
        .chain(NOSE_LANDMARKS)
}

/// Capability that reports whether eyewear distorts the eye landmarks
pub trait EyewearDetector {
    fn detect(&self, mesh: &[Point2<f64>]) -> bool;
}

impl<F> EyewearDetector for F
where
    F: Fn(&[Point2<f64>]) -> bool,
{
    fn detect(&self, mesh: &[Point2<f64>]) -> bool {
        self(mesh)
    }
}

/// Flags eyewear when an eye or nose landmark lies outside a horizontal band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkBoundsDetector {
    pub min_x: f64,
    pub max_x: f64,
}

impl Default for LandmarkBoundsDetector {
    fn default() -> Self {
        Self {
            min_x: EYEWEAR_MIN_X,
            max_x: EYEWEAR_MAX_X,
        }
    }
}

impl EyewearDetector for LandmarkBoundsDetector {
    fn detect(&self, mesh: &[Point2<f64>]) -> bool {
        eyewear_indices()
            .filter_map(|idx| mesh.get(idx))
            .any(|p| p.x < self.min_x || p.x > self.max_x)
    }
}

/// Eyewear if any of the wrapped detectors fires
#[derive(Default)]
pub struct AnyOf {
    detectors: Vec<Box<dyn EyewearDetector + Send>>,
}

impl AnyOf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, detector: impl EyewearDetector + Send + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl EyewearDetector for AnyOf {
    fn detect(&self, mesh: &[Point2<f64>]) -> bool {
        self.detectors.iter().any(|d| d.detect(mesh))
    }
}

impl FaceObservation {
    /// Build an observation from a full mesh, running the eyewear detector on it
    ///
    /// Returns `None` if the mesh lacks any of the eye landmarks.
    pub fn from_mesh(
        head_transform: Option<Matrix4<f64>>,
        mesh: &[Point2<f64>],
        eyewear: &dyn EyewearDetector,
    ) -> Option<Self> {
        let Some(eyes) = EyeLandmarkSet::from_mesh(mesh) else {
            debug!("Face mesh has only {} landmarks, eyes unavailable", mesh.len());
            return None;
        };
        Some(Self {
            head_transform,
            eyes,
            eyewear: eyewear.detect(mesh),
        })
    }
}
