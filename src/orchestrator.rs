//! Per-frame gesture pipeline.
//!
//! One frame runs, in order:
//! 1. provider → head transform, eye landmarks, eyewear signal
//! 2. angles → direction → smoothed screen position → `move_to`
//! 3. blink classification → debouncer
//! 4. debouncer tick → `click`, then the smoother starts settling
//!
//! Motion is computed before the click check so a click dispatched in this
//! frame only suppresses motion from the next frame on.

use crate::{
    angle_mapper::{self, DirectionVector, RotationAngles},
    blink::BlinkSignal,
    click_debouncer::ClickDebouncer,
    cursor_smoother::{CursorSmoother, ScreenPosition, ScreenSize},
    interfaces::{ClickKind, CursorActuator, FaceObservation, PoseLandmarkProvider},
    pose,
    tuning::{Tuning, TuningHandle},
    Result,
};
use log::{debug, info};
use std::time::Instant;

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub angles: RotationAngles,
    /// Raw direction before smoothing
    pub direction: DirectionVector,
    /// Position sent to the actuator, `None` while settling
    pub cursor: Option<ScreenPosition>,
    pub blinked: bool,
    pub click: Option<ClickKind>,
}

/// Drives the provider and the actuator through the gesture pipeline
pub struct GestureOrchestrator<P, A> {
    provider: P,
    actuator: A,
    tuning: TuningHandle,
    smoother: CursorSmoother,
    debouncer: ClickDebouncer,
    blink: BlinkSignal,
    /// Tuning currently pushed into the state machines
    applied: Tuning,
}

impl<P, A> GestureOrchestrator<P, A>
where
    P: PoseLandmarkProvider,
    A: CursorActuator,
{
    /// Create an orchestrator; the screen size comes from the actuator if it knows it
    pub fn new(provider: P, actuator: A, tuning: TuningHandle) -> Self {
        let screen = actuator.screen_size().unwrap_or_default();
        Self::with_screen(provider, actuator, tuning, screen)
    }

    /// Create an orchestrator for an explicit screen size
    pub fn with_screen(provider: P, actuator: A, tuning: TuningHandle, screen: ScreenSize) -> Self {
        let t = tuning.snapshot();
        info!(
            "Gesture pipeline on {}x{} screen, click interval {:?}",
            screen.width, screen.height, t.click_interval
        );

        Self {
            provider,
            actuator,
            smoother: CursorSmoother::new(t.smoothing_alpha, t.settle_duration, screen),
            debouncer: ClickDebouncer::new(t.click_interval),
            blink: BlinkSignal::new(t.blink_thresholds),
            applied: t,
            tuning,
        }
    }

    /// Run one frame through the provider and the pipeline
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged; pipeline state is untouched then
    pub fn process_frame(&mut self, frame: &P::Frame, now: Instant) -> Result<FrameOutcome> {
        let observation = self.provider.process(frame)?;
        Ok(self.process_observation(&observation, now))
    }

    /// Run steps 2 to 4 for an observation obtained elsewhere
    pub fn process_observation(&mut self, observation: &FaceObservation, now: Instant) -> FrameOutcome {
        let tuning = self.tuning.snapshot();
        if tuning != self.applied {
            self.apply_tuning(tuning);
        }

        let angles = pose::rotation_angles(observation.head_transform.as_ref());
        let direction = angle_mapper::map(angles, tuning.sensitivity);
        let cursor = self.smoother.update(direction, now);
        if let Some(pos) = cursor {
            self.actuator.move_to(pos.x, pos.y);
        }

        let blinked = self.blink.detect(&observation.eyes, observation.eyewear);
        if blinked {
            self.debouncer.on_blink(now);
        }

        let click = self.debouncer.on_tick(now);
        if let Some(kind) = click {
            info!("Dispatching {} click", kind);
            self.actuator.click(kind);
            self.smoother.on_action_dispatched(now);
        }

        FrameOutcome {
            angles,
            direction,
            cursor,
            blinked,
            click,
        }
    }

    fn apply_tuning(&mut self, tuning: Tuning) {
        debug!("Applying updated tuning: {:?}", tuning);
        self.smoother.set_alpha(tuning.smoothing_alpha);
        self.smoother.set_settle_duration(tuning.settle_duration);
        self.debouncer.set_click_interval(tuning.click_interval);
        self.blink.set_thresholds(tuning.blink_thresholds);
        self.applied = tuning;
    }

    /// Re-initialize smoothing and click state
    pub fn reset(&mut self) {
        debug!("Resetting gesture pipeline state");
        self.smoother.reset();
        self.debouncer.reset();
    }

    /// Handle for changing parameters, possibly from another thread
    #[must_use]
    pub fn tuning(&self) -> &TuningHandle {
        &self.tuning
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.smoother.set_screen(screen);
    }

    #[must_use]
    pub const fn smoother(&self) -> &CursorSmoother {
        &self.smoother
    }

    #[must_use]
    pub const fn debouncer(&self) -> &ClickDebouncer {
        &self.debouncer
    }

    #[must_use]
    pub const fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Tear down and hand back the collaborators
    pub fn into_parts(self) -> (P, A) {
        (self.provider, self.actuator)
    }
}
