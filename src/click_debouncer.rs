//! Blink-count debouncing into click actions.
//!
//! Blinks are accumulated from the first blink of a window. Once the window
//! has elapsed, the next tick classifies the accumulated count:
//!
//! | blinks | action          |
//! |--------|-----------------|
//! | 1      | discarded       |
//! | 2      | primary click   |
//! | 3      | secondary click |
//! | 4+     | double click    |
//!
//! A single isolated blink never produces a click, so natural blinking
//! stays harmless and one blink alone is not a left click.

use crate::{constants::DEFAULT_CLICK_INTERVAL, interfaces::ClickKind};
use log::debug;
use std::time::{Duration, Instant};

/// Blinks gathered in the current window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClickAccumulator {
    pending_count: u32,
    window_start: Option<Instant>,
}

/// Time-windowed blink counter
#[derive(Debug, Clone)]
pub struct ClickDebouncer {
    click_interval: Duration,
    accumulator: ClickAccumulator,
}

impl ClickDebouncer {
    #[must_use]
    pub fn new(click_interval: Duration) -> Self {
        Self {
            click_interval,
            accumulator: ClickAccumulator::default(),
        }
    }

    /// Register a frame in which an eye was closed
    pub fn on_blink(&mut self, now: Instant) {
        let acc = &mut self.accumulator;
        if acc.pending_count == 0 {
            acc.window_start = Some(now);
        }
        acc.pending_count = acc.pending_count.saturating_add(1);
        debug!("Blink registered, pending count {}", acc.pending_count);
    }

    /// Called once per frame; returns the click to dispatch, if any
    pub fn on_tick(&mut self, now: Instant) -> Option<ClickKind> {
        let window_start = self.accumulator.window_start?;
        if now.saturating_duration_since(window_start) <= self.click_interval {
            return None;
        }

        let count = self.accumulator.pending_count;
        self.reset();

        match count {
            0 => None,
            1 => {
                debug!("Single blink discarded");
                None
            }
            2 => Some(ClickKind::Primary),
            3 => Some(ClickKind::Secondary),
            _ => Some(ClickKind::Double),
        }
    }

    /// Number of blinks in the current window
    #[must_use]
    pub const fn pending_count(&self) -> u32 {
        self.accumulator.pending_count
    }

    #[must_use]
    pub const fn click_interval(&self) -> Duration {
        self.click_interval
    }

    /// Change the window length; applies to the window in progress too
    pub fn set_click_interval(&mut self, click_interval: Duration) {
        self.click_interval = click_interval;
    }

    /// Drop any pending blinks
    pub fn reset(&mut self) {
        self.accumulator = ClickAccumulator::default();
    }
}

impl Default for ClickDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_INTERVAL)
    }
}
