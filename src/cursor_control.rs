//! Cursor actuators.
//!
//! [`CursorController`] drives the real pointer on X11: absolute moves warp
//! the pointer, clicks are synthesized through the XTEST extension.
//! [`DryRunActuator`] only logs and counts, for replays without a display.

use crate::{
    cursor_smoother::ScreenSize,
    interfaces::{ClickKind, CursorActuator},
};
use log::{debug, info};

#[cfg(feature = "x11")]
pub use x11::CursorController;

/// Convert a screen coordinate to a pixel index within `[0, extent - 1]`
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamped into i16 range before the cast
pub fn to_pixel(value: f64, extent: u32) -> i16 {
    let max = f64::from(extent.saturating_sub(1).min(i16::MAX as u32));
    if value.is_finite() {
        value.round().clamp(0.0, max) as i16
    } else {
        0
    }
}

#[cfg(feature = "x11")]
mod x11 {
    use super::to_pixel;
    use crate::{
        cursor_smoother::ScreenSize,
        error::{AppError, Result},
        interfaces::{ClickKind, CursorActuator},
    };
    use log::{debug, info, warn};
    use x11rb::{
        connection::Connection,
        protocol::{
            xproto::{ConnectionExt as _, Screen, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT},
            xtest::ConnectionExt as _,
        },
        rust_connection::RustConnection,
    };

    const LEFT_BUTTON: u8 = 1;
    const RIGHT_BUTTON: u8 = 3;

    /// Cursor control implementation for X11
    pub struct CursorController {
        connection: RustConnection,
        screen: Screen,
        screen_width: u16,
        screen_height: u16,
        xtest: bool,
    }

    impl CursorController {
        /// Connect to the X11 display named by `$DISPLAY`
        ///
        /// # Errors
        ///
        /// Returns an error if the display cannot be reached
        pub fn new() -> Result<Self> {
            info!("Initializing X11 cursor controller");

            let (connection, screen_num) = RustConnection::connect(None)
                .map_err(|e| AppError::X11(format!("Failed to connect to X11: {e}")))?;

            let screen = connection
                .setup()
                .roots
                .get(screen_num)
                .ok_or_else(|| AppError::X11("Failed to get screen".to_string()))?
                .clone();

            let screen_width = screen.width_in_pixels;
            let screen_height = screen.height_in_pixels;

            let xtest = match connection.xtest_get_version(2, 2) {
                Ok(cookie) => cookie.reply().is_ok(),
                Err(_) => false,
            };
            if !xtest {
                warn!("XTEST extension unavailable, clicks will be ignored");
            }

            info!("Connected to X11 display, screen: {}x{}", screen_width, screen_height);

            Ok(Self {
                connection,
                screen,
                screen_width,
                screen_height,
                xtest,
            })
        }

        /// Set cursor position (absolute), clamped to the screen
        ///
        /// # Errors
        ///
        /// Returns an error if the request cannot be sent
        pub fn set_position(&self, x: i16, y: i16) -> Result<()> {
            debug!("Setting cursor position to ({}, {})", x, y);

            self.connection
                .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
                .map_err(|e| AppError::CursorControl(format!("Failed to warp pointer: {e}")))?;

            self.connection
                .flush()
                .map_err(|e| AppError::CursorControl(format!("Failed to flush connection: {e}")))?;

            Ok(())
        }

        /// Press and release a mouse button
        ///
        /// # Errors
        ///
        /// Returns an error if XTEST is missing or a request fails
        pub fn press_button(&self, button: u8) -> Result<()> {
            if !self.xtest {
                return Err(AppError::CursorControl("XTEST extension unavailable".to_string()));
            }

            for event in [BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT] {
                self.connection
                    .xtest_fake_input(event, button, x11rb::CURRENT_TIME, self.screen.root, 0, 0, 0)
                    .map_err(|e| AppError::CursorControl(format!("Failed to send button event: {e}")))?;
            }

            self.connection
                .flush()
                .map_err(|e| AppError::CursorControl(format!("Failed to flush connection: {e}")))?;

            Ok(())
        }

        fn perform_click(&self, kind: ClickKind) -> Result<()> {
            match kind {
                ClickKind::Primary => self.press_button(LEFT_BUTTON),
                ClickKind::Secondary => self.press_button(RIGHT_BUTTON),
                ClickKind::Double => {
                    self.press_button(LEFT_BUTTON)?;
                    self.press_button(LEFT_BUTTON)
                }
            }
        }
    }

    impl CursorActuator for CursorController {
        fn move_to(&mut self, x: f64, y: f64) {
            let x = to_pixel(x, u32::from(self.screen_width));
            let y = to_pixel(y, u32::from(self.screen_height));
            if let Err(e) = self.set_position(x, y) {
                warn!("{e}");
            }
        }

        fn click(&mut self, kind: ClickKind) {
            if let Err(e) = self.perform_click(kind) {
                warn!("{kind} click failed: {e}");
            }
        }

        fn screen_size(&self) -> Option<ScreenSize> {
            Some(ScreenSize::new(
                u32::from(self.screen_width),
                u32::from(self.screen_height),
            ))
        }
    }
}

/// Actuator that logs instead of moving the pointer
#[derive(Debug, Clone, Default)]
pub struct DryRunActuator {
    screen: Option<ScreenSize>,
    last_position: Option<(f64, f64)>,
    moves: usize,
    clicks: Vec<ClickKind>,
}

impl DryRunActuator {
    #[must_use]
    pub fn new(screen: Option<ScreenSize>) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn last_position(&self) -> Option<(f64, f64)> {
        self.last_position
    }

    #[must_use]
    pub const fn move_count(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub fn clicks(&self) -> &[ClickKind] {
        &self.clicks
    }
}

impl CursorActuator for DryRunActuator {
    fn move_to(&mut self, x: f64, y: f64) {
        debug!("move_to({x:.1}, {y:.1})");
        self.last_position = Some((x, y));
        self.moves += 1;
    }

    fn click(&mut self, kind: ClickKind) {
        info!("click: {kind}");
        self.clicks.push(kind);
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.screen
    }
}
