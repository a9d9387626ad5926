//! # Display Module
//!
//! Operator status screen.
//!
//! This module handles:
//! - The [`DisplayPanel`] drawing abstraction
//! - The SSD1306 OLED driver
//! - Rendering the status frame (battery, armed flag, primary sticks)
//!
//! Rendering is stateless: each refresh clears the buffer, redraws every
//! line from the current [`StatusFrame`] and flushes once.

pub mod panel_trait;
pub mod ssd1306;

pub use panel_trait::DisplayPanel;
pub use ssd1306::Ssd1306Panel;

use crate::error::Result;
use crate::packet::protocol::ControlSample;

/// One refresh worth of operator-facing status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFrame {
    /// Handset battery charge, 0-100.
    pub battery_percent: u8,
    /// Advisory armed flag.
    pub armed: bool,
    /// Throttle in link units.
    pub throttle: i16,
    /// Roll in link units.
    pub roll: i16,
    /// Pitch in link units.
    pub pitch: i16,
}

impl StatusFrame {
    /// Build a frame from the current sample and surrounding state.
    #[must_use]
    pub fn new(sample: &ControlSample, armed: bool, battery_percent: u8) -> Self {
        Self {
            battery_percent,
            armed,
            throttle: sample.throttle,
            roll: sample.roll,
            pitch: sample.pitch,
        }
    }
}

/// Draw one status frame and push it to the panel.
///
/// # Errors
///
/// Returns an error when the final flush fails; the caller logs and keeps
/// flying, since the display is purely advisory.
pub fn render<P: DisplayPanel + ?Sized>(panel: &mut P, frame: &StatusFrame) -> Result<()> {
    panel.clear();

    panel.draw_text(0, 0, &format!("BAT {:>3}%", frame.battery_percent));
    panel.draw_text(0, 1, if frame.armed { "ARMED" } else { "SAFE" });
    panel.draw_text(0, 3, &format!("THR   {}", frame.throttle));
    panel.draw_text(0, 4, &format!("ROLL  {}", frame.roll));
    panel.draw_text(0, 5, &format!("PITCH {}", frame.pitch));

    panel.flush()
}
