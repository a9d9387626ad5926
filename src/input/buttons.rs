//! # GPIO Buttons Module
//!
//! Reads the four momentary buttons through GPIO inputs with internal
//! pull-ups. The buttons short their pin to ground when pressed, so a
//! pressed button reads logic-low; the sampler owns the polarity inversion.

use rppal::gpio::{Gpio, InputPin};
use tracing::info;

use crate::config::InputConfig;
use crate::error::{GroundLinkError, Result};
use crate::packet::protocol::NUM_BUTTONS;

use super::source::ButtonSource;

/// GPIO button bank handle
///
/// Pins are held in button-identity order: up, down, arm, disarm.
pub struct GpioButtons {
    pins: [InputPin; NUM_BUTTONS],
}

impl std::fmt::Debug for GpioButtons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpioButtons").finish_non_exhaustive()
    }
}

impl GpioButtons {
    /// Claim the configured pins as pulled-up inputs
    ///
    /// # Errors
    ///
    /// Returns [`GroundLinkError::Input`] if the GPIO controller or any pin
    /// cannot be claimed. Fatal at bring-up.
    pub fn open(config: &InputConfig) -> Result<Self> {
        let gpio = Gpio::new()
            .map_err(|e| GroundLinkError::Input(format!("Failed to open GPIO: {}", e)))?;

        let claim = |pin: u8| -> Result<InputPin> {
            Ok(gpio
                .get(pin)
                .map_err(|e| GroundLinkError::Input(format!("Failed to claim GPIO{}: {}", pin, e)))?
                .into_input_pullup())
        };

        let pins = [
            claim(config.pin_up)?,
            claim(config.pin_down)?,
            claim(config.pin_arm)?,
            claim(config.pin_disarm)?,
        ];

        info!(
            "Buttons on GPIO up={} down={} arm={} disarm={} (active-low, pulled up)",
            config.pin_up, config.pin_down, config.pin_arm, config.pin_disarm
        );

        Ok(Self { pins })
    }
}

impl ButtonSource for GpioButtons {
    fn read_levels(&mut self) -> Result<[bool; NUM_BUTTONS]> {
        let mut levels = [true; NUM_BUTTONS];
        for (level, pin) in levels.iter_mut().zip(self.pins.iter()) {
            *level = pin.is_high();
        }
        Ok(levels)
    }
}
