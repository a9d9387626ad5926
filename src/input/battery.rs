//! # Battery Monitor Module
//!
//! Estimates remaining battery percentage from a divider-tapped ADC channel.
//!
//! The pack voltage is divided down onto an ADC pin; the monitor converts
//! the raw reading back through the reference voltage and divider ratio,
//! then maps it linearly between the empty and full thresholds, clamped to
//! [0, 100]. It feeds the status display only; the transmit path never
//! reads it.

use crate::config::BatteryConfig;
use crate::error::Result;
use crate::packet::protocol::ADC_FULL_SCALE;

use super::source::AnalogSource;

/// Linear battery percentage estimator.
///
/// # Examples
///
/// ```
/// use ground_link::input::battery::BatteryMonitor;
/// use ground_link::config::BatteryConfig;
///
/// let monitor = BatteryMonitor::from_config(&BatteryConfig::default());
///
/// // Raw 0 reads as an empty (or disconnected) pack
/// assert_eq!(monitor.percentage(0), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BatteryMonitor {
    channel: u8,
    divider_ratio: f32,
    vref: f32,
    empty_voltage: f32,
    full_voltage: f32,
}

impl BatteryMonitor {
    /// Creates a monitor from the battery configuration section.
    #[must_use]
    pub fn from_config(config: &BatteryConfig) -> Self {
        Self {
            channel: config.adc_channel,
            divider_ratio: config.divider_ratio,
            vref: config.vref,
            empty_voltage: config.empty_voltage,
            full_voltage: config.full_voltage,
        }
    }

    /// Returns the ADC channel the divider tap is wired to.
    #[must_use]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Converts a raw ADC reading into pack voltage.
    #[must_use]
    pub fn pack_voltage(&self, raw: u16) -> f32 {
        let pin_voltage = raw as f32 / ADC_FULL_SCALE as f32 * self.vref;
        pin_voltage * self.divider_ratio
    }

    /// Converts a raw ADC reading into a clamped 0-100 percentage.
    #[must_use]
    pub fn percentage(&self, raw: u16) -> u8 {
        let voltage = self.pack_voltage(raw);
        let fraction =
            (voltage - self.empty_voltage) / (self.full_voltage - self.empty_voltage);
        (fraction * 100.0).clamp(0.0, 100.0).round() as u8
    }

    /// Reads the battery channel and returns the percentage estimate.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator read failure; the display path absorbs it.
    pub fn read<A: AnalogSource>(&self, analog: &mut A) -> Result<u8> {
        let raw = analog.read(self.channel)?;
        Ok(self.percentage(raw))
    }
}
