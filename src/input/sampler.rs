//! # Input Sampler Module
//!
//! Turns raw sensor state into a calibrated [`ControlSample`].
//!
//! ## Remapping
//!
//! Each analog channel's raw 0-4095 reading is linearly remapped onto the
//! [1000, 2000] range and then clamped to it. In-range raw values land in
//! range by construction; the clamp only bites on noisy or out-of-spec
//! readings, which are silently folded back to the nearest bound rather
//! than treated as errors.
//!
//! ## Inversion
//!
//! A channel marked inverted has its output reflected around the range
//! midpoint: `3000 - value`. This is the exact mirror image of the
//! non-inverted mapping at every input value, not a remap onto a reversed
//! input range.
//!
//! ## Buttons
//!
//! Buttons are wired active-low; the sampler inverts the polarity so the
//! bitmask reads asserted=1 at fixed bit positions. No debouncing and no
//! edge detection here: raw instantaneous level per iteration.
//!
//! ## Usage
//!
//! ```no_run
//! use ground_link::input::sampler::InputSampler;
//! use ground_link::input::mcp3208::Mcp3208;
//! use ground_link::input::buttons::GpioButtons;
//! use ground_link::config::InputConfig;
//!
//! let config = InputConfig::default();
//! let sampler = InputSampler::from_config(&config);
//! let mut adc = Mcp3208::open(&config)?;
//! let mut buttons = GpioButtons::open(&config)?;
//!
//! let sample = sampler.sample(&mut adc, &mut buttons)?;
//! # Ok::<(), ground_link::error::GroundLinkError>(())
//! ```

use crate::config::InputConfig;
use crate::error::Result;
use crate::packet::protocol::{
    channels, ControlSample, ADC_FULL_SCALE, MAX_UNIT, MIN_UNIT, NUM_ANALOG_CHANNELS, NUM_BUTTONS,
    UNIT_MIRROR_SUM,
};

use super::source::{AnalogSource, ButtonSource};

/// Linearly remaps a raw ADC reading onto the calibrated range and clamps.
///
/// # Arguments
///
/// * `raw` - Raw reading, nominally 0 to [`ADC_FULL_SCALE`]
///
/// # Returns
///
/// Calibrated value in [`MIN_UNIT`]..=[`MAX_UNIT`], always, regardless of
/// out-of-range input.
///
/// # Examples
///
/// ```
/// use ground_link::input::sampler::remap_raw;
///
/// assert_eq!(remap_raw(0), 1000);
/// assert_eq!(remap_raw(4095), 2000);
/// assert_eq!(remap_raw(2048), 1500);
/// ```
#[must_use]
pub fn remap_raw(raw: u16) -> i16 {
    let span = (MAX_UNIT - MIN_UNIT) as i32;
    let unit = MIN_UNIT as i32 + (raw as i32 * span) / ADC_FULL_SCALE as i32;
    unit.clamp(MIN_UNIT as i32, MAX_UNIT as i32) as i16
}

/// Reflects a calibrated value around the range midpoint.
///
/// `mirror_unit(remap_raw(x))` is the inverted channel mapping; applying it
/// twice returns the original value.
///
/// # Examples
///
/// ```
/// use ground_link::input::sampler::mirror_unit;
///
/// assert_eq!(mirror_unit(1000), 2000);
/// assert_eq!(mirror_unit(2000), 1000);
/// assert_eq!(mirror_unit(1500), 1500);
/// ```
#[must_use]
pub fn mirror_unit(value: i16) -> i16 {
    UNIT_MIRROR_SUM - value
}

/// Samples all physical controls into a [`ControlSample`].
///
/// Pure function of current sensor state: no history, no side effects
/// beyond the hardware reads themselves.
#[derive(Debug, Clone)]
pub struct InputSampler {
    /// Per-channel inversion flags, indexed by ADC channel.
    inverted: [bool; NUM_ANALOG_CHANNELS],
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl InputSampler {
    /// Creates a sampler with the given inverted channel indices.
    ///
    /// Out-of-range indices are ignored; configuration validation rejects
    /// them before this point in normal operation.
    #[must_use]
    pub fn new(inverted_channels: &[usize]) -> Self {
        let mut inverted = [false; NUM_ANALOG_CHANNELS];
        for &channel in inverted_channels {
            if channel < NUM_ANALOG_CHANNELS {
                inverted[channel] = true;
            }
        }
        Self { inverted }
    }

    /// Creates a sampler from the input configuration section.
    #[must_use]
    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(&config.inverted_channels)
    }

    /// Returns whether a channel is configured as inverted.
    #[must_use]
    pub fn is_inverted(&self, channel: usize) -> bool {
        channel < NUM_ANALOG_CHANNELS && self.inverted[channel]
    }

    /// Reads and calibrates every control into a fresh sample.
    ///
    /// # Errors
    ///
    /// Propagates collaborator read failures; the caller decides whether to
    /// absorb them (the steady-state loop does).
    pub fn sample<A: AnalogSource, B: ButtonSource>(
        &self,
        analog: &mut A,
        buttons: &mut B,
    ) -> Result<ControlSample> {
        Ok(ControlSample {
            throttle: self.read_channel(analog, channels::THROTTLE)?,
            roll: self.read_channel(analog, channels::ROLL)?,
            pitch: self.read_channel(analog, channels::PITCH)?,
            yaw: self.read_channel(analog, channels::YAW)?,
            knob_pitch: self.read_channel(analog, channels::KNOB_PITCH)?,
            knob_roll: self.read_channel(analog, channels::KNOB_ROLL)?,
            buttons: Self::read_buttons(buttons)?,
        })
    }

    /// Reads one analog channel through remap, clamp and optional mirror.
    fn read_channel<A: AnalogSource>(&self, analog: &mut A, channel: u8) -> Result<i16> {
        let raw = analog.read(channel)?;
        let mut value = remap_raw(raw);
        if self.inverted[channel as usize] {
            value = mirror_unit(value);
        }
        Ok(value)
    }

    /// Reads the buttons and folds them into an asserted=1 bitmask.
    fn read_buttons<B: ButtonSource>(buttons: &mut B) -> Result<u8> {
        let levels = buttons.read_levels()?;
        let mut mask = 0u8;
        for (index, &level) in levels.iter().enumerate().take(NUM_BUTTONS) {
            // Active-low wiring: pressed reads logic-low
            if !level {
                mask |= 1 << index;
            }
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::source::{MockAnalogSource, MockButtonSource};
    use crate::packet::protocol::{BUTTON_ARM, BUTTON_DISARM, BUTTON_DOWN, BUTTON_UP};

    fn released_buttons() -> MockButtonSource {
        let mut buttons = MockButtonSource::new();
        buttons.expect_read_levels().returning(|| Ok([true; NUM_BUTTONS]));
        buttons
    }

    // ==================== Remap Tests ====================

    #[test]
    fn test_remap_endpoints() {
        assert_eq!(remap_raw(0), MIN_UNIT);
        assert_eq!(remap_raw(ADC_FULL_SCALE), MAX_UNIT);
    }

    #[test]
    fn test_remap_midpoint() {
        assert_eq!(remap_raw(2048), 1500);
    }

    #[test]
    fn test_remap_quarter_points() {
        let quarter = remap_raw(1024);
        assert!((1249..=1251).contains(&quarter));

        let three_quarter = remap_raw(3072);
        assert!((1749..=1751).contains(&three_quarter));
    }

    #[test]
    fn test_remap_monotonic() {
        let mut previous = remap_raw(0);
        for raw in 1..=ADC_FULL_SCALE {
            let value = remap_raw(raw);
            assert!(value >= previous, "remap must be monotonic at raw={}", raw);
            previous = value;
        }
    }

    #[test]
    fn test_clamping_invariant_over_full_scale() {
        for raw in 0..=ADC_FULL_SCALE {
            let value = remap_raw(raw);
            assert!(
                (MIN_UNIT..=MAX_UNIT).contains(&value),
                "raw={} escaped the calibrated range: {}",
                raw,
                value
            );
        }
    }

    #[test]
    fn test_clamp_catches_out_of_spec_raw() {
        // A 12-bit ADC cannot produce these, but a glitching one might
        assert_eq!(remap_raw(5000), MAX_UNIT);
        assert_eq!(remap_raw(u16::MAX), MAX_UNIT);
    }

    // ==================== Inversion Tests ====================

    #[test]
    fn test_mirror_is_involution() {
        for value in [MIN_UNIT, 1250, 1500, 1750, MAX_UNIT] {
            assert_eq!(mirror_unit(mirror_unit(value)), value);
        }
    }

    #[test]
    fn test_inversion_mirrors_remap_everywhere() {
        // invert(map(x)) == 3000 - map(x) for all x
        for raw in (0..=ADC_FULL_SCALE).step_by(7) {
            assert_eq!(mirror_unit(remap_raw(raw)), UNIT_MIRROR_SUM - remap_raw(raw));
        }
    }

    #[test]
    fn test_inverted_channel_endpoints() {
        let sampler = InputSampler::new(&[0]);
        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|channel| {
            Ok(if channel == 0 { 0 } else { 2048 })
        });

        let sample = sampler.sample(&mut analog, &mut released_buttons()).unwrap();
        // Raw 0 on an inverted channel reads full positive
        assert_eq!(sample.throttle, MAX_UNIT);

        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|channel| {
            Ok(if channel == 0 { ADC_FULL_SCALE } else { 2048 })
        });
        let sample = sampler.sample(&mut analog, &mut released_buttons()).unwrap();
        assert_eq!(sample.throttle, MIN_UNIT);
    }

    #[test]
    fn test_non_inverted_channels_unaffected() {
        let sampler = InputSampler::new(&[0]);
        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(ADC_FULL_SCALE));

        let sample = sampler.sample(&mut analog, &mut released_buttons()).unwrap();
        assert_eq!(sample.throttle, MIN_UNIT); // Inverted
        assert_eq!(sample.roll, MAX_UNIT); // Not inverted
        assert_eq!(sample.yaw, MAX_UNIT);
    }

    #[test]
    fn test_new_ignores_out_of_range_indices() {
        let sampler = InputSampler::new(&[1, 6, 100]);
        assert!(sampler.is_inverted(1));
        assert!(!sampler.is_inverted(6));
        assert!(!sampler.is_inverted(100));
    }

    // ==================== Button Tests ====================

    #[test]
    fn test_all_buttons_released_reads_zero() {
        let sampler = InputSampler::default();
        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(2048));

        let sample = sampler.sample(&mut analog, &mut released_buttons()).unwrap();
        assert_eq!(sample.buttons, 0);
    }

    #[test]
    fn test_active_low_polarity_inverted() {
        let sampler = InputSampler::default();
        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(2048));

        let mut buttons = MockButtonSource::new();
        // Arm held: its line reads logic-low
        buttons
            .expect_read_levels()
            .returning(|| Ok([true, true, false, true]));

        let sample = sampler.sample(&mut analog, &mut buttons).unwrap();
        assert_eq!(sample.buttons, BUTTON_ARM);
    }

    #[test]
    fn test_button_bit_positions_fixed() {
        let sampler = InputSampler::default();
        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(2048));

        let mut buttons = MockButtonSource::new();
        buttons
            .expect_read_levels()
            .returning(|| Ok([false, false, false, false]));

        let sample = sampler.sample(&mut analog, &mut buttons).unwrap();
        assert_eq!(
            sample.buttons,
            BUTTON_UP | BUTTON_DOWN | BUTTON_ARM | BUTTON_DISARM
        );
        // Reserved bits stay zero
        assert_eq!(sample.buttons & 0xF0, 0);
    }

    // ==================== Sampling Tests ====================

    #[test]
    fn test_sample_reads_each_channel_once() {
        let sampler = InputSampler::default();
        let mut analog = MockAnalogSource::new();
        for channel in 0..NUM_ANALOG_CHANNELS as u8 {
            analog
                .expect_read()
                .withf(move |&c| c == channel)
                .times(1)
                .returning(|c| Ok(c as u16 * 100));
        }

        let sample = sampler.sample(&mut analog, &mut released_buttons()).unwrap();
        // Channel 5 raw 500 -> 1000 + 500*1000/4095 = 1122
        assert_eq!(sample.knob_roll, 1122);
    }

    #[test]
    fn test_sample_propagates_read_error() {
        let sampler = InputSampler::default();
        let mut analog = MockAnalogSource::new();
        analog
            .expect_read()
            .returning(|_| Err(crate::error::GroundLinkError::Input("adc gone".into())));

        let result = sampler.sample(&mut analog, &mut released_buttons());
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_is_fully_recomputed() {
        // Two consecutive samples reflect only the instantaneous reads
        let sampler = InputSampler::default();

        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(0));
        let first = sampler.sample(&mut analog, &mut released_buttons()).unwrap();

        let mut analog = MockAnalogSource::new();
        analog.expect_read().returning(|_| Ok(ADC_FULL_SCALE));
        let second = sampler.sample(&mut analog, &mut released_buttons()).unwrap();

        assert_eq!(first.roll, MIN_UNIT);
        assert_eq!(second.roll, MAX_UNIT);
    }
}
