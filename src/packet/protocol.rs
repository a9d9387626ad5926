//! # Control Link Protocol Constants and Types
//!
//! Core definitions for the ground-link control wire format.
//!
//! A control packet is 13 bytes, little-endian, no padding:
//!
//! | Offset | Size | Field |
//! |--------|------|-------------|
//! | 0 | 2 | throttle (`i16`) |
//! | 2 | 2 | roll (`i16`) |
//! | 4 | 2 | pitch (`i16`) |
//! | 6 | 2 | yaw (`i16`) |
//! | 8 | 2 | knob_pitch (`i16`) |
//! | 10 | 2 | knob_roll (`i16`) |
//! | 12 | 1 | buttons bitmask (`u8`) |

/// Lower bound of the calibrated channel range (full negative deflection).
pub const MIN_UNIT: i16 = 1000;

/// Upper bound of the calibrated channel range (full positive deflection).
pub const MAX_UNIT: i16 = 2000;

/// Center of the calibrated channel range.
pub const UNIT_CENTER: i16 = 1500;

/// Sum of the range bounds; mirroring a value around the midpoint is
/// `UNIT_MIRROR_SUM - value`.
pub const UNIT_MIRROR_SUM: i16 = MIN_UNIT + MAX_UNIT;

/// Full-scale raw reading of the 12-bit ADC input range.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Control packet size in bytes (6 × i16 + 1 × u8, packed).
pub const CONTROL_PACKET_SIZE: usize = 13;

/// Number of analog channels carried in a control packet.
pub const NUM_ANALOG_CHANNELS: usize = 6;

/// Number of wired momentary buttons (bitmask supports up to 8).
pub const NUM_BUTTONS: usize = 4;

/// "Up" button bitmask (bit 0).
pub const BUTTON_UP: u8 = 1 << 0;

/// "Down" button bitmask (bit 1).
pub const BUTTON_DOWN: u8 = 1 << 1;

/// "Arm" button bitmask (bit 2).
pub const BUTTON_ARM: u8 = 1 << 2;

/// "Disarm" button bitmask (bit 3).
pub const BUTTON_DISARM: u8 = 1 << 3;

/// Bits 4-7 of the bitmask are reserved and always transmitted as zero.
pub const BUTTON_RESERVED_MASK: u8 = 0xF0;

/// Analog channel identities, in ADC channel and wire-field order.
pub mod channels {
    /// Throttle - left stick Y (ADC channel 0).
    pub const THROTTLE: u8 = 0;
    /// Roll - right stick X (ADC channel 1).
    pub const ROLL: u8 = 1;
    /// Pitch - right stick Y (ADC channel 2).
    pub const PITCH: u8 = 2;
    /// Yaw - left stick X (ADC channel 3).
    pub const YAW: u8 = 3;
    /// Pitch trim knob (ADC channel 4).
    pub const KNOB_PITCH: u8 = 4;
    /// Roll trim knob (ADC channel 5).
    pub const KNOB_ROLL: u8 = 5;
}

/// One iteration's normalized readings across all input channels.
///
/// Every analog value lies within [`MIN_UNIT`]..=[`MAX_UNIT`] after the input
/// sampler's clamping; the bitmask reads asserted=1 per button. Samples are
/// fully recomputed each loop iteration, never merged with history.
///
/// # Examples
///
/// ```
/// use ground_link::packet::protocol::{ControlSample, MIN_UNIT, UNIT_CENTER};
///
/// let sample = ControlSample::default();
/// assert_eq!(sample.throttle, MIN_UNIT); // Idle throttle
/// assert_eq!(sample.roll, UNIT_CENTER);  // Sticks centered
/// assert_eq!(sample.buttons, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSample {
    /// Throttle channel value.
    pub throttle: i16,
    /// Roll channel value.
    pub roll: i16,
    /// Pitch channel value.
    pub pitch: i16,
    /// Yaw channel value.
    pub yaw: i16,
    /// Pitch trim knob value.
    pub knob_pitch: i16,
    /// Roll trim knob value.
    pub knob_roll: i16,
    /// Button bitmask, asserted=1 per button, bits 4-7 zero.
    pub buttons: u8,
}

impl Default for ControlSample {
    fn default() -> Self {
        Self {
            throttle: MIN_UNIT,
            roll: UNIT_CENTER,
            pitch: UNIT_CENTER,
            yaw: UNIT_CENTER,
            knob_pitch: UNIT_CENTER,
            knob_roll: UNIT_CENTER,
            buttons: 0,
        }
    }
}

impl ControlSample {
    /// Analog channel values in wire-field order.
    #[must_use]
    pub fn channel_values(&self) -> [i16; NUM_ANALOG_CHANNELS] {
        [
            self.throttle,
            self.roll,
            self.pitch,
            self.yaw,
            self.knob_pitch,
            self.knob_roll,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range_constants() {
        assert_eq!(MIN_UNIT, 1000);
        assert_eq!(MAX_UNIT, 2000);
        assert_eq!(UNIT_CENTER, 1500);
        assert_eq!(UNIT_MIRROR_SUM, 3000);
    }

    #[test]
    fn test_packet_size_matches_layout() {
        // 6 × i16 + 1 × u8, no padding
        assert_eq!(CONTROL_PACKET_SIZE, 6 * 2 + 1);
    }

    #[test]
    fn test_button_bits_are_distinct() {
        let bits = [BUTTON_UP, BUTTON_DOWN, BUTTON_ARM, BUTTON_DISARM];
        let mut combined = 0u8;
        for &bit in &bits {
            assert_eq!(combined & bit, 0, "button bits must not overlap");
            combined |= bit;
        }
        assert_eq!(combined & BUTTON_RESERVED_MASK, 0);
    }

    #[test]
    fn test_default_sample_is_in_range() {
        let sample = ControlSample::default();
        for value in sample.channel_values() {
            assert!((MIN_UNIT..=MAX_UNIT).contains(&value));
        }
        assert_eq!(sample.buttons, 0);
    }

    #[test]
    fn test_channel_values_order() {
        let sample = ControlSample {
            throttle: 1000,
            roll: 1100,
            pitch: 1200,
            yaw: 1300,
            knob_pitch: 1400,
            knob_roll: 1600,
            buttons: 0,
        };
        assert_eq!(
            sample.channel_values(),
            [1000, 1100, 1200, 1300, 1400, 1600]
        );
    }
}
