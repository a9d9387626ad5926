//! # Control Packet Encoder
//!
//! Encodes a control sample into the fixed 13-byte wire layout.

use bytes::{BufMut, Bytes, BytesMut};

use super::protocol::{ControlSample, CONTROL_PACKET_SIZE};

/// Encode a control sample into a complete control packet
///
/// The layout is packed little-endian with a fixed field order (throttle,
/// roll, pitch, yaw, knob_pitch, knob_roll, buttons) and no padding, so the
/// receiver decodes by fixed offset. Encoding is deterministic and cannot
/// fail: out-of-range channel values are impossible by construction because
/// the input sampler already clamps.
///
/// # Arguments
///
/// * `sample` - Latest control sample, fully recomputed this iteration
///
/// # Returns
///
/// * `Bytes` - Complete 13-byte control packet
///
/// # Examples
///
/// ```
/// use ground_link::packet::encoder::encode_control_packet;
/// use ground_link::packet::protocol::{ControlSample, CONTROL_PACKET_SIZE};
///
/// let packet = encode_control_packet(&ControlSample::default());
/// assert_eq!(packet.len(), CONTROL_PACKET_SIZE);
/// ```
#[must_use]
pub fn encode_control_packet(sample: &ControlSample) -> Bytes {
    let mut buf = BytesMut::with_capacity(CONTROL_PACKET_SIZE);

    buf.put_i16_le(sample.throttle);
    buf.put_i16_le(sample.roll);
    buf.put_i16_le(sample.pitch);
    buf.put_i16_le(sample.yaw);
    buf.put_i16_le(sample.knob_pitch);
    buf.put_i16_le(sample.knob_roll);
    buf.put_u8(sample.buttons);

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::protocol::{BUTTON_ARM, BUTTON_UP, MAX_UNIT, MIN_UNIT};

    fn sample_with_distinct_fields() -> ControlSample {
        ControlSample {
            throttle: 1000,
            roll: 1100,
            pitch: 1200,
            yaw: 1300,
            knob_pitch: 1400,
            knob_roll: 1600,
            buttons: BUTTON_UP | BUTTON_ARM,
        }
    }

    #[test]
    fn test_encode_packet_length() {
        let packet = encode_control_packet(&ControlSample::default());
        assert_eq!(packet.len(), CONTROL_PACKET_SIZE);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let sample = sample_with_distinct_fields();
        let first = encode_control_packet(&sample);
        let second = encode_control_packet(&sample);
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_field_order_and_endianness() {
        let packet = encode_control_packet(&sample_with_distinct_fields());

        // 1000 = 0x03E8 little-endian
        assert_eq!(&packet[0..2], &[0xE8, 0x03]);
        // 1100 = 0x044C
        assert_eq!(&packet[2..4], &[0x4C, 0x04]);
        // 1200 = 0x04B0
        assert_eq!(&packet[4..6], &[0xB0, 0x04]);
        // 1300 = 0x0514
        assert_eq!(&packet[6..8], &[0x14, 0x05]);
        // 1400 = 0x0578
        assert_eq!(&packet[8..10], &[0x78, 0x05]);
        // 1600 = 0x0640
        assert_eq!(&packet[10..12], &[0x40, 0x06]);
        // Buttons: up (bit 0) + arm (bit 2)
        assert_eq!(packet[12], 0b0000_0101);
    }

    #[test]
    fn test_encode_range_extremes() {
        let sample = ControlSample {
            throttle: MIN_UNIT,
            roll: MAX_UNIT,
            pitch: MIN_UNIT,
            yaw: MAX_UNIT,
            knob_pitch: MIN_UNIT,
            knob_roll: MAX_UNIT,
            buttons: 0x0F,
        };
        let packet = encode_control_packet(&sample);

        // 2000 = 0x07D0
        assert_eq!(&packet[2..4], &[0xD0, 0x07]);
        assert_eq!(packet[12], 0x0F);
    }

    #[test]
    fn test_different_samples_encode_differently() {
        let mut other = sample_with_distinct_fields();
        other.yaw += 1;

        let a = encode_control_packet(&sample_with_distinct_fields());
        let b = encode_control_packet(&other);
        assert_ne!(a, b);
    }
}
