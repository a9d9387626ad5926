//! # Control Packet Decoder
//!
//! Decodes a 13-byte control packet back into a control sample.
//!
//! The steady-state transmitter never decodes its own traffic; this is the
//! consumer-side half of the wire format, used by the receiving end and by
//! loopback tests to verify that encoding round-trips exactly.

use bytes::Buf;

use super::protocol::{ControlSample, CONTROL_PACKET_SIZE};
use crate::error::{GroundLinkError, Result};

/// Decode a complete control packet
///
/// # Arguments
///
/// * `packet` - Exactly [`CONTROL_PACKET_SIZE`] bytes in wire layout
///
/// # Returns
///
/// * `Result<ControlSample>` - Decoded sample, or error if the length is wrong
///
/// # Errors
///
/// Returns [`GroundLinkError::Packet`] if `packet` is not exactly 13 bytes;
/// a fixed-size layout has no valid truncated or extended form.
///
/// # Examples
///
/// ```
/// use ground_link::packet::decoder::decode_control_packet;
/// use ground_link::packet::encoder::encode_control_packet;
/// use ground_link::packet::protocol::ControlSample;
///
/// let sample = ControlSample::default();
/// let packet = encode_control_packet(&sample);
/// assert_eq!(decode_control_packet(&packet)?, sample);
/// # Ok::<(), ground_link::error::GroundLinkError>(())
/// ```
pub fn decode_control_packet(packet: &[u8]) -> Result<ControlSample> {
    if packet.len() != CONTROL_PACKET_SIZE {
        return Err(GroundLinkError::Packet(format!(
            "Invalid packet length: expected {} bytes, got {}",
            CONTROL_PACKET_SIZE,
            packet.len()
        )));
    }

    let mut buf = packet;

    Ok(ControlSample {
        throttle: buf.get_i16_le(),
        roll: buf.get_i16_le(),
        pitch: buf.get_i16_le(),
        yaw: buf.get_i16_le(),
        knob_pitch: buf.get_i16_le(),
        knob_roll: buf.get_i16_le(),
        buttons: buf.get_u8(),
    })
}
