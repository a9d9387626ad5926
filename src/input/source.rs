//! Trait abstractions for the input collaborators to enable testing
//!
//! The sampler and battery monitor are written against these seams, so the
//! scheduling core runs unmodified against mocks on a development host.

use crate::error::Result;
use crate::packet::protocol::NUM_BUTTONS;

/// Synchronous, non-blocking analog input collaborator.
///
/// `read` returns a raw value in the fixed full-scale range 0 to
/// [`ADC_FULL_SCALE`](crate::packet::protocol::ADC_FULL_SCALE). Values beyond
/// full scale are tolerated downstream (the sampler clamps), but a conforming
/// source never produces them.
#[cfg_attr(test, mockall::automock)]
pub trait AnalogSource: Send {
    /// Read one channel's instantaneous raw value.
    fn read(&mut self, channel: u8) -> Result<u16>;
}

/// Synchronous, non-blocking digital button collaborator.
///
/// Returns raw electrical logic levels in button-identity order
/// (up, down, arm, disarm); `true` means logic-high. The buttons are wired
/// active-low, so a pressed button reads `false` here. Polarity inversion
/// happens in the sampler, not at this boundary.
#[cfg_attr(test, mockall::automock)]
pub trait ButtonSource: Send {
    /// Read all button levels at once.
    fn read_levels(&mut self) -> Result<[bool; NUM_BUTTONS]>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_analog_source() {
        let mut source = MockAnalogSource::new();
        source.expect_read().returning(|channel| Ok(channel as u16 * 100));

        assert_eq!(source.read(0).unwrap(), 0);
        assert_eq!(source.read(5).unwrap(), 500);
    }

    #[test]
    fn test_mock_button_source() {
        let mut source = MockButtonSource::new();
        source
            .expect_read_levels()
            .returning(|| Ok([true, true, false, true]));

        let levels = source.read_levels().unwrap();
        assert!(!levels[2]); // Arm button held (active-low)
    }
}
