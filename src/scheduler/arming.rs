//! # Armed State Module
//!
//! Advisory arm/disarm flag for operator feedback.
//!
//! The flag flips on button edges only: a transition-to-asserted of the arm
//! bit sets it, a transition-to-asserted of the disarm bit clears it, and
//! every other bit is ignored. It is never read by the transmit path - the
//! packet always carries the raw bitmask - so the remote vehicle stays the
//! sole authority on actual arm state. This flag drives the status display
//! and nothing else.

use crate::packet::protocol::{BUTTON_ARM, BUTTON_DISARM};

/// Edge-triggered advisory armed flag.
///
/// # Examples
///
/// ```
/// use ground_link::scheduler::ArmedState;
/// use ground_link::packet::protocol::{BUTTON_ARM, BUTTON_DISARM};
///
/// let mut armed = ArmedState::new();
/// assert!(!armed.is_armed());
///
/// armed.update(BUTTON_ARM);
/// assert!(armed.is_armed());
///
/// armed.update(0);
/// assert!(armed.is_armed()); // Releasing changes nothing
///
/// armed.update(BUTTON_DISARM);
/// assert!(!armed.is_armed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArmedState {
    armed: bool,
    previous_mask: u8,
}

impl ArmedState {
    /// Creates a disarmed state with no button history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current advisory flag.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feeds one iteration's button bitmask through the edge detector.
    ///
    /// Only bits that transitioned from released to asserted since the last
    /// call have any effect. If arm and disarm assert on the same iteration,
    /// disarm wins: the safe reading of a contradictory input.
    pub fn update(&mut self, mask: u8) {
        let rising = mask & !self.previous_mask;

        if rising & BUTTON_ARM != 0 {
            self.armed = true;
        }
        if rising & BUTTON_DISARM != 0 {
            self.armed = false;
        }

        self.previous_mask = mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::protocol::{BUTTON_DOWN, BUTTON_UP};

    #[test]
    fn test_starts_disarmed() {
        assert!(!ArmedState::new().is_armed());
    }

    #[test]
    fn test_arm_edge_sets() {
        let mut armed = ArmedState::new();
        armed.update(0b0000_0100); // Arm asserted only
        assert!(armed.is_armed());
    }

    #[test]
    fn test_disarm_edge_clears() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_ARM);
        armed.update(0);
        armed.update(0b0000_1000); // Disarm asserted only
        assert!(!armed.is_armed());
    }

    #[test]
    fn test_zero_mask_leaves_prior_value() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_ARM);
        armed.update(0b0000_0000);
        assert!(armed.is_armed());

        armed.update(BUTTON_DISARM);
        armed.update(0b0000_0000);
        assert!(!armed.is_armed());
    }

    #[test]
    fn test_held_button_triggers_once() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_ARM);
        assert!(armed.is_armed());

        // Arm still held while disarm fires; held arm is not a new edge
        armed.update(BUTTON_ARM | BUTTON_DISARM);
        assert!(!armed.is_armed());

        // Keep holding both: no new edges, no change
        armed.update(BUTTON_ARM | BUTTON_DISARM);
        assert!(!armed.is_armed());
    }

    #[test]
    fn test_simultaneous_edges_disarm_wins() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_ARM | BUTTON_DISARM);
        assert!(!armed.is_armed());
    }

    #[test]
    fn test_other_bits_have_no_effect() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_UP | BUTTON_DOWN);
        assert!(!armed.is_armed());

        armed.update(BUTTON_ARM);
        armed.update(BUTTON_UP);
        armed.update(BUTTON_DOWN | 0xF0); // Reserved bits too
        assert!(armed.is_armed());
    }

    #[test]
    fn test_re_press_after_release_retriggers() {
        let mut armed = ArmedState::new();
        armed.update(BUTTON_DISARM);
        armed.update(0);

        armed.update(BUTTON_ARM);
        assert!(armed.is_armed());
        armed.update(0);
        armed.update(BUTTON_DISARM);
        assert!(!armed.is_armed());
        armed.update(0);
        armed.update(BUTTON_ARM);
        assert!(armed.is_armed());
    }
}
