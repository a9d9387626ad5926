//! # Input Module
//!
//! Physical control input handling.
//!
//! This module handles:
//! - Reading raw 12-bit ADC channels (sticks and trim knobs)
//! - Reading active-low GPIO buttons
//! - Linear remapping onto the calibrated [1000, 2000] range with clamping
//! - Per-channel inversion (mirror around the range midpoint)
//! - Battery percentage estimation from a divider-tapped ADC channel
//!
//! ## Channel Assignments
//!
//! | ADC channel | Input | Packet field |
//! |-------------|-------------------|--------------|
//! | 0 | Left stick Y | throttle |
//! | 1 | Right stick X | roll |
//! | 2 | Right stick Y | pitch |
//! | 3 | Left stick X | yaw |
//! | 4 | Pitch trim knob | knob_pitch |
//! | 5 | Roll trim knob | knob_roll |
//! | 6 | Battery divider | (display only) |

pub mod source;
pub mod sampler;
pub mod battery;
pub mod mcp3208;
pub mod buttons;
