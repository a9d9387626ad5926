//! # Scheduler Module
//!
//! The real-time cooperative scheduling core.
//!
//! This module handles:
//! - Fixed-cadence interval scheduling with reset-to-now semantics
//! - The advisory armed flag driven by button edges
//! - The main loop state tying sampling, transmission and display together
//!
//! Everything here is plain owned state with injected timestamps: no clock
//! reads, no hardware, no synchronization. One thread owns the whole loop,
//! so there is nothing to lock.

pub mod interval;
pub mod arming;
pub mod link_loop;

pub use arming::ArmedState;
pub use interval::IntervalScheduler;
pub use link_loop::LinkLoop;
