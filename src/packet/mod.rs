//! # Control Packet Module
//!
//! Fixed-layout binary encoding of control samples for radio transmission.
//!
//! This module handles:
//! - Wire format constants (13-byte packed little-endian layout)
//! - Control packet encoding (six `i16` channels + button bitmask)
//! - Control packet decoding for consumers and loopback tests
//!
//! The layout is stable across builds: consumers decode by fixed offset,
//! never by schema negotiation.

pub mod protocol;
pub mod encoder;
pub mod decoder;
