//! # Ground Link Library
//!
//! Handheld ground-station controller for a LoRa-linked vehicle.
//!
//! This library provides the core functionality for sampling the handset's
//! sticks, knobs and buttons, calibrating them into link units, encoding
//! fixed-layout control packets and transmitting them over a serial LoRa
//! modem at a fixed cadence, with an OLED status screen refreshed on its
//! own slower cadence.

pub mod config;
pub mod error;
pub mod packet;
pub mod input;
pub mod scheduler;
pub mod radio;
pub mod display;
pub mod telemetry;
