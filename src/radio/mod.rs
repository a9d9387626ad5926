//! # Radio Module
//!
//! Serial LoRa modem handling.
//!
//! This module handles:
//! - Opening the modem's serial port (8N1, configured baud)
//! - Applying the link parameters once at startup (frequency, bandwidth,
//!   spreading factor, coding rate, output power)
//! - Fire-and-forget control packet writes
//!
//! The modem runs in transparent mode: after the one-shot parameter frame,
//! every byte written to the port goes over the air as-is. Channel access,
//! modulation and PHY framing live inside the modem and are out of scope
//! here.

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::AsyncWriteExt;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::{GroundLinkError, Result};

pub mod link_trait;

pub use link_trait::RadioLink;

/// Header byte of the modem's one-shot parameter frame.
const PARAMETER_FRAME_HEADER: u8 = 0xC0;

/// Serial LoRa modem handle
///
/// Manages the point-to-point downlink to the vehicle. Opening and
/// configuring happen once at startup; afterwards the modem only ever sees
/// raw control packets.
pub struct LoraRadio {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl std::fmt::Debug for LoraRadio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoraRadio")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl LoraRadio {
    /// Open the modem and apply the configured link parameters
    ///
    /// # Arguments
    ///
    /// * `config` - Link section of the configuration
    ///
    /// # Returns
    ///
    /// * `Result<LoraRadio>` - Configured modem or error
    ///
    /// # Errors
    ///
    /// Returns [`GroundLinkError::RadioNotFound`] if the port cannot be
    /// opened and [`GroundLinkError::Radio`] if the parameter frame cannot
    /// be written. Both are fatal bring-up failures.
    pub async fn open(config: &LinkConfig) -> Result<Self> {
        debug!("Opening LoRa modem at {}", config.port);

        let port = tokio_serial::new(&config.port, config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                GroundLinkError::RadioNotFound(format!("{} ({})", config.port, e))
            })?;

        let mut radio = Self {
            port,
            device_path: config.port.clone(),
        };

        radio.apply_link_parameters(config).await?;

        info!(
            "LoRa modem at {} configured: {:.1} MHz, BW {} kHz, SF{}, CR 4/{}, {} dBm",
            radio.device_path,
            config.frequency_mhz,
            config.bandwidth_khz,
            config.spreading_factor,
            config.coding_rate,
            config.power_dbm
        );

        Ok(radio)
    }

    /// Get the device path of the opened modem port
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Write the one-shot parameter frame.
    ///
    /// The link parameters never change at runtime; this is the only
    /// non-payload traffic the modem ever receives.
    async fn apply_link_parameters(&mut self, config: &LinkConfig) -> Result<()> {
        let frame = parameter_frame(config);

        self.port
            .write_all(&frame)
            .await
            .map_err(|e| GroundLinkError::Radio(format!("Failed to write parameters: {}", e)))?;
        self.port
            .flush()
            .await
            .map_err(|e| GroundLinkError::Radio(format!("Failed to flush parameters: {}", e)))?;

        Ok(())
    }
}

/// Build the modem parameter frame from the link configuration.
///
/// Layout: header, frequency in kHz (u32 LE), spreading factor, bandwidth
/// code (0=125, 1=250, 2=500 kHz), coding rate denominator, power in dBm.
fn parameter_frame(config: &LinkConfig) -> Bytes {
    let bandwidth_code: u8 = match config.bandwidth_khz {
        125 => 0,
        250 => 1,
        _ => 2,
    };

    let mut buf = BytesMut::with_capacity(9);
    buf.put_u8(PARAMETER_FRAME_HEADER);
    buf.put_u32_le((config.frequency_mhz * 1000.0).round() as u32);
    buf.put_u8(config.spreading_factor);
    buf.put_u8(bandwidth_code);
    buf.put_u8(config.coding_rate);
    buf.put_u8(config.power_dbm);
    buf.freeze()
}

#[async_trait]
impl RadioLink for LoraRadio {
    async fn send_packet(&mut self, packet: &[u8]) -> Result<()> {
        self.port
            .write_all(packet)
            .await
            .map_err(|e| GroundLinkError::Radio(format!("Failed to write packet: {}", e)))?;

        self.port
            .flush()
            .await
            .map_err(|e| GroundLinkError::Radio(format!("Failed to flush port: {}", e)))?;

        debug!("Sent control packet ({} bytes)", packet.len());
        Ok(())
    }
}
