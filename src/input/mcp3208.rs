//! # MCP3208 ADC Module
//!
//! Reads the 12-bit MCP3208 analog-to-digital converter over SPI.
//!
//! The sticks, trim knobs and battery divider all land on this one chip
//! (channels 0-7). Each read is a single three-byte SPI transfer: start bit,
//! single-ended mode and channel select out; 12 result bits back.

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::info;

use crate::config::InputConfig;
use crate::error::{GroundLinkError, Result};

use super::source::AnalogSource;

/// Number of channels on the MCP3208.
const MCP3208_CHANNELS: u8 = 8;

/// MCP3208 ADC handle over SPI
pub struct Mcp3208 {
    spi: Spi,
}

impl std::fmt::Debug for Mcp3208 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mcp3208").finish_non_exhaustive()
    }
}

impl Mcp3208 {
    /// Open the ADC on the configured SPI bus
    ///
    /// # Errors
    ///
    /// Returns [`GroundLinkError::Input`] if the SPI bus cannot be opened
    /// or the configured bus/slave-select is unsupported. This is a fatal
    /// bring-up failure; the loop is never entered without inputs.
    pub fn open(config: &InputConfig) -> Result<Self> {
        let bus = match config.spi_bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            other => {
                return Err(GroundLinkError::Input(format!(
                    "Unsupported SPI bus: {}",
                    other
                )))
            }
        };

        let slave = match config.spi_slave {
            0 => SlaveSelect::Ss0,
            1 => SlaveSelect::Ss1,
            2 => SlaveSelect::Ss2,
            other => {
                return Err(GroundLinkError::Input(format!(
                    "Unsupported SPI slave select: {}",
                    other
                )))
            }
        };

        let spi = Spi::new(bus, slave, config.spi_clock_hz, Mode::Mode0)
            .map_err(|e| GroundLinkError::Input(format!("Failed to open SPI: {}", e)))?;

        info!(
            "MCP3208 ADC initialized on SPI{}.{} at {} Hz",
            config.spi_bus, config.spi_slave, config.spi_clock_hz
        );

        Ok(Self { spi })
    }
}

impl AnalogSource for Mcp3208 {
    fn read(&mut self, channel: u8) -> Result<u16> {
        if channel >= MCP3208_CHANNELS {
            return Err(GroundLinkError::Input(format!(
                "ADC channel must be 0-7, got {}",
                channel
            )));
        }

        // Start bit + single-ended + 3-bit channel, MSB-aligned
        let tx_buffer = [
            0b0000_0110 | (channel >> 2),
            (channel & 0b11) << 6,
            0x00,
        ];
        let mut rx_buffer = [0u8; 3];

        self.spi
            .transfer(&mut rx_buffer, &tx_buffer)
            .map_err(|e| GroundLinkError::Input(format!("SPI transfer failed: {}", e)))?;

        let value = (((rx_buffer[1] & 0x0F) as u16) << 8) | rx_buffer[2] as u16;
        Ok(value)
    }
}
