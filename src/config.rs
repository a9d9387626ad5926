//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field has a documented default, so a missing file or an
//! empty TOML document yields a usable configuration. The scheduling
//! thresholds (20 ms transmit, 100 ms display) live here rather than as code
//! literals so the scheduler logic is tested independently of the cadence.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub battery: BatteryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// LoRa link configuration, applied once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Serial port of the LoRa modem.
    #[serde(default = "default_link_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Center frequency in MHz.
    #[serde(default = "default_frequency_mhz")]
    pub frequency_mhz: f64,

    /// Channel bandwidth in kHz (125, 250 or 500).
    #[serde(default = "default_bandwidth_khz")]
    pub bandwidth_khz: u32,

    /// LoRa spreading factor (7-12).
    #[serde(default = "default_spreading_factor")]
    pub spreading_factor: u8,

    /// Coding rate denominator (5-8, meaning 4/5 through 4/8).
    #[serde(default = "default_coding_rate")]
    pub coding_rate: u8,

    /// Transmit output power in dBm.
    #[serde(default = "default_power_dbm")]
    pub power_dbm: u8,
}

/// Scheduler cadence configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Minimum elapsed time between control packet transmissions (50 Hz).
    #[serde(default = "default_transmit_interval_ms")]
    pub transmit_interval_ms: u64,

    /// Minimum elapsed time between status display refreshes (10 Hz).
    /// Must be strictly greater than the transmit interval.
    #[serde(default = "default_display_interval_ms")]
    pub display_interval_ms: u64,

    /// Cooperative loop iteration tick; bounds scheduler jitter.
    #[serde(default = "default_loop_tick_ms")]
    pub loop_tick_ms: u64,
}

/// Input sampling configuration (ADC and buttons)
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// SPI bus of the MCP3208 ADC.
    #[serde(default)]
    pub spi_bus: u8,

    /// SPI slave-select line of the ADC.
    #[serde(default)]
    pub spi_slave: u8,

    #[serde(default = "default_spi_clock_hz")]
    pub spi_clock_hz: u32,

    /// Analog channel indices (0-5) whose output is mirrored around the
    /// range midpoint.
    #[serde(default)]
    pub inverted_channels: Vec<usize>,

    /// BCM pin of the active-low "up" button.
    #[serde(default = "default_pin_up")]
    pub pin_up: u8,

    /// BCM pin of the active-low "down" button.
    #[serde(default = "default_pin_down")]
    pub pin_down: u8,

    /// BCM pin of the active-low "arm" button.
    #[serde(default = "default_pin_arm")]
    pub pin_arm: u8,

    /// BCM pin of the active-low "disarm" button.
    #[serde(default = "default_pin_disarm")]
    pub pin_disarm: u8,
}

/// Battery estimate configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BatteryConfig {
    /// ADC channel the divider tap is wired to.
    #[serde(default = "default_battery_channel")]
    pub adc_channel: u8,

    /// Voltage divider ratio between pack voltage and the ADC pin.
    #[serde(default = "default_divider_ratio")]
    pub divider_ratio: f32,

    /// ADC reference voltage.
    #[serde(default = "default_vref")]
    pub vref: f32,

    /// Pack voltage reported as 0%.
    #[serde(default = "default_empty_voltage")]
    pub empty_voltage: f32,

    /// Pack voltage reported as 100%.
    #[serde(default = "default_full_voltage")]
    pub full_voltage: f32,
}

/// Display panel configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// I2C bus of the SSD1306 panel.
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,

    /// I2C address of the panel (0x3C = 60).
    #[serde(default = "default_i2c_address")]
    pub i2c_address: u16,
}

/// Telemetry session-log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_telemetry_dir")]
    pub dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,
}

/// Application log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// When true, a daily-rolling log file is written alongside stderr.
    #[serde(default)]
    pub file_enabled: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

// Default value functions
fn default_link_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 57600 }
fn default_frequency_mhz() -> f64 { 915.0 }
fn default_bandwidth_khz() -> u32 { 125 }
fn default_spreading_factor() -> u8 { 7 }
fn default_coding_rate() -> u8 { 5 }
fn default_power_dbm() -> u8 { 17 }

fn default_transmit_interval_ms() -> u64 { 20 }
fn default_display_interval_ms() -> u64 { 100 }
fn default_loop_tick_ms() -> u64 { 2 }

fn default_spi_clock_hz() -> u32 { 1_000_000 }
fn default_pin_up() -> u8 { 5 }
fn default_pin_down() -> u8 { 6 }
fn default_pin_arm() -> u8 { 13 }
fn default_pin_disarm() -> u8 { 19 }

fn default_battery_channel() -> u8 { 6 }
fn default_divider_ratio() -> f32 { 2.0 }
fn default_vref() -> f32 { 3.3 }
fn default_empty_voltage() -> f32 { 3.3 }
fn default_full_voltage() -> f32 { 4.2 }

fn default_i2c_bus() -> u8 { 1 }
fn default_i2c_address() -> u16 { 0x3C }

fn default_telemetry_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }

fn default_log_dir() -> String { "./logs".to_string() }

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: default_link_port(),
            baud_rate: default_baud_rate(),
            frequency_mhz: default_frequency_mhz(),
            bandwidth_khz: default_bandwidth_khz(),
            spreading_factor: default_spreading_factor(),
            coding_rate: default_coding_rate(),
            power_dbm: default_power_dbm(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transmit_interval_ms: default_transmit_interval_ms(),
            display_interval_ms: default_display_interval_ms(),
            loop_tick_ms: default_loop_tick_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            spi_bus: 0,
            spi_slave: 0,
            spi_clock_hz: default_spi_clock_hz(),
            inverted_channels: Vec::new(),
            pin_up: default_pin_up(),
            pin_down: default_pin_down(),
            pin_arm: default_pin_arm(),
            pin_disarm: default_pin_disarm(),
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            adc_channel: default_battery_channel(),
            divider_ratio: default_divider_ratio(),
            vref: default_vref(),
            empty_voltage: default_empty_voltage(),
            full_voltage: default_full_voltage(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            i2c_address: default_i2c_address(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_telemetry_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            dir: default_log_dir(),
        }
    }
}

fn config_error(message: impl std::fmt::Display) -> crate::error::GroundLinkError {
    crate::error::GroundLinkError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to built-in
    /// defaults when the file does not exist.
    ///
    /// A present-but-invalid file is still an error: silently ignoring a
    /// broken configuration would mask an operator mistake.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.link.port.is_empty() {
            return Err(config_error("link port cannot be empty"));
        }

        if ![9600, 19200, 57600, 115200, 230400, 460800].contains(&self.link.baud_rate) {
            return Err(config_error(
                "baud_rate must be one of: 9600, 19200, 57600, 115200, 230400, 460800",
            ));
        }

        if !(137.0..=1020.0).contains(&self.link.frequency_mhz) {
            return Err(config_error("frequency_mhz must be between 137 and 1020"));
        }

        if ![125, 250, 500].contains(&self.link.bandwidth_khz) {
            return Err(config_error("bandwidth_khz must be one of: 125, 250, 500"));
        }

        if !(7..=12).contains(&self.link.spreading_factor) {
            return Err(config_error("spreading_factor must be between 7 and 12"));
        }

        if !(5..=8).contains(&self.link.coding_rate) {
            return Err(config_error("coding_rate must be between 5 (4/5) and 8 (4/8)"));
        }

        if !(2..=20).contains(&self.link.power_dbm) {
            return Err(config_error("power_dbm must be between 2 and 20"));
        }

        if self.timing.transmit_interval_ms == 0 || self.timing.transmit_interval_ms > 1000 {
            return Err(config_error("transmit_interval_ms must be between 1 and 1000"));
        }

        if self.timing.display_interval_ms <= self.timing.transmit_interval_ms {
            return Err(config_error(
                "display_interval_ms must be strictly greater than transmit_interval_ms",
            ));
        }

        if self.timing.display_interval_ms > 10000 {
            return Err(config_error("display_interval_ms must be at most 10000"));
        }

        if self.timing.loop_tick_ms == 0 || self.timing.loop_tick_ms > self.timing.transmit_interval_ms {
            return Err(config_error(
                "loop_tick_ms must be between 1 and transmit_interval_ms",
            ));
        }

        if self.input.spi_bus > 1 {
            return Err(config_error("spi_bus must be 0 or 1"));
        }

        if self.input.spi_slave > 2 {
            return Err(config_error("spi_slave must be 0, 1 or 2"));
        }

        if !(10_000..=10_000_000).contains(&self.input.spi_clock_hz) {
            return Err(config_error("spi_clock_hz must be between 10 kHz and 10 MHz"));
        }

        for &channel in &self.input.inverted_channels {
            if channel >= crate::packet::protocol::NUM_ANALOG_CHANNELS {
                return Err(config_error(format!(
                    "inverted_channels index {} is out of bounds (must be 0-5)",
                    channel
                )));
            }
        }

        for (name, pin) in [
            ("pin_up", self.input.pin_up),
            ("pin_down", self.input.pin_down),
            ("pin_arm", self.input.pin_arm),
            ("pin_disarm", self.input.pin_disarm),
        ] {
            if pin > 27 {
                return Err(config_error(format!("{} must be a BCM pin 0-27", name)));
            }
        }

        if self.battery.adc_channel > 7 {
            return Err(config_error("battery adc_channel must be 0-7"));
        }

        if self.battery.divider_ratio < 1.0 {
            return Err(config_error("divider_ratio must be at least 1.0"));
        }

        if self.battery.vref <= 0.0 {
            return Err(config_error("vref must be positive"));
        }

        if self.battery.empty_voltage >= self.battery.full_voltage {
            return Err(config_error("empty_voltage must be less than full_voltage"));
        }

        if self.display.i2c_bus > 1 {
            return Err(config_error("i2c_bus must be 0 or 1"));
        }

        if !(0x08..=0x77).contains(&self.display.i2c_address) {
            return Err(config_error("i2c_address must be a 7-bit address (0x08-0x77)"));
        }

        if self.telemetry.enabled && self.telemetry.dir.is_empty() {
            return Err(config_error("telemetry dir cannot be empty when enabled"));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(config_error("max_records_per_file must be greater than 0"));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(config_error("max_files_to_keep must be greater than 0"));
        }

        if self.log.file_enabled && self.log.dir.is_empty() {
            return Err(config_error("log dir cannot be empty when file_enabled"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_cadences() {
        let config = Config::default();
        assert_eq!(config.timing.transmit_interval_ms, 20); // 50 Hz
        assert_eq!(config.timing.display_interval_ms, 100); // 10 Hz
        assert!(config.timing.display_interval_ms > config.timing.transmit_interval_ms);
    }

    #[test]
    fn test_empty_toml_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.link.port, "/dev/ttyUSB0");
        assert_eq!(config.battery.adc_channel, 6);
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[link]
port = "/dev/ttyAMA0"
spreading_factor = 9

[timing]
transmit_interval_ms = 25

[input]
inverted_channels = [2, 3]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.link.port, "/dev/ttyAMA0");
        assert_eq!(config.link.spreading_factor, 9);
        assert_eq!(config.timing.transmit_interval_ms, 25);
        assert_eq!(config.input.inverted_channels, vec![2, 3]);
        // Untouched sections keep their defaults
        assert_eq!(config.timing.display_interval_ms, 100);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = Config::load_or_default(&missing).unwrap();
        assert_eq!(config.timing.transmit_interval_ms, 20);
    }

    #[test]
    fn test_load_or_default_rejects_broken_file() {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(b"not valid toml [").unwrap();
        temp_file.flush().unwrap();
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_empty_link_port() {
        let mut config = Config::default();
        config.link.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = Config::default();
        config.link.baud_rate = 420000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frequency_out_of_range() {
        let mut config = Config::default();
        config.link.frequency_mhz = 2400.0;
        assert!(config.validate().is_err());

        config.link.frequency_mhz = 100.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bandwidth() {
        let mut config = Config::default();
        config.link.bandwidth_khz = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spreading_factor_bounds() {
        let mut config = Config::default();
        config.link.spreading_factor = 6;
        assert!(config.validate().is_err());

        config.link.spreading_factor = 13;
        assert!(config.validate().is_err());

        for sf in 7..=12 {
            config.link.spreading_factor = sf;
            assert!(config.validate().is_ok(), "SF{} should be valid", sf);
        }
    }

    #[test]
    fn test_coding_rate_bounds() {
        let mut config = Config::default();
        config.link.coding_rate = 4;
        assert!(config.validate().is_err());

        config.link.coding_rate = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_power_bounds() {
        let mut config = Config::default();
        config.link.power_dbm = 1;
        assert!(config.validate().is_err());

        config.link.power_dbm = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transmit_interval_zero() {
        let mut config = Config::default();
        config.timing.transmit_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_interval_not_greater_than_transmit() {
        let mut config = Config::default();
        config.timing.display_interval_ms = config.timing.transmit_interval_ms;
        assert!(config.validate().is_err());

        config.timing.display_interval_ms = config.timing.transmit_interval_ms - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loop_tick_bounds() {
        let mut config = Config::default();
        config.timing.loop_tick_ms = 0;
        assert!(config.validate().is_err());

        config.timing.loop_tick_ms = config.timing.transmit_interval_ms + 1;
        assert!(config.validate().is_err());

        config.timing.loop_tick_ms = config.timing.transmit_interval_ms;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_channel_out_of_bounds() {
        let mut config = Config::default();
        config.input.inverted_channels = vec![0, 6];
        assert!(config.validate().is_err());

        config.input.inverted_channels = vec![0, 1, 2, 3, 4, 5];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_button_pin_out_of_bounds() {
        let mut config = Config::default();
        config.input.pin_arm = 28;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_battery_channel_bounds() {
        let mut config = Config::default();
        config.battery.adc_channel = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_battery_divider_bounds() {
        let mut config = Config::default();
        config.battery.divider_ratio = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_battery_voltage_window() {
        let mut config = Config::default();
        config.battery.empty_voltage = 4.2;
        config.battery.full_voltage = 4.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_i2c_address_bounds() {
        let mut config = Config::default();
        config.display.i2c_address = 0x80;
        assert!(config.validate().is_err());

        config.display.i2c_address = 0x3C;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_dir_required_when_enabled() {
        let mut config = Config::default();
        config.telemetry.enabled = true;
        config.telemetry.dir = String::new();
        assert!(config.validate().is_err());

        config.telemetry.dir = "./logs".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_file_limits() {
        let mut config = Config::default();
        config.telemetry.max_records_per_file = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.telemetry.max_files_to_keep = 0;
        assert!(config.validate().is_err());
    }
}
