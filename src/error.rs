//! # Error Types
//!
//! Custom error types for Ground Link using `thiserror`.

use thiserror::Error;

/// Main error type for Ground Link
#[derive(Debug, Error)]
pub enum GroundLinkError {
    /// Control packet layout errors
    #[error("Control packet error: {0}")]
    Packet(String),

    /// Radio modem errors (open, configure, write)
    #[error("Radio error: {0}")]
    Radio(String),

    /// Radio modem not found at the configured serial port
    #[error("Radio modem not found at: {0}")]
    RadioNotFound(String),

    /// Display panel errors
    #[error("Display error: {0}")]
    Display(String),

    /// Input collaborator errors (ADC, buttons)
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Ground Link
pub type Result<T> = std::result::Result<T, GroundLinkError>;
