//! Error types for the dualstep library.
//!
//! Provides unified error handling across axis control, protocol framing,
//! and configuration loading.

use core::fmt;

use crate::engine::Axis;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all dualstep operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Axis validation or pin fault
    Axis(AxisError),
    /// Protocol framing error
    Frame(FrameError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Axis-level validation and hardware errors.
///
/// Every variant except [`AxisError::Pin`] is a validation failure: the
/// request was rejected and no state was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// Axis number outside {1, 2}
    InvalidAxis(u8),
    /// Axis-set bitfield with bits outside the valid set
    InvalidAxisSet(u8),
    /// Axis is running; configuration is locked out
    Busy(Axis),
    /// Microstep mode byte with no matching mode
    InvalidMicrosteps(u8),
    /// Direction byte other than 0x00/0x01
    InvalidDirection(u8),
    /// Enable byte other than 0x00/0x01
    InvalidEnable(u8),
    /// Drive-current value above the DAC ceiling
    CurrentOutOfRange(u16),
    /// Step delay of zero or the reserved sentinel value
    InvalidStepDelay(u16),
    /// GPIO pin operation failed
    Pin,
}

/// Protocol framing errors.
///
/// A framing error silently drops the partial frame; no response is sent
/// because the byte stream cannot be trusted until the next start token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte at the start-token position was not the start token
    BadStartToken(u8),
    /// Opcode byte with no table entry
    UnknownOpcode(u8),
    /// Byte at an end-token position did not match
    BadEndToken {
        /// The token that was expected at this position
        expected: u8,
        /// The byte actually received
        found: u8,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep divisor (must be 1, 2, 4, or 16)
    InvalidMicrostepDivisor(u16),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Axis(e) => write!(f, "Axis error: {}", e),
            Error::Frame(e) => write!(f, "Framing error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for AxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisError::InvalidAxis(n) => write!(f, "Invalid axis number: {}. Valid axes: 1, 2", n),
            AxisError::InvalidAxisSet(bits) => {
                write!(f, "Invalid axis bitfield: {:#04x}. Valid bits: 0x01, 0x02", bits)
            }
            AxisError::Busy(axis) => write!(f, "Axis {} is running", axis.number()),
            AxisError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microstep mode: {}. Valid modes: 0-3", v)
            }
            AxisError::InvalidDirection(v) => {
                write!(f, "Invalid direction: {}. Must be 0x00 or 0x01", v)
            }
            AxisError::InvalidEnable(v) => {
                write!(f, "Invalid enable value: {}. Must be 0x00 or 0x01", v)
            }
            AxisError::CurrentOutOfRange(v) => {
                write!(f, "Current value {} exceeds maximum {}", v, crate::engine::CURRENT_MAX)
            }
            AxisError::InvalidStepDelay(v) => {
                write!(f, "Invalid step delay: {}. Must be in 1..=65534", v)
            }
            AxisError::Pin => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::BadStartToken(b) => write!(f, "Expected start token, got {:#04x}", b),
            FrameError::UnknownOpcode(b) => write!(f, "Unknown opcode: {:#04x}", b),
            FrameError::BadEndToken { expected, found } => {
                write!(f, "Expected end token {:#04x}, got {:#04x}", expected, found)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrostepDivisor(v) => {
                write!(f, "Invalid microstep divisor: {}. Valid values: 1, 2, 4, 16", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<AxisError> for Error {
    fn from(e: AxisError) -> Self {
        Error::Axis(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for AxisError {}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
