//! Error types for tmc2209-uart.
//!
//! Caller mistakes (bad motor index, unknown or read-only parameter) and transient
//! bus faults (timeouts, damaged frames) are kept apart so a host can decide to
//! retry only the latter.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all tmc2209-uart operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// UART exchange or frame validation error
    Bus(BusError),
    /// Logical parameter access error
    Param(ParamError),
    /// Board pin operation error
    Pin(PinError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor count must be at least 1
    InvalidMotorCount(u8),
    /// Supply voltage bounds are inverted or equal (V/10)
    InvalidSupplyBounds {
        /// Lower bound
        min: u16,
        /// Upper bound
        max: u16,
    },
    /// Reply timeout must be non-zero
    InvalidTimeout(u32),
    /// CRC table slot does not exist
    InvalidCrcTable(u8),
    /// CRC polynomial must be non-zero
    InvalidPolynomial(u8),
    /// Channel name not found in configuration
    ChannelNotFound(heapless::String<32>),
    /// A required board component was not supplied to the builder
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Transient faults on the UART bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// No complete reply arrived within the timeout
    TimedOut,
    /// Reply checksum does not match the received bytes
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u8,
        /// Checksum byte carried by the frame
        received: u8,
    },
    /// First byte is not the sync byte
    InvalidSync(u8),
    /// Reply is not addressed to the master
    InvalidMasterAddress(u8),
    /// Reply echoes a different register than the one requested
    AddressMismatch {
        /// Register that was requested
        expected: u8,
        /// Register echoed by the reply
        received: u8,
    },
    /// Fewer bytes than a full reply
    ShortFrame(usize),
    /// Requested reply length does not fit the exchange buffer
    ReplyTooLong(usize),
}

/// Logical parameter access errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// Motor index is not below the configured motor count
    InvalidMotor(u8),
    /// Parameter or function type code is not known
    UnknownParameter(u8),
    /// Parameter does not support the requested direction (e.g. writing a read-only value)
    UnsupportedOperation,
}

/// Board pin errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The pin HAL reported a failure
    Io,
    /// The pin cannot be put into the requested state
    UnsupportedState,
}

impl Error {
    /// Whether the error is a bus fault worth retrying.
    ///
    /// Caller errors (bad motor, unknown parameter, bad configuration) are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Bus(e) if !matches!(e, BusError::ReplyTooLong(_)))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Bus(e) => write!(f, "Bus error: {}", e),
            Error::Param(e) => write!(f, "Parameter error: {}", e),
            Error::Pin(e) => write!(f, "Pin error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMotorCount(n) => {
                write!(f, "Invalid motor count: {}. Must be at least 1", n)
            }
            ConfigError::InvalidSupplyBounds { min, max } => {
                write!(f, "Invalid supply bounds: min ({}) must be < max ({})", min, max)
            }
            ConfigError::InvalidTimeout(ms) => write!(f, "Invalid reply timeout: {} ms. Must be > 0", ms),
            ConfigError::InvalidCrcTable(index) => write!(f, "CRC table slot {} does not exist", index),
            ConfigError::InvalidPolynomial(p) => write!(f, "Invalid CRC polynomial {:#04x}", p),
            ConfigError::ChannelNotFound(name) => write!(f, "Channel '{}' not found", name),
            ConfigError::MissingComponent(what) => write!(f, "{} is required", what),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::TimedOut => write!(f, "Timed out waiting for reply"),
            BusError::ChecksumMismatch { expected, received } => {
                write!(f, "Checksum mismatch: computed {:#04x}, frame carries {:#04x}", expected, received)
            }
            BusError::InvalidSync(b) => write!(f, "Invalid sync byte {:#04x}", b),
            BusError::InvalidMasterAddress(b) => write!(f, "Reply addressed to {:#04x}, not the master", b),
            BusError::AddressMismatch { expected, received } => {
                write!(f, "Reply for register {:#04x}, requested {:#04x}", received, expected)
            }
            BusError::ShortFrame(len) => write!(f, "Short frame of {} bytes", len),
            BusError::ReplyTooLong(len) => write!(f, "Reply of {} bytes exceeds the exchange buffer", len),
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::InvalidMotor(m) => write!(f, "Invalid motor index {}", m),
            ParamError::UnknownParameter(t) => write!(f, "Unknown parameter type {}", t),
            ParamError::UnsupportedOperation => write!(f, "Operation not supported by parameter"),
        }
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::Io => write!(f, "GPIO pin operation failed"),
            PinError::UnsupportedState => write!(f, "Pin state not supported"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<ParamError> for Error {
    fn from(e: ParamError) -> Self {
        Error::Param(e)
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Error::Pin(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for BusError {}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

#[cfg(feature = "std")]
impl std::error::Error for PinError {}
