//! Error types
//!
//! The command surface has a single failure kind, [`ParameterError`]. It is
//! always handled where it is detected: the handler turns it into a
//! parameter-error response and nothing is mutated.

use core::fmt;

/// A command argument was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// The value parsed, but is not one of the accepted encodings
    OutOfRange(u32),
    /// Wrong number of arguments, or an argument that is not a
    /// non-negative decimal integer
    Malformed,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(f, "value {value} out of range"),
            Self::Malformed => f.write_str("malformed argument"),
        }
    }
}

/// Error type for invalid operating mode values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidMode {
    /// The value does not correspond to a valid operating mode
    InvalidValue(u8),
}

/// Error type for invalid power state values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidPowerState {
    /// The value does not correspond to a valid power state
    InvalidValue(u8),
}
