//! Error types for tmplwire core operations.

use thiserror::Error;

/// Core error type for wire encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer is too short for the requested operation.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// Variable field payload does not fit its length prefix.
    #[error("variable field overflow: {len} bytes exceed the {max} byte limit of a {width}-byte prefix")]
    VariableOverflow {
        /// Actual payload length.
        len: usize,
        /// Maximum payload length for the prefix width.
        max: usize,
        /// Prefix width in bytes.
        width: usize,
    },

    /// Variable field declared with a prefix width other than 1 or 2.
    #[error("invalid variable field width {width}, expected 1 or 2")]
    InvalidVariableWidth {
        /// Declared prefix width.
        width: usize,
    },

    /// Fixed field payload has the wrong length.
    #[error("fixed field length mismatch: expected {expected} bytes, actual {actual}")]
    FixedLengthMismatch {
        /// Declared byte length.
        expected: usize,
        /// Supplied byte length.
        actual: usize,
    },

    /// Block instance count does not match its declared arity.
    #[error("block '{block}' arity mismatch: expected {expected} instances, actual {actual}")]
    ArityMismatch {
        /// Block name.
        block: &'static str,
        /// Required or maximum instance count.
        expected: usize,
        /// Supplied instance count.
        actual: usize,
    },

    /// Command id in the buffer does not belong to the packet being decoded.
    #[error("command mismatch: expected {expected_frequency} {expected}, actual {actual_frequency} {actual}")]
    CommandMismatch {
        /// Expected frequency class name.
        expected_frequency: &'static str,
        /// Expected command id.
        expected: u16,
        /// Actual frequency class name.
        actual_frequency: &'static str,
        /// Actual command id.
        actual: u16,
    },

    /// No packet is registered for the command id.
    #[error("unknown command {frequency} {id}")]
    UnknownCommand {
        /// Frequency class name.
        frequency: &'static str,
        /// Command id.
        id: u16,
    },
}

impl Error {
    /// Creates a buffer-too-short error.
    #[must_use]
    pub const fn short(required: usize, available: usize) -> Self {
        Self::BufferTooShort {
            required,
            available,
        }
    }
}

/// Result type alias for tmplwire core operations.
pub type Result<T> = std::result::Result<T, Error>;
