//! Error types for template parsing and schema queries.

use thiserror::Error;

/// Error type for template parsing operations.
///
/// Every variant raised while reading template text carries the 1-based
/// line number and the raw line so a broken template can be fixed by hand.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structurally malformed template line.
    #[error("line {line}: {reason}: '{text}'")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Raw line text.
        text: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Field type name not present in the registry.
    #[error("line {line}: unknown field type '{type_name}': '{text}'")]
    UnknownFieldType {
        /// 1-based line number.
        line: usize,
        /// Raw line text.
        text: String,
        /// Unresolved type name.
        type_name: String,
    },

    /// Block arity keyword other than Single, Multiple or Variable.
    #[error("line {line}: unknown block arity '{arity}': '{text}'")]
    UnknownBlockArity {
        /// 1-based line number.
        line: usize,
        /// Raw line text.
        text: String,
        /// Unrecognized keyword.
        arity: String,
    },

    /// Packet frequency keyword other than Fixed, Low, Medium or High.
    #[error("line {line}: unknown packet frequency '{frequency}': '{text}'")]
    UnknownFrequency {
        /// 1-based line number.
        line: usize,
        /// Raw line text.
        text: String,
        /// Unrecognized keyword.
        frequency: String,
    },

    /// IO error while reading a template file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template bytes are not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ParseError {
    /// Creates a malformed line error.
    pub fn malformed(line: usize, text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Returns the 1-based line number, if the error refers to a line.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. }
            | Self::UnknownFieldType { line, .. }
            | Self::UnknownBlockArity { line, .. }
            | Self::UnknownFrequency { line, .. } => Some(*line),
            Self::Io(_) | Self::Utf8(_) => None,
        }
    }
}

/// Error type for schema queries and validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Wire-level error while reading a raw buffer.
    #[error("wire error: {0}")]
    Core(#[from] tmplwire_core::Error),

    /// Keyword index outside the keyword table.
    #[error("no keyword with index {index}")]
    KeywordNotFound {
        /// Requested index.
        index: usize,
    },

    /// Packet lookup failed.
    #[error("packet '{name}' not found")]
    PacketNotFound {
        /// Packet name or command description.
        name: String,
    },

    /// Block keyword not present in the packet.
    #[error("block {block} not found in packet '{packet}'")]
    BlockNotFound {
        /// Packet name.
        packet: String,
        /// Block keyword index.
        block: usize,
    },

    /// Block or field keyword not present in the packet.
    #[error("field {field} of block {block} not found in packet '{packet}'")]
    FieldNotFound {
        /// Packet name.
        packet: String,
        /// Block keyword index.
        block: usize,
        /// Field keyword index.
        field: usize,
    },

    /// Variable field declared with a prefix width other than 1 or 2.
    #[error("invalid variable field width {width}")]
    InvalidVariableWidth {
        /// Declared prefix width.
        width: usize,
    },

    /// Variable field size requested without a live buffer.
    #[error("variable field size requires a buffer")]
    BufferRequired,

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
