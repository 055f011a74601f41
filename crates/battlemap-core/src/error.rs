//! Error handling for Battlemap
//!
//! Provides the error types for the drawing model and the document codec:
//! - Serialization errors (structural desync, primitive parsing, I/O)
//! - Shape errors (contract violations on shape operations)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Document codec error type
///
/// Any of these is fatal to the document being read: the loader discards the
/// partially built document instead of attempting recovery.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// A structural token was expected but something else was read
    #[error("Expected structural token '{expected}', found '{found}'")]
    StructuralSync {
        /// The structural token the reader required.
        expected: String,
        /// The token actually read (or `<end of stream>`).
        found: String,
    },

    /// A numeric or boolean token could not be parsed
    #[error("Could not parse '{token}' as {kind}")]
    PrimitiveParse {
        /// The primitive type that was requested.
        kind: &'static str,
        /// The offending token.
        token: String,
    },

    /// The stream ended while a value was still required
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// A shape record started with an unknown variant tag
    #[error("Unknown shape tag: {tag}")]
    UnknownShapeTag {
        /// The tag that was read.
        tag: String,
    },

    /// The document declares a version this reader does not understand
    #[error("Unsupported document version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// The version tag read from the stream.
        found: i64,
        /// The newest version this build can read.
        supported: i64,
    },

    /// A string value cannot be represented in the line-oriented format
    #[error("String cannot be written as a single token: {value:?}")]
    UnrepresentableString {
        /// The rejected value.
        value: String,
    },

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SerializationError {
    /// Builds a structural desync error from an optional token.
    pub fn structural(expected: &str, found: Option<&str>) -> Self {
        Self::StructuralSync {
            expected: expected.to_string(),
            found: found.unwrap_or("<end of stream>").to_string(),
        }
    }
}

/// Shape error type
///
/// Represents misuse of the shape API. A contract violation aborts the
/// requested operation and leaves the shape untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The operation is not defined for this shape variant
    #[error("Contract violation: {operation} is not supported by {variant} shapes")]
    ContractViolation {
        /// The operation that was attempted.
        operation: &'static str,
        /// The variant it was attempted on.
        variant: &'static str,
    },

    /// The string cannot be stored as a single token of a map file
    #[error("Invalid {field}: {value:?} is blank or spans more than one line")]
    UnrepresentableString {
        /// What the string was meant to be, e.g. "text" or "token id".
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The handle does not refer to a member of the collection
    #[error("Shape {id} is not in this collection")]
    NotFound {
        /// The stale handle, rendered for display.
        id: String,
    },
}

/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Document codec error
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Shape API error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Check if this is a document codec error
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialization(_))
    }

    /// Check if this is a contract violation
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::Shape(ShapeError::ContractViolation { .. }))
    }
}

/// Result type alias using the unified error type
pub type Result<T> = std::result::Result<T, Error>;
