//! Wire-level failure definitions.

use lampack::Error as PackError;

/// Failures while encoding or decoding protocol messages.
///
/// These describe malformed or schema-incompatible data. They are distinct
/// from the remote function failing: a well-formed response whose `error`
/// field is set decodes successfully and is surfaced by the client as a
/// remote invocation error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The underlying lampack serialization failed.
    Pack(PackError),
    /// The top-level envelope variant was neither `call` nor `reply`.
    UnknownFrame(String),
    /// A required field was absent from a message.
    MissingField(&'static str),
    /// The message structure violated the protocol.
    Malformed(String),
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::Pack(e) => write!(f, "serialization error: {}", e),
            WireError::UnknownFrame(name) => write!(f, "unknown frame kind: {}", name),
            WireError::MissingField(field) => write!(f, "missing field: {}", field),
            WireError::Malformed(msg) => write!(f, "malformed message: {}", msg),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Pack(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PackError> for WireError {
    fn from(e: PackError) -> Self {
        WireError::Pack(e)
    }
}

/// A specialized `Result` for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
