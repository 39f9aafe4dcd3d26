//! The client-side failure taxonomy.

use lamrpc::InvocationError;
use lamrpc::WireError;

/// Everything that can go wrong during one invocation.
///
/// The three kinds are deliberately distinct so callers can tell "we
/// never got a response" from "the protocol broke" from "the function ran
/// and reported an error". None of them is retried.
#[derive(Debug)]
pub enum InvokeError {
    /// The socket could not be reached or died mid-exchange: refused
    /// connection, failed write, or a peer that closed before a full
    /// reply frame arrived.
    Connection(std::io::Error),
    /// The exchange completed but the bytes did not match the protocol:
    /// malformed envelope, truncated body, wrong frame kind, or a
    /// sequence number that does not echo ours. Signals a protocol or
    /// version mismatch with the emulator, not a function failure.
    Decode(WireError),
    /// A well-formed reply whose `error` field was set: the remote
    /// function itself failed. Relayed verbatim.
    Remote(InvocationError),
}

impl std::fmt::Display for InvokeError {
    // The "lambda returned error" prefix distinguishes a remote function
    // failure from a bare transport or protocol message.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvokeError::Connection(e) => write!(f, "connection error: {}", e),
            InvokeError::Decode(e) => write!(f, "decode error: {}", e),
            InvokeError::Remote(e) => write!(f, "lambda returned error:\n{}", e.message),
        }
    }
}

impl std::error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokeError::Connection(e) => Some(e),
            InvokeError::Decode(e) => Some(e),
            InvokeError::Remote(_) => None,
        }
    }
}

impl From<std::io::Error> for InvokeError {
    fn from(e: std::io::Error) -> Self {
        InvokeError::Connection(e)
    }
}

impl From<WireError> for InvokeError {
    fn from(e: WireError) -> Self {
        InvokeError::Decode(e)
    }
}
