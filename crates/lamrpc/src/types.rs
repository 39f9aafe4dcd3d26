//! Message bodies exchanged with the runtime emulator.

/// An absolute wall-clock instant handed to the remote side.
///
/// The deadline is advisory metadata: the client never cancels a call
/// based on it, the emulator is expected to honor it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    /// Seconds since the UNIX epoch.
    pub seconds: i64,
    /// Nanosecond component within the second.
    pub nanos: i64,
}

/// One invocation request. Built fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    /// Opaque input bytes, typically JSON text. Never interpreted here.
    pub payload: Vec<u8>,
    /// When the remote side should consider the invocation expired.
    pub deadline: Deadline,
}

/// A structured failure produced by the remote function.
///
/// The client only relays these; it never constructs one itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationError {
    /// Short classification supplied by the remote side, e.g. "Unhandled".
    pub error_type: String,
    /// Human-readable description.
    pub message: String,
    /// Optional remote stack trace, retained for diagnostics.
    pub stack_trace: Vec<String>,
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.error_type.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.error_type, self.message)
        }
    }
}

/// One invocation response.
///
/// Both fields exist on the wire simultaneously; a present `error` is
/// authoritative regardless of `payload` contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvokeResponse {
    /// Output bytes. Empty when the invocation failed.
    pub payload: Vec<u8>,
    /// Set when the remote function itself failed.
    pub error: Option<InvocationError>,
}

impl InvokeResponse {
    /// A successful response carrying `payload`.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self { payload: payload.into(), error: None }
    }

    /// A failed response carrying `error`.
    pub fn failure(error: InvocationError) -> Self {
        Self { payload: Vec::new(), error: Some(error) }
    }
}
