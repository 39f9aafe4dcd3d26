//! The invocation call itself.

use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::time::Duration;
use std::time::SystemTime;

use tracing::debug;

use lamrpc::BodyCodec;
use lamrpc::FIRST_SEQ;
use lamrpc::Frame;
use lamrpc::INVOKE_METHOD;
use lamrpc::InvokeRequest;
use lamrpc::PackCodec;
use lamrpc::WireError;

use crate::deadline;
use crate::error::InvokeError;
use crate::transport;
use crate::transport::FrameError;

/// Deadline applied when the caller does not specify one.
pub const DEFAULT_DEADLINE_SECONDS: i64 = 15;

/// Invokes the function at `addr` with `payload`, blocking until the
/// reply arrives or the connection fails.
///
/// Equivalent to [`Invoker::new`] with default settings: no socket
/// timeouts, the standard body codec. Returns the output bytes on
/// success; see [`InvokeError`] for the failure taxonomy.
pub fn invoke(addr: &str, payload: &[u8], deadline_seconds: i64) -> Result<Vec<u8>, InvokeError> {
    Invoker::new().invoke(addr, payload, deadline_seconds)
}

/// A configured invocation entry point.
///
/// Opens exactly one TCP connection per [`Invoker::invoke`] call and
/// closes it before returning, on success and failure alike. Holds no
/// state across calls.
///
/// The socket timeouts are an enhancement over the reference client,
/// which blocks indefinitely; both default to off, and the advisory
/// deadline in the request is unaffected by them.
pub struct Invoker<C: BodyCodec = PackCodec> {
    codec: C,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl Invoker<PackCodec> {
    /// An invoker with the standard body codec and no timeouts.
    pub fn new() -> Self {
        Self::with_codec(PackCodec)
    }
}

impl Default for Invoker<PackCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BodyCodec> Invoker<C> {
    /// An invoker speaking an alternative body encoding.
    pub fn with_codec(codec: C) -> Self {
        Self { codec, connect_timeout: None, read_timeout: None }
    }

    /// Bounds the TCP connect. Off by default.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bounds each blocking read while waiting for the reply. Off by
    /// default, in which case an unresponsive emulator blocks the call
    /// indefinitely.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Performs one complete invocation: connect, send the call, block
    /// for the matching reply, interpret it.
    pub fn invoke(
        &self,
        addr: &str,
        payload: &[u8],
        deadline_seconds: i64,
    ) -> Result<Vec<u8>, InvokeError> {
        let request = InvokeRequest {
            payload: payload.to_vec(),
            deadline: deadline::compute(SystemTime::now(), deadline_seconds),
        };

        let mut stream = self.connect(addr)?;
        debug!(addr, payload_len = payload.len(), "connected to emulator");

        let body = self.codec.encode_request(&request)?;
        let call = lamrpc::encode_call(FIRST_SEQ, INVOKE_METHOD, &body)?;
        transport::write_frame(&mut stream, &call)?;
        debug!(frame_len = call.len(), method = INVOKE_METHOD, "call sent");

        let reply = match transport::read_frame(&mut stream) {
            Ok(frame) => frame,
            Err(FrameError::Io(e)) => return Err(InvokeError::Connection(e)),
            Err(e @ (FrameError::InvalidHeader(_) | FrameError::TooLarge(_))) => {
                return Err(InvokeError::Decode(WireError::Malformed(e.to_string())));
            }
        };
        debug!(frame_len = reply.len(), "reply received");

        self.interpret(&reply)
        // `stream` drops here, closing the connection on every path.
    }

    /// Decodes a reply frame and applies the response semantics: a
    /// present `error` wins over any payload bytes.
    fn interpret(&self, frame: &[u8]) -> Result<Vec<u8>, InvokeError> {
        let reply = match lamrpc::decode_frame(frame)? {
            Frame::Reply(reply) => reply,
            Frame::Call(_) => {
                return Err(InvokeError::Decode(WireError::Malformed(
                    "peer sent a call frame instead of a reply".into(),
                )));
            }
        };

        if reply.seq != FIRST_SEQ {
            return Err(InvokeError::Decode(WireError::Malformed(format!(
                "sequence mismatch: expected {}, received {}",
                FIRST_SEQ, reply.seq
            ))));
        }

        let response = self.codec.decode_response(reply.body)?;
        match response.error {
            Some(remote) => {
                debug!(error_type = %remote.error_type, "remote invocation failed");
                Err(InvokeError::Remote(remote))
            }
            None => Ok(response.payload),
        }
    }

    fn connect(&self, addr: &str) -> Result<TcpStream, InvokeError> {
        let stream = match self.connect_timeout {
            None => TcpStream::connect(addr)?,
            Some(timeout) => {
                // connect_timeout wants resolved addresses; try each in turn.
                let mut last_err = None;
                let mut connected = None;
                for resolved in addr.to_socket_addrs()? {
                    match TcpStream::connect_timeout(&resolved, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(e) => last_err = Some(e),
                    }
                }
                match connected {
                    Some(stream) => stream,
                    None => {
                        return Err(InvokeError::Connection(last_err.unwrap_or_else(|| {
                            std::io::Error::new(
                                std::io::ErrorKind::InvalidInput,
                                format!("address resolved to nothing: {}", addr),
                            )
                        })));
                    }
                }
            }
        };
        stream.set_read_timeout(self.read_timeout)?;
        Ok(stream)
    }
}
