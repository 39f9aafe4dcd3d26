//! Body serialization behind a pluggable codec seam.
//!
//! The envelope carries bodies as opaque blobs, so the body encoding can
//! be swapped without touching the framing. [`PackCodec`] is the default
//! and the one the reference emulator speaks.

use lampack::Decoder;
use lampack::Encoder;

use crate::error::Result;
use crate::error::WireError;
use crate::types::Deadline;
use crate::types::InvocationError;
use crate::types::InvokeRequest;
use crate::types::InvokeResponse;

/// Serializes invocation bodies to and from envelope blobs.
///
/// Both directions of both message kinds live here because the protocol
/// is shared: the client uses the request-out/response-in half, a server
/// (or the test peer) uses the other.
pub trait BodyCodec {
    fn encode_request(&self, req: &InvokeRequest) -> Result<Vec<u8>>;
    fn decode_request(&self, bytes: &[u8]) -> Result<InvokeRequest>;
    fn encode_response(&self, resp: &InvokeResponse) -> Result<Vec<u8>>;
    fn decode_response(&self, bytes: &[u8]) -> Result<InvokeResponse>;
}

/// The default lampack body encoding.
///
/// Wire shape:
///
/// - Request: `Map { "payload": Bytes, "deadline": Map { "seconds": S64, "nanos": S64 } }`
/// - Response: `Map { "payload": Bytes, "error": None | Some(Map { "error_type": Str, "message": Str, "stack_trace": List[Str] }) }`
#[derive(Debug, Clone, Copy, Default)]
pub struct PackCodec;

impl BodyCodec for PackCodec {
    fn encode_request(&self, req: &InvokeRequest) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.map_begin()?;

        enc.variant_begin("payload")?;
        enc.bytes(&req.payload)?;
        enc.variant_end()?;

        enc.variant_begin("deadline")?;
        enc.map_begin()?;
        enc.variant_begin("seconds")?;
        enc.s64(req.deadline.seconds)?;
        enc.variant_end()?;
        enc.variant_begin("nanos")?;
        enc.s64(req.deadline.nanos)?;
        enc.variant_end()?;
        enc.map_end()?;
        enc.variant_end()?;

        enc.map_end()?;
        Ok(enc.into_bytes()?)
    }

    fn decode_request(&self, bytes: &[u8]) -> Result<InvokeRequest> {
        let mut dec = Decoder::new(bytes);
        let mut map = dec.map()?;
        let mut payload = None;
        let mut deadline = None;

        while let Some((key, mut val)) = map.next()? {
            match key {
                "payload" => payload = Some(val.bytes()?.to_vec()),
                "deadline" => deadline = Some(decode_deadline(&mut val)?),
                _ => {}
            }
        }

        Ok(InvokeRequest {
            payload: payload.ok_or(WireError::MissingField("payload"))?,
            deadline: deadline.ok_or(WireError::MissingField("deadline"))?,
        })
    }

    fn encode_response(&self, resp: &InvokeResponse) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.map_begin()?;

        enc.variant_begin("payload")?;
        enc.bytes(&resp.payload)?;
        enc.variant_end()?;

        enc.variant_begin("error")?;
        match &resp.error {
            None => enc.none()?,
            Some(err) => {
                enc.some_begin()?;
                enc.map_begin()?;
                enc.variant_begin("error_type")?;
                enc.str(&err.error_type)?;
                enc.variant_end()?;
                enc.variant_begin("message")?;
                enc.str(&err.message)?;
                enc.variant_end()?;
                enc.variant_begin("stack_trace")?;
                enc.list_begin()?;
                for line in &err.stack_trace {
                    enc.str(line)?;
                }
                enc.list_end()?;
                enc.variant_end()?;
                enc.map_end()?;
                enc.some_end()?;
            }
        }
        enc.variant_end()?;

        enc.map_end()?;
        Ok(enc.into_bytes()?)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<InvokeResponse> {
        let mut dec = Decoder::new(bytes);
        let mut map = dec.map()?;
        let mut payload = None;
        let mut error = None;

        while let Some((key, mut val)) = map.next()? {
            match key {
                "payload" => payload = Some(val.bytes()?.to_vec()),
                "error" => {
                    error = match val.option()? {
                        None => Some(None),
                        Some(mut inner) => Some(Some(decode_invocation_error(&mut inner)?)),
                    };
                }
                _ => {}
            }
        }

        Ok(InvokeResponse {
            payload: payload.ok_or(WireError::MissingField("payload"))?,
            error: error.ok_or(WireError::MissingField("error"))?,
        })
    }
}

fn decode_deadline(dec: &mut Decoder<'_>) -> Result<Deadline> {
    let mut map = dec.map()?;
    let mut seconds = None;
    let mut nanos = None;

    while let Some((key, mut val)) = map.next()? {
        match key {
            "seconds" => seconds = Some(val.s64()?),
            "nanos" => nanos = Some(val.s64()?),
            _ => {}
        }
    }

    Ok(Deadline {
        seconds: seconds.ok_or(WireError::MissingField("seconds"))?,
        nanos: nanos.ok_or(WireError::MissingField("nanos"))?,
    })
}

fn decode_invocation_error(dec: &mut Decoder<'_>) -> Result<InvocationError> {
    let mut map = dec.map()?;
    let mut error_type = None;
    let mut message = None;
    let mut stack_trace = Vec::new();

    while let Some((key, mut val)) = map.next()? {
        match key {
            "error_type" => error_type = Some(val.str()?.to_string()),
            "message" => message = Some(val.str()?.to_string()),
            "stack_trace" => {
                let mut items = val.list()?;
                while let Some(mut item) = items.next()? {
                    stack_trace.push(item.str()?.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(InvocationError {
        error_type: error_type.ok_or(WireError::MissingField("error_type"))?,
        message: message.ok_or(WireError::MissingField("message"))?,
        // stack_trace is optional on the wire; absent means empty
        stack_trace,
    })
}
