//! The call/reply envelope.
//!
//! Wire shape:
//!
//! - `Variant("call") -> Map { "seq": U64, "method": Str, "body": Bytes }`
//! - `Variant("reply") -> Map { "seq": U64, "body": Bytes }`
//!
//! The body blob is opaque at this layer; a [`crate::BodyCodec`] produces
//! and consumes it. Unknown map fields are skipped so the envelope can
//! grow without breaking old readers.

use lampack::Decoder;
use lampack::Encoder;

use crate::error::Result;
use crate::error::WireError;

/// A decoded inbound `call` envelope.
#[derive(Debug)]
pub struct CallFrame<'a> {
    pub seq: u64,
    pub method: &'a str,
    /// Serialized request body; decode with a `BodyCodec`.
    pub body: &'a [u8],
}

/// A decoded inbound `reply` envelope.
#[derive(Debug)]
pub struct ReplyFrame<'a> {
    pub seq: u64,
    /// Serialized response body; decode with a `BodyCodec`.
    pub body: &'a [u8],
}

/// Either side of an exchange, decoded generically.
#[derive(Debug)]
pub enum Frame<'a> {
    Call(CallFrame<'a>),
    Reply(ReplyFrame<'a>),
}

fn write_field_u64(enc: &mut Encoder, key: &str, val: u64) -> Result<()> {
    enc.variant_begin(key)?;
    enc.u64(val)?;
    enc.variant_end()?;
    Ok(())
}

fn write_field_str(enc: &mut Encoder, key: &str, val: &str) -> Result<()> {
    enc.variant_begin(key)?;
    enc.str(val)?;
    enc.variant_end()?;
    Ok(())
}

fn write_field_bytes(enc: &mut Encoder, key: &str, val: &[u8]) -> Result<()> {
    enc.variant_begin(key)?;
    enc.bytes(val)?;
    enc.variant_end()?;
    Ok(())
}

/// Encodes an outbound `call` envelope around an already-encoded body.
pub fn encode_call(seq: u64, method: &str, body: &[u8]) -> Result<Vec<u8>> {
    let mut enc = Encoder::new();
    enc.variant_begin("call")?;
    enc.map_begin()?;
    write_field_u64(&mut enc, "seq", seq)?;
    write_field_str(&mut enc, "method", method)?;
    write_field_bytes(&mut enc, "body", body)?;
    enc.map_end()?;
    enc.variant_end()?;
    Ok(enc.into_bytes()?)
}

/// Encodes an outbound `reply` envelope around an already-encoded body.
///
/// The client never sends replies; this is the server half of the shared
/// protocol, used by emulator implementations and the test peer.
pub fn encode_reply(seq: u64, body: &[u8]) -> Result<Vec<u8>> {
    let mut enc = Encoder::new();
    enc.variant_begin("reply")?;
    enc.map_begin()?;
    write_field_u64(&mut enc, "seq", seq)?;
    write_field_bytes(&mut enc, "body", body)?;
    enc.map_end()?;
    enc.variant_end()?;
    Ok(enc.into_bytes()?)
}

/// Decodes one envelope, call or reply.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame<'_>> {
    let mut dec = Decoder::new(bytes);
    let (kind, mut payload) = dec.variant()?;

    let mut map = payload.map()?;
    let mut seq = None;
    let mut method = None;
    let mut body = None;

    while let Some((key, mut val)) = map.next()? {
        match key {
            "seq" => seq = Some(val.u64()?),
            "method" => method = Some(val.str()?),
            "body" => body = Some(val.bytes()?),
            _ => {} // forward compatibility: ignore unknown fields
        }
    }

    let seq = seq.ok_or(WireError::MissingField("seq"))?;
    let body = body.ok_or(WireError::MissingField("body"))?;

    match kind {
        "call" => Ok(Frame::Call(CallFrame {
            seq,
            method: method.ok_or(WireError::MissingField("method"))?,
            body,
        })),
        "reply" => Ok(Frame::Reply(ReplyFrame { seq, body })),
        other => Err(WireError::UnknownFrame(other.to_string())),
    }
}
