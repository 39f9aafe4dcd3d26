//! # LamRPC
//!
//! The wire protocol spoken between the lamcall client and a local
//! function-execution sandbox (a Lambda-style runtime emulator).
//!
//! ## Architecture
//!
//! Messages are lampack items with two layers:
//!
//! - The **envelope** (this crate's `frame` module): a `call` or `reply`
//!   variant carrying a sequence number, the method identifier for calls,
//!   and the serialized body as an opaque blob.
//! - The **body** (this crate's `body` module): the invocation request or
//!   response, encoded by a [`BodyCodec`]. The default [`PackCodec`] uses
//!   lampack maps with named fields, so an independently written peer can
//!   reconstruct the structure without a shared schema file.
//!
//! The client issues one call per connection, but the envelope is decoded
//! generically: peers that pipeline multiple calls share this format.

mod body;
mod error;
mod frame;
mod types;


pub use crate::error::Result;
pub use crate::error::WireError;

pub use crate::types::Deadline;
pub use crate::types::InvocationError;
pub use crate::types::InvokeRequest;
pub use crate::types::InvokeResponse;

pub use crate::frame::CallFrame;
pub use crate::frame::Frame;
pub use crate::frame::ReplyFrame;
pub use crate::frame::decode_frame;
pub use crate::frame::encode_call;
pub use crate::frame::encode_reply;

pub use crate::body::BodyCodec;
pub use crate::body::PackCodec;

/// The method identifier of the single operation the emulator exposes.
pub const INVOKE_METHOD: &str = "Function.Invoke";

/// The sequence number of the first call on a fresh connection.
pub const FIRST_SEQ: u64 = 0;
