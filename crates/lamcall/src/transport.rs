//! Stream-level framing.
//!
//! Every envelope is a single top-level lampack container, so its first
//! five bytes (`[Tag: 1b][Len: 4b LE]`) announce exactly how much more to
//! read. The reader pulls one complete frame off the stream without
//! understanding its contents; decoding happens elsewhere.

use std::io::Read;
use std::io::Write;

use lampack::Tag;

/// Upper bound on one frame body.
///
/// Large enough for any realistic event payload, small enough that a
/// corrupted length header cannot make us allocate the address space.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Failures while pulling one frame off the stream.
#[derive(Debug)]
pub enum FrameError {
    /// The stream failed or ended mid-frame.
    Io(std::io::Error),
    /// The first byte is not a length-carrying lampack container tag.
    InvalidHeader(u8),
    /// The header announced a body larger than [`MAX_FRAME_LEN`].
    TooLarge(usize),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "frame i/o error: {}", e),
            FrameError::InvalidHeader(b) => write!(f, "invalid frame header byte {:#04x}", b),
            FrameError::TooLarge(n) => {
                write!(f, "frame of {} bytes exceeds the {} byte limit", n, MAX_FRAME_LEN)
            }
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        FrameError::Io(e)
    }
}

/// Writes one already-encoded frame and flushes.
pub fn write_frame<W: Write>(w: &mut W, frame: &[u8]) -> std::io::Result<()> {
    w.write_all(frame)?;
    w.flush()
}

/// Blocks until one complete frame has been read.
///
/// Returns the whole frame including its header, ready for
/// `lamrpc::decode_frame`. A peer that closes mid-frame surfaces as
/// `FrameError::Io` with `UnexpectedEof`, which is a transport failure,
/// not an empty reply.
pub fn read_frame<R: Read>(r: &mut R) -> Result<Vec<u8>, FrameError> {
    let mut head = [0u8; 5];
    r.read_exact(&mut head)?;

    match Tag::from_u8(head[0]) {
        Some(tag) if tag.has_length() => {}
        _ => return Err(FrameError::InvalidHeader(head[0])),
    }

    let len = u32::from_le_bytes(head[1..5].try_into().unwrap()) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(len));
    }

    let mut frame = vec![0u8; head.len() + len];
    frame[..head.len()].copy_from_slice(&head);
    r.read_exact(&mut frame[head.len()..])?;
    Ok(frame)
}
