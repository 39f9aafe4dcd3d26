//! # Lampack
//!
//! A small, self-describing binary serialization layer for the lamcall
//! wire protocol.
//!
//! ## Format
//!
//! Every item is `[Tag: 1b]` followed by tag-specific data:
//!
//! - **Scalars**: fixed width (`U64`/`S64` are 8 bytes, `Unit`/`None` are empty)
//! - **Blobs**: `[Len: 4b][Data: Len]` (`Str`, `Bytes`)
//! - **Containers**: `[Len: 4b][Body: Len]` (`List`, `Map`, `Some`, `Variant`)
//!
//! All integers are little-endian. Because container bodies carry their
//! length inline, a decoder can skip items it does not understand, and a
//! stream reader can pull exactly one complete top-level item off a socket
//! without knowing its schema.
//!
//! ## Shape rules
//!
//! - A `Map` holds only `Variant` children (named fields).
//! - A `Variant` holds its name followed by exactly one payload item.
//! - A `Some` holds exactly one item; `None` stands alone.
//!
//! The encoder enforces these rules with an explicit scope stack rather
//! than trusting the caller.

#[cfg(test)]
mod tests;

/// Lampack serialization and deserialization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Byte does not correspond to a valid lampack `Tag`.
    InvalidTag(u8),
    /// Expected one tag, found another.
    UnexpectedTag { expected: Tag, found: Tag },
    /// String data is not valid UTF-8.
    InvalidUtf8,
    /// Closing a scope that does not match the currently open scope.
    ScopeMismatch { expected: Scope, actual: Scope },
    /// Attempted to close a scope when only the root remains.
    ScopeUnderflow,
    /// Attempted to finalize the buffer with open scopes.
    ScopeStillOpen,
    /// Buffer exhausted while reading.
    UnexpectedEnd,
    /// Blob or container body exceeds `u32::MAX` bytes.
    TooLarge(usize),
    /// Wrote more than one item into a strict scope (`Some`/`Variant`).
    TooManyItems(Scope),
    /// Closed a strict scope (`Some`/`Variant`) without a payload item.
    EmptyScope(Scope),
    /// Wrote a non-`Variant` item directly into a `Map`.
    InvalidMapEntry,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTag(b) => write!(f, "invalid tag byte {:#04x}", b),
            Error::UnexpectedTag { expected, found } => {
                write!(f, "unexpected tag: expected {:?}, found {:?}", expected, found)
            }
            Error::ScopeMismatch { expected, actual } => {
                write!(f, "scope mismatch: expected {:?}, found {:?}", expected, actual)
            }
            Error::TooManyItems(s) => write!(f, "scope {:?} holds exactly one item", s),
            Error::EmptyScope(s) => write!(f, "scope {:?} closed without a payload", s),
            Error::TooLarge(n) => write!(f, "body of {} bytes exceeds the u32 length header", n),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for lampack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies the type of the encoded item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// The empty value.
    Unit = 0x01,
    /// Unsigned 64-bit integer, 8 bytes LE.
    U64 = 0x02,
    /// Signed 64-bit integer, 8 bytes LE.
    S64 = 0x03,
    /// UTF-8 string blob.
    Str = 0x04,
    /// Raw byte blob.
    Bytes = 0x05,
    /// Absent optional value.
    None = 0x06,
    /// Ordered sequence of items.
    List = 0x10,
    /// Named-field container; children are Variants.
    Map = 0x11,
    /// Present optional value; holds exactly one item.
    Some = 0x12,
    /// Name string followed by exactly one payload item.
    Variant = 0x13,
}

impl Tag {
    /// Returns the `Tag` for a given byte, or `None` if invalid.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Tag::Unit),
            0x02 => Some(Tag::U64),
            0x03 => Some(Tag::S64),
            0x04 => Some(Tag::Str),
            0x05 => Some(Tag::Bytes),
            0x06 => Some(Tag::None),
            0x10 => Some(Tag::List),
            0x11 => Some(Tag::Map),
            0x12 => Some(Tag::Some),
            0x13 => Some(Tag::Variant),
            _ => None,
        }
    }

    /// Whether this tag is followed by a u32 length header.
    pub fn has_length(self) -> bool {
        matches!(
            self,
            Tag::Str | Tag::Bytes | Tag::List | Tag::Map | Tag::Some | Tag::Variant
        )
    }
}

/// Scope kinds tracked by the `Encoder` stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The virtual root; allows any item.
    Root,
    /// Allows any number of items.
    List,
    /// Allows only `Variant` items.
    Map,
    /// Allows exactly one item.
    Some,
    /// Allows exactly one item (the payload) after the name.
    Variant,
}

/// An open container scope on the `Encoder` stack.
struct Frame {
    /// Offset of the first body byte, directly after the length header.
    start: usize,
    scope: Scope,
    count: usize,
}

/// A state-machine driven encoder.
///
/// Open scopes reserve a 4-byte length header that is back-patched when
/// the scope closes. Writes are validated against the innermost scope, so
/// a finished buffer is structurally well-formed by construction.
pub struct Encoder {
    buf: Vec<u8>,
    /// Bottom is always `Scope::Root`.
    stack: Vec<Frame>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates a new encoder with default capacity.
    pub fn new() -> Self {
        let mut enc = Self {
            buf: Vec::with_capacity(256),
            stack: Vec::with_capacity(8),
        };
        enc.stack.push(Frame { start: 0, scope: Scope::Root, count: 0 });
        enc
    }

    /// Consumes the encoder and returns the final byte vector.
    ///
    /// # Errors
    /// Returns `Error::ScopeStillOpen` unless all scopes are closed.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if self.stack.len() > 1 {
            return Err(Error::ScopeStillOpen);
        }
        Ok(self.buf)
    }

    fn top(&mut self) -> &mut Frame {
        // The root frame is pushed at construction and never popped.
        self.stack.last_mut().unwrap()
    }

    fn check_write(&mut self, tag: Tag) -> Result<()> {
        let frame = self.top();
        match frame.scope {
            Scope::Root | Scope::List => Ok(()),
            Scope::Map if tag != Tag::Variant => Err(Error::InvalidMapEntry),
            Scope::Map => Ok(()),
            Scope::Some | Scope::Variant => {
                if frame.count >= 1 {
                    Err(Error::TooManyItems(frame.scope))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn item_written(&mut self) {
        self.top().count += 1;
    }

    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.check_write(tag)?;
        self.buf.push(tag as u8);
        Ok(())
    }

    fn write_blob(&mut self, tag: Tag, data: &[u8]) -> Result<()> {
        if data.len() > u32::MAX as usize {
            return Err(Error::TooLarge(data.len()));
        }
        self.write_tag(tag)?;
        self.buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(data);
        self.item_written();
        Ok(())
    }

    fn begin_scope(&mut self, tag: Tag, scope: Scope) -> Result<()> {
        self.write_tag(tag)?;
        self.buf.extend_from_slice(&[0, 0, 0, 0]); // length placeholder
        self.stack.push(Frame { start: self.buf.len(), scope, count: 0 });
        Ok(())
    }

    fn end_scope(&mut self, expected: Scope) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::ScopeUnderflow);
        }

        {
            let frame = self.top();
            if frame.scope != expected {
                return Err(Error::ScopeMismatch { expected, actual: frame.scope });
            }
            if matches!(frame.scope, Scope::Some | Scope::Variant) && frame.count == 0 {
                return Err(Error::EmptyScope(frame.scope));
            }
        }

        let frame = self.stack.pop().unwrap();
        let body_len = self.buf.len() - frame.start;
        if body_len > u32::MAX as usize {
            return Err(Error::TooLarge(body_len));
        }

        // Patch the reserved length header.
        let len_pos = frame.start - 4;
        self.buf[len_pos..frame.start].copy_from_slice(&(body_len as u32).to_le_bytes());

        self.item_written();
        Ok(())
    }

    /// Encodes the empty value.
    pub fn unit(&mut self) -> Result<()> {
        self.write_tag(Tag::Unit)?;
        self.item_written();
        Ok(())
    }

    /// Encodes an absent optional value.
    pub fn none(&mut self) -> Result<()> {
        self.write_tag(Tag::None)?;
        self.item_written();
        Ok(())
    }

    /// Encodes an unsigned 64-bit integer (LE).
    pub fn u64(&mut self, v: u64) -> Result<()> {
        self.write_tag(Tag::U64)?;
        self.buf.extend_from_slice(&v.to_le_bytes());
        self.item_written();
        Ok(())
    }

    /// Encodes a signed 64-bit integer (LE).
    pub fn s64(&mut self, v: i64) -> Result<()> {
        self.write_tag(Tag::S64)?;
        self.buf.extend_from_slice(&v.to_le_bytes());
        self.item_written();
        Ok(())
    }

    /// Encodes a UTF-8 string blob.
    pub fn str(&mut self, v: &str) -> Result<()> {
        self.write_blob(Tag::Str, v.as_bytes())
    }

    /// Encodes a raw byte blob.
    pub fn bytes(&mut self, v: &[u8]) -> Result<()> {
        self.write_blob(Tag::Bytes, v)
    }

    /// Begins a List. Close with `list_end`.
    pub fn list_begin(&mut self) -> Result<()> {
        self.begin_scope(Tag::List, Scope::List)
    }

    /// Ends a List.
    pub fn list_end(&mut self) -> Result<()> {
        self.end_scope(Scope::List)
    }

    /// Begins a Map. Close with `map_end`.
    ///
    /// Only `variant_begin` (a named field) is allowed as a direct child.
    pub fn map_begin(&mut self) -> Result<()> {
        self.begin_scope(Tag::Map, Scope::Map)
    }

    /// Ends a Map.
    pub fn map_end(&mut self) -> Result<()> {
        self.end_scope(Scope::Map)
    }

    /// Begins a present optional value. Close with `some_end`.
    ///
    /// Exactly one item must be written before closing.
    pub fn some_begin(&mut self) -> Result<()> {
        self.begin_scope(Tag::Some, Scope::Some)
    }

    /// Ends a present optional value.
    pub fn some_end(&mut self) -> Result<()> {
        self.end_scope(Scope::Some)
    }

    /// Begins a Variant and writes its name.
    ///
    /// Exactly one payload item must be written before `variant_end`.
    pub fn variant_begin(&mut self, name: &str) -> Result<()> {
        self.begin_scope(Tag::Variant, Scope::Variant)?;
        // The name is scope metadata, not the payload item.
        self.str(name)?;
        self.top().count = 0;
        Ok(())
    }

    /// Ends a Variant.
    pub fn variant_end(&mut self) -> Result<()> {
        self.end_scope(Scope::Variant)
    }
}

/// A zero-copy, bounds-checked cursor over a byte slice.
///
/// Reading advances the cursor. Container reads return new `Decoder`
/// views restricted to the container body, so a malformed inner length
/// can never escape its parent.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over the slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns the remaining bytes in the view.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Peeks the next Tag without advancing.
    pub fn peek_tag(&self) -> Result<Tag> {
        if self.buf.is_empty() {
            return Err(Error::UnexpectedEnd);
        }
        Tag::from_u8(self.buf[0]).ok_or(Error::InvalidTag(self.buf[0]))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::UnexpectedEnd);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn check_tag(&mut self, expected: Tag) -> Result<()> {
        let found = self.peek_tag()?;
        if found != expected {
            return Err(Error::UnexpectedTag { expected, found });
        }
        self.take(1)?;
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()) as usize)
    }

    /// Skips the next item and all of its nested children.
    pub fn skip(&mut self) -> Result<()> {
        let tag = self.peek_tag()?;
        self.take(1)?;
        match tag {
            Tag::Unit | Tag::None => {}
            Tag::U64 | Tag::S64 => {
                self.take(8)?;
            }
            _ => {
                // All remaining tags carry a length header.
                let len = self.read_len()?;
                self.take(len)?;
            }
        }
        Ok(())
    }

    /// Decodes the empty value.
    pub fn unit(&mut self) -> Result<()> {
        self.check_tag(Tag::Unit)
    }

    /// Decodes u64 (LE).
    pub fn u64(&mut self) -> Result<u64> {
        self.check_tag(Tag::U64)?;
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// Decodes s64 (LE).
    pub fn s64(&mut self) -> Result<i64> {
        self.check_tag(Tag::S64)?;
        Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// Decodes a string slice (UTF-8).
    pub fn str(&mut self) -> Result<&'a str> {
        self.check_tag(Tag::Str)?;
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes a byte slice.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        self.check_tag(Tag::Bytes)?;
        let len = self.read_len()?;
        self.take(len)
    }

    fn enter(&mut self, expected: Tag) -> Result<Decoder<'a>> {
        self.check_tag(expected)?;
        let len = self.read_len()?;
        Ok(Decoder::new(self.take(len)?))
    }

    /// Decodes a List into an iterator over item decoders.
    pub fn list(&mut self) -> Result<ListIter<'a>> {
        Ok(ListIter { dec: self.enter(Tag::List)? })
    }

    /// Decodes a Map into an iterator over named fields.
    pub fn map(&mut self) -> Result<MapIter<'a>> {
        Ok(MapIter { dec: self.enter(Tag::Map)? })
    }

    /// Decodes an optional value.
    ///
    /// Returns a decoder for the payload if present.
    pub fn option(&mut self) -> Result<Option<Decoder<'a>>> {
        match self.peek_tag()? {
            Tag::None => {
                self.take(1)?;
                Ok(None)
            }
            Tag::Some => Ok(Some(self.enter(Tag::Some)?)),
            found => Err(Error::UnexpectedTag { expected: Tag::Some, found }),
        }
    }

    /// Decodes a Variant as `(name, payload decoder)`.
    pub fn variant(&mut self) -> Result<(&'a str, Decoder<'a>)> {
        let mut inner = self.enter(Tag::Variant)?;
        let name = inner.str()?;
        Ok((name, inner))
    }
}

/// Iterator over the items of a List.
#[derive(Debug)]
pub struct ListIter<'a> {
    dec: Decoder<'a>,
}

impl<'a> ListIter<'a> {
    /// Returns a decoder for the next item, or `None` at the end.
    pub fn next(&mut self) -> Result<Option<Decoder<'a>>> {
        if self.dec.remaining() == 0 {
            return Ok(None);
        }
        let mut probe = self.dec.clone();
        probe.skip()?;
        let len = self.dec.remaining() - probe.remaining();
        Ok(Some(Decoder::new(self.dec.take(len)?)))
    }
}

/// Iterator over the named fields (Variants) of a Map.
#[derive(Debug)]
pub struct MapIter<'a> {
    dec: Decoder<'a>,
}

impl<'a> MapIter<'a> {
    /// Returns `(name, value decoder)` for the next field, or `None`.
    pub fn next(&mut self) -> Result<Option<(&'a str, Decoder<'a>)>> {
        if self.dec.remaining() == 0 {
            return Ok(None);
        }
        let (name, val) = self.dec.variant()?;
        Ok(Some((name, val)))
    }
}
