// File: crates/lampack/src/tests.rs
use crate::*;

// ============================================================================
//  1. SCALARS
// ============================================================================

#[test]
fn test_u64_roundtrip() {
    let mut enc = Encoder::new();
    enc.u64(0).unwrap();
    enc.u64(42).unwrap();
    enc.u64(u64::MAX).unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert_eq!(dec.u64().unwrap(), 0);
    assert_eq!(dec.u64().unwrap(), 42);
    assert_eq!(dec.u64().unwrap(), u64::MAX);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn test_s64_roundtrip() {
    let mut enc = Encoder::new();
    enc.s64(i64::MIN).unwrap();
    enc.s64(-1).unwrap();
    enc.s64(i64::MAX).unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert_eq!(dec.s64().unwrap(), i64::MIN);
    assert_eq!(dec.s64().unwrap(), -1);
    assert_eq!(dec.s64().unwrap(), i64::MAX);
}

#[test]
fn test_str_roundtrip() {
    let mut enc = Encoder::new();
    enc.str("hello 🦀").unwrap();
    enc.str("").unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert_eq!(dec.str().unwrap(), "hello 🦀");
    assert_eq!(dec.str().unwrap(), "");
}

#[test]
fn test_bytes_roundtrip() {
    let payload: Vec<u8> = (0..=255).collect();
    let mut enc = Encoder::new();
    enc.bytes(&payload).unwrap();
    enc.bytes(&[]).unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert_eq!(dec.bytes().unwrap(), &payload[..]);
    assert_eq!(dec.bytes().unwrap(), &[] as &[u8]);
}

#[test]
fn test_unit_roundtrip() {
    let mut enc = Encoder::new();
    enc.unit().unwrap();
    let bytes = enc.into_bytes().unwrap();
    assert_eq!(bytes, vec![Tag::Unit as u8]);

    let mut dec = Decoder::new(&bytes);
    dec.unit().unwrap();
}

// ============================================================================
//  2. CONTAINERS
// ============================================================================

#[test]
fn test_list_roundtrip() {
    let mut enc = Encoder::new();
    enc.list_begin().unwrap();
    enc.u64(1).unwrap();
    enc.str("two").unwrap();
    enc.s64(-3).unwrap();
    enc.list_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let mut iter = dec.list().unwrap();
    assert_eq!(iter.next().unwrap().unwrap().u64().unwrap(), 1);
    assert_eq!(iter.next().unwrap().unwrap().str().unwrap(), "two");
    assert_eq!(iter.next().unwrap().unwrap().s64().unwrap(), -3);
    assert!(iter.next().unwrap().is_none());
}

#[test]
fn test_empty_list() {
    let mut enc = Encoder::new();
    enc.list_begin().unwrap();
    enc.list_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let mut iter = dec.list().unwrap();
    assert!(iter.next().unwrap().is_none());
}

#[test]
fn test_nested_list() {
    let mut enc = Encoder::new();
    enc.list_begin().unwrap();
    enc.list_begin().unwrap();
    enc.u64(7).unwrap();
    enc.list_end().unwrap();
    enc.list_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let mut outer = dec.list().unwrap();
    let mut inner_dec = outer.next().unwrap().unwrap();
    let mut inner = inner_dec.list().unwrap();
    assert_eq!(inner.next().unwrap().unwrap().u64().unwrap(), 7);
}

#[test]
fn test_map_roundtrip() {
    let mut enc = Encoder::new();
    enc.map_begin().unwrap();
    enc.variant_begin("seq").unwrap();
    enc.u64(9).unwrap();
    enc.variant_end().unwrap();
    enc.variant_begin("name").unwrap();
    enc.str("invoke").unwrap();
    enc.variant_end().unwrap();
    enc.map_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let mut map = dec.map().unwrap();

    let (k, mut v) = map.next().unwrap().unwrap();
    assert_eq!(k, "seq");
    assert_eq!(v.u64().unwrap(), 9);

    let (k, mut v) = map.next().unwrap().unwrap();
    assert_eq!(k, "name");
    assert_eq!(v.str().unwrap(), "invoke");

    assert!(map.next().unwrap().is_none());
}

#[test]
fn test_option_roundtrip() {
    let mut enc = Encoder::new();
    enc.none().unwrap();
    enc.some_begin().unwrap();
    enc.str("present").unwrap();
    enc.some_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert!(dec.option().unwrap().is_none());
    let mut payload = dec.option().unwrap().expect("expected Some");
    assert_eq!(payload.str().unwrap(), "present");
}

#[test]
fn test_variant_roundtrip() {
    let mut enc = Encoder::new();
    enc.variant_begin("call").unwrap();
    enc.u64(1).unwrap();
    enc.variant_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let (name, mut payload) = dec.variant().unwrap();
    assert_eq!(name, "call");
    assert_eq!(payload.u64().unwrap(), 1);
}

// ============================================================================
//  3. SKIPPING
// ============================================================================

#[test]
fn test_skip_scalars_and_containers() {
    let mut enc = Encoder::new();
    enc.u64(1).unwrap();
    enc.list_begin().unwrap();
    enc.str("skipped").unwrap();
    enc.bytes(&[1, 2, 3]).unwrap();
    enc.list_end().unwrap();
    enc.s64(-5).unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    dec.skip().unwrap(); // u64
    dec.skip().unwrap(); // whole list, including children
    assert_eq!(dec.s64().unwrap(), -5);
    assert_eq!(dec.remaining(), 0);
}

#[test]
fn test_map_skips_unknown_fields() {
    // A reader that only knows "seq" must be able to walk past "extra".
    let mut enc = Encoder::new();
    enc.map_begin().unwrap();
    enc.variant_begin("extra").unwrap();
    enc.list_begin().unwrap();
    enc.u64(1).unwrap();
    enc.list_end().unwrap();
    enc.variant_end().unwrap();
    enc.variant_begin("seq").unwrap();
    enc.u64(2).unwrap();
    enc.variant_end().unwrap();
    enc.map_end().unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    let mut map = dec.map().unwrap();
    let mut seq = None;
    while let Some((key, mut val)) = map.next().unwrap() {
        if key == "seq" {
            seq = Some(val.u64().unwrap());
        }
    }
    assert_eq!(seq, Some(2));
}

// ============================================================================
//  4. STRUCTURAL ERRORS
// ============================================================================

#[test]
fn test_err_open_scope_on_finalize() {
    let mut enc = Encoder::new();
    enc.list_begin().unwrap();
    assert!(matches!(enc.into_bytes(), Err(Error::ScopeStillOpen)));
}

#[test]
fn test_err_map_rejects_bare_scalar() {
    let mut enc = Encoder::new();
    enc.map_begin().unwrap();
    assert!(matches!(enc.u64(1), Err(Error::InvalidMapEntry)));
}

#[test]
fn test_err_variant_requires_payload() {
    let mut enc = Encoder::new();
    enc.variant_begin("empty").unwrap();
    assert!(matches!(enc.variant_end(), Err(Error::EmptyScope(Scope::Variant))));
}

#[test]
fn test_err_some_holds_exactly_one() {
    let mut enc = Encoder::new();
    enc.some_begin().unwrap();
    enc.u64(1).unwrap();
    assert!(matches!(enc.u64(2), Err(Error::TooManyItems(Scope::Some))));
}

#[test]
fn test_err_scope_mismatch() {
    let mut enc = Encoder::new();
    enc.list_begin().unwrap();
    assert!(matches!(
        enc.map_end(),
        Err(Error::ScopeMismatch { expected: Scope::Map, actual: Scope::List })
    ));
}

#[test]
fn test_err_scope_underflow() {
    let mut enc = Encoder::new();
    assert!(matches!(enc.list_end(), Err(Error::ScopeUnderflow)));
}

// ============================================================================
//  5. DECODE ERRORS
// ============================================================================

#[test]
fn test_err_invalid_tag() {
    let dec = Decoder::new(&[0xFF]);
    assert_eq!(dec.peek_tag(), Err(Error::InvalidTag(0xFF)));
}

#[test]
fn test_err_unexpected_tag() {
    let mut enc = Encoder::new();
    enc.str("not a number").unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes);
    assert!(matches!(
        dec.u64(),
        Err(Error::UnexpectedTag { expected: Tag::U64, found: Tag::Str })
    ));
}

#[test]
fn test_err_truncated_scalar() {
    let mut enc = Encoder::new();
    enc.u64(42).unwrap();
    let bytes = enc.into_bytes().unwrap();

    let mut dec = Decoder::new(&bytes[..4]);
    assert_eq!(dec.u64(), Err(Error::UnexpectedEnd));
}

#[test]
fn test_err_truncated_blob() {
    let mut enc = Encoder::new();
    enc.bytes(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let bytes = enc.into_bytes().unwrap();

    // Cut the body short; the declared length now overruns the buffer.
    let mut dec = Decoder::new(&bytes[..bytes.len() - 2]);
    assert_eq!(dec.bytes(), Err(Error::UnexpectedEnd));
}

#[test]
fn test_err_invalid_utf8() {
    let mut buf = vec![Tag::Str as u8];
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&[0xC0, 0xAF]); // overlong encoding
    let mut dec = Decoder::new(&buf);
    assert_eq!(dec.str(), Err(Error::InvalidUtf8));
}

#[test]
fn test_inner_length_cannot_escape_container() {
    // A list whose inner blob lies about its length must fail inside the
    // list body, not read past it.
    let mut buf = vec![Tag::List as u8];
    let mut body = vec![Tag::Bytes as u8];
    body.extend_from_slice(&100u32.to_le_bytes()); // claims 100 bytes
    body.push(0xAB); // provides 1
    buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
    buf.extend_from_slice(&body);
    buf.push(Tag::Unit as u8); // trailing sibling that must stay intact

    let mut dec = Decoder::new(&buf);
    let mut iter = dec.list().unwrap();
    assert!(iter.next().is_err());
    dec.unit().unwrap();
}
