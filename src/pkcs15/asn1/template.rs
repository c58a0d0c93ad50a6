//! Minimal BER/DER TLV primitives consumed by the directory-file entry
//! codecs (spec §4.H, §6 "ASN.1 codec (consumed)").
//!
//! Spec.md treats the ASN.1/DER primitive codec as an external
//! collaborator consumed through `decode`/`encode`/`find_tag`. This module
//! is that collaborator's implementation: a small definite-length BER-TLV
//! walker (single-byte tags only, which is all PKCS#15 directory-file
//! entries use) plus helpers built on the `der` crate's OID type for the
//! one place PKCS#15 entries carry an object identifier (application
//! OIDs in `CommonObjectAttributes`).

use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u8,
    pub value: Vec<u8>,
}

fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
        let significant = &bytes[start..];
        out.push(0x80 | significant.len() as u8);
        out.extend_from_slice(significant);
    }
}

fn decode_length(buf: &[u8]) -> Result<(usize, usize), Error> {
    let first = *buf.first().ok_or(Error::from(ErrorKind::InvalidArguments))?;
    if first & 0x80 == 0 {
        Ok((first as usize, 1))
    } else {
        let n = (first & 0x7F) as usize;
        if n == 0 || buf.len() < 1 + n {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let mut len = 0usize;
        for b in &buf[1..1 + n] {
            len = (len << 8) | (*b as usize);
        }
        Ok((len, 1 + n))
    }
}

/// Parse one TLV starting at the front of `buf`; returns the value and how
/// many bytes were consumed.
pub fn parse_one(buf: &[u8]) -> Result<(Tlv, usize), Error> {
    let tag = *buf.first().ok_or(Error::from(ErrorKind::InvalidArguments))?;
    let (len, len_size) = decode_length(&buf[1..])?;
    let start = 1 + len_size;
    if buf.len() < start + len {
        return Err(ErrorKind::InvalidArguments.into());
    }
    Ok((Tlv { tag, value: buf[start..start + len].to_vec() }, start + len))
}

/// Parse every TLV in `buf` as siblings (a SEQUENCE's content, or a
/// top-level stream of entries).
pub fn parse_all(mut buf: &[u8]) -> Result<Vec<Tlv>, Error> {
    let mut out = Vec::new();
    while !buf.is_empty() {
        let (tlv, consumed) = parse_one(buf)?;
        out.push(tlv);
        buf = &buf[consumed..];
    }
    Ok(out)
}

/// Unwrap a SEQUENCE (tag `0x30`) and parse its content as siblings.
pub fn parse_sequence(buf: &[u8]) -> Result<Vec<Tlv>, Error> {
    let (tlv, _) = parse_one(buf)?;
    if tlv.tag != TAG_SEQUENCE {
        return Err(ErrorKind::InvalidArguments.into());
    }
    parse_all(&tlv.value)
}

/// Re-wrap a list of TLVs into a SEQUENCE.
pub fn encode_sequence(items: &[Tlv]) -> Vec<u8> {
    let mut inner = Vec::new();
    for item in items {
        encode_one(item, &mut inner);
    }
    let mut out = Vec::new();
    out.push(TAG_SEQUENCE);
    encode_length(inner.len(), &mut out);
    out.extend_from_slice(&inner);
    out
}

pub fn encode_one(tlv: &Tlv, out: &mut Vec<u8>) {
    out.push(tlv.tag);
    encode_length(tlv.value.len(), out);
    out.extend_from_slice(&tlv.value);
}

/// Find the first top-level TLV with the given tag (spec §6 `find_tag`).
pub fn find_tag(items: &[Tlv], tag: u8) -> Option<&Tlv> {
    items.iter().find(|t| t.tag == tag)
}

pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_UTF8_STRING: u8 = 0x0C;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BOOLEAN: u8 = 0x01;

pub fn utf8_string(tag: u8, s: &str) -> Tlv {
    Tlv { tag, value: s.as_bytes().to_vec() }
}

pub fn decode_utf8_string(tlv: &Tlv) -> Result<String, Error> {
    String::from_utf8(tlv.value.clone()).map_err(|_| ErrorKind::InvalidArguments.into())
}

pub fn octet_string(tag: u8, bytes: &[u8]) -> Tlv {
    Tlv { tag, value: bytes.to_vec() }
}

pub fn integer(tag: u8, value: i32) -> Tlv {
    let mut bytes = value.to_be_bytes().to_vec();
    // Trim to the minimal two's-complement encoding, as DER requires.
    while bytes.len() > 1 && ((bytes[0] == 0x00 && bytes[1] & 0x80 == 0) || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0)) {
        bytes.remove(0);
    }
    Tlv { tag, value: bytes }
}

pub fn decode_integer(tlv: &Tlv) -> Result<i32, Error> {
    if tlv.value.is_empty() || tlv.value.len() > 4 {
        return Err(ErrorKind::InvalidArguments.into());
    }
    let negative = tlv.value[0] & 0x80 != 0;
    let mut buf = [if negative { 0xFF } else { 0x00 }; 4];
    buf[4 - tlv.value.len()..].copy_from_slice(&tlv.value);
    Ok(i32::from_be_bytes(buf))
}

/// A DER-encoded `ObjectIdentifier`, decoded with `const_oid` (the one
/// place this crate needs a real ASN.1 OID value rather than a hand-rolled
/// one) and re-encoded the same way.
pub fn decode_oid(tlv: &Tlv) -> Result<const_oid::ObjectIdentifier, Error> {
    const_oid::ObjectIdentifier::from_bytes(&tlv.value).map_err(|_| ErrorKind::InvalidArguments.into())
}

pub fn encode_oid(tag: u8, oid: &const_oid::ObjectIdentifier) -> Tlv {
    Tlv { tag, value: oid.as_bytes().to_vec() }
}

/// A DF entry that can be decoded from, and re-encoded to, DER bytes. The
/// round trip required by spec §4.H/§8 S6 is: a parse then encode of any
/// well-formed entry yields bytes that parse back to a structurally
/// identical value (tags and values match; optional-absent fields may
/// differ in whether they're emitted at all).
pub trait DfEntry: Sized {
    fn decode(bytes: &[u8]) -> Result<Self, Error>;
    fn encode(&self) -> Vec<u8>;
}
