//! Hex/binary and big-endian helpers (spec §4.B–C, component A).

use crate::error::{Error, ErrorKind};

/// Parse a hex string into bytes. Accepts an optional leading `i`/`I`
/// (meaning "this is a short file id", consumed by [`crate::path::parse_path`]
/// rather than here) and tolerates `:` or space separators between byte
/// pairs, matching the format parser described in spec §4.B.
pub fn hex_to_bin(s: &str) -> Result<Vec<u8>, Error> {
    let cleaned: String = s.chars().filter(|c| *c != ':' && *c != ' ').collect();
    if cleaned.len() % 2 != 0 {
        return Err(ErrorKind::InvalidArguments.into());
    }
    hex::decode(&cleaned).map_err(|_| ErrorKind::InvalidArguments.into())
}

/// Render bytes as lowercase hex with no separators.
pub fn bin_to_hex(b: &[u8]) -> String {
    hex::encode(b)
}

/// Pack an unsigned value into `len` big-endian bytes.
pub fn ulong_to_bebytes(value: u64, len: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[8 - len..].to_vec()
}

/// Unpack big-endian bytes (up to 8) into an unsigned value.
pub fn bebytes_to_ulong(b: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = b.len().min(8);
    buf[8 - n..].copy_from_slice(&b[b.len() - n..]);
    u64::from_be_bytes(buf)
}
