//! Sensitive-byte wrapper (spec §9: "PIN content erasure").
//!
//! Replaces the "magic pointer"/manual-wipe pattern with ownership: a
//! `Secret` zeroes its backing buffer on every drop path, including panics
//! that unwind through it, via `zeroize::Zeroizing`.

use zeroize::Zeroizing;

#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret({} bytes, redacted)", self.0.len())
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        // Not constant-time: equality is only used in test fixtures, never
        // on the verification path (card verification is the source of
        // truth there).
        self.0 == other.0
    }
}
impl Eq for Secret {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_bytes() {
        let s = Secret::new(vec![0x31, 0x32, 0x33, 0x34]);
        let rendered = format!("{s:?}");
        assert!(!rendered.contains("1234"));
        assert!(rendered.contains("4 bytes"));
    }
}
