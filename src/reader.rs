//! Reader backend capability (spec §6 "Reader capability (consumed)").
//!
//! The library never talks to PC/SC, CT-API or OpenCT directly; it only
//! consumes this trait. A real backend lives behind the optional
//! `pcsc-reader` feature (module [`crate::pcsc_reader`]), analogous to the
//! teacher crate's own `proxmark3`/`rusb`-gated NFC backend.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPresence {
    Present,
    Absent,
    Unknown,
}

/// Capability bits a reader may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderCaps(pub u8);

impl ReaderCaps {
    pub const PIN_PAD: ReaderCaps = ReaderCaps(0b0000_0001);
    pub const EXTENDED_LENGTH: ReaderCaps = ReaderCaps(0b0000_0010);

    pub const fn empty() -> Self {
        ReaderCaps(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        ReaderCaps(self.0 | other.0)
    }
}

impl std::ops::BitOr for ReaderCaps {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A single command/response exchange result, before status-word
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

/// The reader backend capability consumed by the APDU layer (§4.E).
pub trait Reader {
    /// Transmit one raw APDU and return the raw (unclassified) response.
    fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, crate::error::Error>;

    fn detect_card_presence(&mut self) -> CardPresence;

    fn capabilities(&self) -> ReaderCaps;

    /// The card's Answer-to-Reset, as last observed by the reader.
    fn atr(&self) -> &[u8];
}
