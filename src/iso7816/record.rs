//! READ/WRITE/UPDATE/APPEND RECORD (spec §4.F).

use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::reader::Reader;

const INS_READ_RECORD: u8 = 0xB2;
const INS_WRITE_RECORD: u8 = 0xD2;
const INS_UPDATE_RECORD: u8 = 0xDC;
const INS_APPEND_RECORD: u8 = 0xE2;

/// Record-selection mode for P2 bit 2 (spec §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// P2 bit 2 clear: address by absolute record number.
    ByNumber,
    /// P2 bit 2 set: first/last/next/previous relative to the current
    /// record pointer.
    ByFlag(RecordFlag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFlag {
    First,
    Last,
    Next,
    Previous,
}

fn p2(short_ef: Option<u8>, mode: RecordMode) -> u8 {
    let ef_bits = short_ef.unwrap_or(0) << 3;
    let mode_bits = match mode {
        RecordMode::ByNumber => 0b100,
        RecordMode::ByFlag(RecordFlag::First) => 0b000,
        RecordMode::ByFlag(RecordFlag::Last) => 0b001,
        RecordMode::ByFlag(RecordFlag::Next) => 0b010,
        RecordMode::ByFlag(RecordFlag::Previous) => 0b011,
    };
    ef_bits | mode_bits
}

pub fn read_record(
    reader: &mut dyn Reader,
    rec_nr: u8,
    short_ef: Option<u8>,
    mode: RecordMode,
    count: usize,
) -> Result<Vec<u8>, Error> {
    let apdu = Apdu::case2_short(0x00, INS_READ_RECORD, rec_nr, p2(short_ef, mode), count);
    let resp = apdu::transmit(reader, &apdu)?;
    resp.classify()?;
    Ok(resp.data)
}

pub fn write_record(reader: &mut dyn Reader, rec_nr: u8, short_ef: Option<u8>, data: &[u8]) -> Result<(), Error> {
    let apdu = Apdu::case3_short(0x00, INS_WRITE_RECORD, rec_nr, p2(short_ef, RecordMode::ByNumber), data.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}

pub fn update_record(reader: &mut dyn Reader, rec_nr: u8, short_ef: Option<u8>, data: &[u8]) -> Result<(), Error> {
    let apdu = Apdu::case3_short(0x00, INS_UPDATE_RECORD, rec_nr, p2(short_ef, RecordMode::ByNumber), data.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}

pub fn append_record(reader: &mut dyn Reader, short_ef: Option<u8>, data: &[u8]) -> Result<(), Error> {
    let apdu = Apdu::case3_short(0x00, INS_APPEND_RECORD, 0x00, p2(short_ef, RecordMode::ByNumber), data.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct FixedReader(Vec<u8>, u8, u8, Vec<Vec<u8>>);
    impl Reader for FixedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
            self.3.push(apdu.to_vec());
            Ok(RawResponse { data: self.0.clone(), sw1: self.1, sw2: self.2 })
        }
        fn detect_card_presence(&mut self) -> CardPresence {
            CardPresence::Present
        }
        fn capabilities(&self) -> ReaderCaps {
            ReaderCaps::empty()
        }
        fn atr(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn read_record_by_number_with_short_ef() {
        let mut reader = FixedReader(vec![1, 2, 3], 0x90, 0x00, vec![]);
        read_record(&mut reader, 1, Some(2), RecordMode::ByNumber, 3).unwrap();
        // P2 = (2<<3) | 0b100 = 0x14
        assert_eq!(reader.3[0], vec![0x00, 0xB2, 0x01, 0x14, 0x03]);
    }

    #[test]
    fn read_record_by_flag_next() {
        let mut reader = FixedReader(vec![], 0x90, 0x00, vec![]);
        read_record(&mut reader, 0, None, RecordMode::ByFlag(RecordFlag::Next), 0).unwrap();
        assert_eq!(reader.3[0][3], 0b010);
    }
}
