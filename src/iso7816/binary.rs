//! READ/WRITE/UPDATE/APPEND BINARY (spec §4.F).

use crate::apdu::{self, Apdu};
use crate::error::{Error, ErrorKind};
use crate::reader::Reader;

const INS_READ_BINARY: u8 = 0xB0;
const INS_WRITE_BINARY: u8 = 0xD0;
const INS_UPDATE_BINARY: u8 = 0xD6;

/// Maximum bytes of outbound or inbound data that fit in one short-form
/// APDU. Longer reads/writes must be chunked by the caller (spec §4.F).
pub const APDU_CHOP_SIZE: usize = 255;

fn offset_p1p2(offset: u16) -> (u8, u8) {
    // High bit of P1 is reserved (must be 0) when addressing by offset.
    let bytes = (offset & 0x7FFF).to_be_bytes();
    (bytes[0], bytes[1])
}

pub fn read_binary(reader: &mut dyn Reader, offset: u16, count: usize) -> Result<Vec<u8>, Error> {
    if count > 256 {
        return Err(ErrorKind::CmdTooLong.into());
    }
    let (p1, p2) = offset_p1p2(offset);
    let apdu = Apdu::case2_short(0x00, INS_READ_BINARY, p1, p2, count);
    let resp = apdu::transmit(reader, &apdu)?;
    resp.classify()?;
    Ok(resp.data)
}

pub fn write_binary(reader: &mut dyn Reader, offset: u16, data: &[u8]) -> Result<(), Error> {
    if data.len() > APDU_CHOP_SIZE {
        return Err(ErrorKind::CmdTooLong.into());
    }
    let (p1, p2) = offset_p1p2(offset);
    let apdu = Apdu::case3_short(0x00, INS_WRITE_BINARY, p1, p2, data.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}

pub fn update_binary(reader: &mut dyn Reader, offset: u16, data: &[u8]) -> Result<(), Error> {
    if data.len() > APDU_CHOP_SIZE {
        return Err(ErrorKind::CmdTooLong.into());
    }
    let (p1, p2) = offset_p1p2(offset);
    let apdu = Apdu::case3_short(0x00, INS_UPDATE_BINARY, p1, p2, data.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}
