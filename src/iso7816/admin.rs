//! CREATE FILE / DELETE FILE (spec §4.F).

use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::file::File;
use crate::reader::Reader;

const INS_CREATE_FILE: u8 = 0xE0;
const INS_DELETE_FILE: u8 = 0xE4;

/// Construct the FCI bytes CREATE FILE needs from a [`File`] template.
/// Only the tags this crate parses on the way in (spec §4.F) are emitted
/// on the way out: `0x83` file id, `0x80` size, `0x82` descriptor byte.
fn build_fci(file: &File) -> Vec<u8> {
    let id = file.file_id.to_be_bytes();
    let mut inner = vec![0x83, 0x02, id[0], id[1]];
    let size = file.size.to_be_bytes();
    inner.extend_from_slice(&[0x80, 0x02, size[0], size[1]]);
    if let Some(structure) = file.ef_structure {
        let bits = match structure {
            crate::file::EfStructure::Transparent => 0x01,
            crate::file::EfStructure::LinearFixed => 0x02,
            crate::file::EfStructure::LinearFixedTlv => 0x03,
            crate::file::EfStructure::LinearVariable => 0x04,
            crate::file::EfStructure::LinearVariableTlv => 0x05,
            crate::file::EfStructure::Cyclic => 0x06,
            crate::file::EfStructure::CyclicTlv => 0x07,
        };
        inner.extend_from_slice(&[0x82, 0x01, bits]);
    }
    let mut out = vec![0x6F, inner.len() as u8];
    out.extend_from_slice(&inner);
    out
}

pub fn create_file(reader: &mut dyn Reader, file: &File) -> Result<(), Error> {
    let apdu = Apdu::case3_short(0x00, INS_CREATE_FILE, 0x00, 0x00, build_fci(file));
    apdu::transmit(reader, &apdu)?.classify()
}

pub fn delete_file(reader: &mut dyn Reader, file_id: u16) -> Result<(), Error> {
    let id = file_id.to_be_bytes();
    let apdu = Apdu::case3_short(0x00, INS_DELETE_FILE, 0x00, 0x00, id.to_vec());
    apdu::transmit(reader, &apdu)?.classify()
}
