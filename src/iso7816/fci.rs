//! File Control Information TLV parser (spec §4.F "FCI parser").

use crate::error::{Error, ErrorKind};
use crate::file::{decode_descriptor_byte, File, FileType};

/// Walk a BER-TLV buffer, yielding `(tag, value)` pairs. Only used
/// internally by the FCI parser; nested/constructed tags are not
/// recursed into beyond what FCI actually nests (spec §4.F only lists
/// primitive tags).
fn iter_tlv(mut buf: &[u8]) -> Vec<(u8, &[u8])> {
    let mut out = Vec::new();
    while !buf.is_empty() {
        let tag = buf[0];
        if buf.len() < 2 {
            break;
        }
        let len = buf[1] as usize;
        if buf.len() < 2 + len {
            break;
        }
        out.push((tag, &buf[2..2 + len]));
        buf = &buf[2 + len..];
    }
    out
}

/// Parse a SELECT FILE response beginning with the FCI template tag
/// `0x6F`. Unknown tags are ignored (spec §4.F).
pub fn parse_fci(bytes: &[u8]) -> Result<File, Error> {
    if bytes.is_empty() || bytes[0] != 0x6F {
        return Err(ErrorKind::Internal.into());
    }
    if bytes.len() < 2 {
        return Err(ErrorKind::Internal.into());
    }
    let inner_len = bytes[1] as usize;
    let inner = &bytes[2..(2 + inner_len).min(bytes.len())];

    let mut file = File::new(0, FileType::WorkingEf);
    for (tag, value) in iter_tlv(inner) {
        match tag {
            0x83 if value.len() >= 2 => {
                file.file_id = u16::from_be_bytes([value[0], value[1]]);
            }
            0x81 | 0x80 if value.len() >= 2 => {
                file.size = u16::from_be_bytes([value[0], value[1]]);
            }
            0x82 if !value.is_empty() => {
                let (ftype, ef_structure, shareable) = decode_descriptor_byte(value[0]);
                file.file_type = ftype;
                file.ef_structure = ef_structure;
                file.shareable = shareable;
                if value.len() >= 3 {
                    file.record_length = Some(u16::from_be_bytes([0, value[2]]));
                }
                if value.len() >= 5 {
                    file.record_count = Some(u16::from_be_bytes([0, value[4]]));
                }
            }
            0x84 => {
                file.df_name = Some(value.to_vec());
            }
            0x85 | 0xA5 => {
                file.proprietary_attr = Some(value.to_vec());
            }
            0x86 => {
                file.security_attr = Some(value.to_vec());
            }
            _ => {}
        }
    }
    Ok(file)
}
