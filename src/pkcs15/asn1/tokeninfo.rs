//! TokenInfo: the card-level descriptor read from EF(TokenInfo) before any
//! directory file is walked (spec §3 "Card / token").

use super::template::{self, decode_integer, decode_utf8_string, find_tag, integer, octet_string, utf8_string, DfEntry, Tlv};
use crate::error::Error;

const TAG_VERSION: u8 = template::TAG_INTEGER;
const TAG_SERIAL_NUMBER: u8 = template::TAG_OCTET_STRING;
const TAG_MANUFACTURER_ID: u8 = 0x0D;
const TAG_LABEL: u8 = 0x80;
const TAG_FLAGS: u8 = 0x81;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenInfo {
    pub version: u8,
    pub serial_number: Vec<u8>,
    pub manufacturer_id: Option<String>,
    pub label: Option<String>,
    /// Bit 0: read-only. Bit 1: login required. Bit 2: PRN generation.
    /// Bit 3: EID compliant (spec §3 Open Question default).
    pub flags: u16,
}

impl TokenInfo {
    pub fn is_read_only(&self) -> bool {
        self.flags & 0x01 != 0
    }
}

impl DfEntry for TokenInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        Ok(Self {
            version: find_tag(&items, TAG_VERSION).map(decode_integer).transpose()?.unwrap_or(0) as u8,
            serial_number: find_tag(&items, TAG_SERIAL_NUMBER).map(|t| t.value.clone()).unwrap_or_default(),
            manufacturer_id: find_tag(&items, TAG_MANUFACTURER_ID).map(decode_utf8_string).transpose()?,
            label: find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?,
            flags: find_tag(&items, TAG_FLAGS).map(decode_integer).transpose()?.unwrap_or(0) as u16,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> =
            vec![integer(TAG_VERSION, self.version as i32), octet_string(TAG_SERIAL_NUMBER, &self.serial_number)];
        if let Some(manufacturer) = &self.manufacturer_id {
            items.push(utf8_string(TAG_MANUFACTURER_ID, manufacturer));
        }
        if let Some(label) = &self.label {
            items.push(utf8_string(TAG_LABEL, label));
        }
        items.push(integer(TAG_FLAGS, self.flags as i32));
        template::encode_sequence(&items)
    }
}
