//! PrKDF entries: private key info (spec §3 "PKCS#15 object", §4.H).

use super::template::{self, decode_integer, decode_utf8_string, find_tag, integer, octet_string, utf8_string, DfEntry, Tlv};
use crate::error::Error;
use crate::path::{Path, PathKind};

const TAG_LABEL: u8 = template::TAG_UTF8_STRING;
const TAG_ID: u8 = template::TAG_OCTET_STRING;
const TAG_USAGE: u8 = 0x80;
const TAG_NATIVE: u8 = 0x81;
const TAG_KEY_REFERENCE: u8 = 0x82;
const TAG_MODULUS_BITS: u8 = 0x83;
const TAG_PATH: u8 = 0x84;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrivateKeyInfo {
    pub label: String,
    pub id: Vec<u8>,
    pub usage: u16,
    pub native: bool,
    pub key_reference: u8,
    pub modulus_bits: Option<u16>,
    pub path: Option<Path>,
}

impl PrivateKeyInfo {
    pub fn new(label: impl Into<String>, id: Vec<u8>, key_reference: u8) -> Self {
        Self { label: label.into(), id, usage: 0, native: true, key_reference, modulus_bits: None, path: None }
    }
}

impl DfEntry for PrivateKeyInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        Ok(Self {
            label: find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?.unwrap_or_default(),
            id: find_tag(&items, TAG_ID).map(|t| t.value.clone()).unwrap_or_default(),
            usage: find_tag(&items, TAG_USAGE).map(decode_integer).transpose()?.unwrap_or(0) as u16,
            native: find_tag(&items, TAG_NATIVE).map(decode_integer).transpose()?.map(|v| v != 0).unwrap_or(true),
            key_reference: find_tag(&items, TAG_KEY_REFERENCE).map(decode_integer).transpose()?.unwrap_or(0) as u8,
            modulus_bits: find_tag(&items, TAG_MODULUS_BITS).map(decode_integer).transpose()?.map(|v| v as u16),
            path: find_tag(&items, TAG_PATH)
                .map(|t| Path { kind: PathKind::Path, bytes: t.value.clone(), aid: None, index: None, count: None }),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> = vec![
            utf8_string(TAG_LABEL, &self.label),
            octet_string(TAG_ID, &self.id),
            integer(TAG_USAGE, self.usage as i32),
            integer(TAG_NATIVE, self.native as i32),
            integer(TAG_KEY_REFERENCE, self.key_reference as i32),
        ];
        if let Some(bits) = self.modulus_bits {
            items.push(integer(TAG_MODULUS_BITS, bits as i32));
        }
        if let Some(path) = &self.path {
            items.push(octet_string(TAG_PATH, &path.bytes));
        }
        template::encode_sequence(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut info = PrivateKeyInfo::new("Signature key", vec![0x45], 0x81);
        info.modulus_bits = Some(2048);
        info.path = Some(Path::file_id(0x5015));
        let bytes = info.encode();
        assert_eq!(PrivateKeyInfo::decode(&bytes).unwrap(), info);
    }
}
