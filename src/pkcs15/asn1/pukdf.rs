//! PuKDF entries: public key info (spec §3 "PKCS#15 object", §4.H).

use super::template::{self, decode_integer, decode_utf8_string, find_tag, integer, octet_string, utf8_string, DfEntry, Tlv};
use crate::error::Error;
use crate::path::{Path, PathKind};

const TAG_LABEL: u8 = template::TAG_UTF8_STRING;
const TAG_ID: u8 = template::TAG_OCTET_STRING;
const TAG_USAGE: u8 = 0x80;
const TAG_MODULUS_BITS: u8 = 0x81;
const TAG_PATH: u8 = 0x82;
const TAG_VALUE: u8 = 0x83;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PublicKeyInfo {
    pub label: String,
    pub id: Vec<u8>,
    pub usage: u16,
    pub modulus_bits: Option<u16>,
    pub path: Option<Path>,
    /// Inline DER-encoded `SubjectPublicKeyInfo`, when the key is stored
    /// directly in the directory file rather than referenced by path.
    pub value: Option<Vec<u8>>,
}

impl PublicKeyInfo {
    pub fn new(label: impl Into<String>, id: Vec<u8>) -> Self {
        Self { label: label.into(), id, usage: 0, modulus_bits: None, path: None, value: None }
    }
}

impl DfEntry for PublicKeyInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        Ok(Self {
            label: find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?.unwrap_or_default(),
            id: find_tag(&items, TAG_ID).map(|t| t.value.clone()).unwrap_or_default(),
            usage: find_tag(&items, TAG_USAGE).map(decode_integer).transpose()?.unwrap_or(0) as u16,
            modulus_bits: find_tag(&items, TAG_MODULUS_BITS).map(decode_integer).transpose()?.map(|v| v as u16),
            path: find_tag(&items, TAG_PATH)
                .map(|t| Path { kind: PathKind::Path, bytes: t.value.clone(), aid: None, index: None, count: None }),
            value: find_tag(&items, TAG_VALUE).map(|t| t.value.clone()),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> = vec![
            utf8_string(TAG_LABEL, &self.label),
            octet_string(TAG_ID, &self.id),
            integer(TAG_USAGE, self.usage as i32),
        ];
        if let Some(bits) = self.modulus_bits {
            items.push(integer(TAG_MODULUS_BITS, bits as i32));
        }
        if let Some(path) = &self.path {
            items.push(octet_string(TAG_PATH, &path.bytes));
        }
        if let Some(value) = &self.value {
            items.push(octet_string(TAG_VALUE, value));
        }
        template::encode_sequence(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut info = PublicKeyInfo::new("Signature key", vec![0x45]);
        info.modulus_bits = Some(2048);
        info.path = Some(Path::file_id(0x5016));
        let bytes = info.encode();
        assert_eq!(PublicKeyInfo::decode(&bytes).unwrap(), info);
    }
}
