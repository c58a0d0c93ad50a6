//! CDF entries: certificate info (spec §3 "PKCS#15 object", §4.H).

use super::template::{self, decode_integer, decode_utf8_string, find_tag, integer, octet_string, utf8_string, DfEntry, Tlv};
use crate::error::Error;
use crate::path::{Path, PathKind};

const TAG_LABEL: u8 = template::TAG_UTF8_STRING;
const TAG_ID: u8 = template::TAG_OCTET_STRING;
const TAG_AUTHORITY: u8 = 0x80;
const TAG_PATH: u8 = 0x81;
const TAG_VALUE: u8 = 0x82;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CertificateInfo {
    pub label: String,
    pub id: Vec<u8>,
    pub authority: bool,
    pub path: Option<Path>,
    /// Inline DER certificate bytes, when not stored behind `path`.
    pub value: Option<Vec<u8>>,
}

impl CertificateInfo {
    pub fn new(label: impl Into<String>, id: Vec<u8>) -> Self {
        Self { label: label.into(), id, authority: false, path: None, value: None }
    }
}

impl DfEntry for CertificateInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        Ok(Self {
            label: find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?.unwrap_or_default(),
            id: find_tag(&items, TAG_ID).map(|t| t.value.clone()).unwrap_or_default(),
            authority: find_tag(&items, TAG_AUTHORITY).map(decode_integer).transpose()?.map(|v| v != 0).unwrap_or(false),
            path: find_tag(&items, TAG_PATH)
                .map(|t| Path { kind: PathKind::Path, bytes: t.value.clone(), aid: None, index: None, count: None }),
            value: find_tag(&items, TAG_VALUE).map(|t| t.value.clone()),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> = vec![
            utf8_string(TAG_LABEL, &self.label),
            octet_string(TAG_ID, &self.id),
            integer(TAG_AUTHORITY, self.authority as i32),
        ];
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
        let mut info = CertificateInfo::new("Signature cert", vec![0x45]);
        info.path = Some(Path::file_id(0x5017));
        let bytes = info.encode();
        assert_eq!(CertificateInfo::decode(&bytes).unwrap(), info);
    }
}
