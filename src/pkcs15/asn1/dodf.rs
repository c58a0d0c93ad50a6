//! DODF entries: opaque data objects (spec §3 "PKCS#15 object", §4.H).

use super::template::{self, decode_oid, decode_utf8_string, encode_oid, find_tag, octet_string, utf8_string, DfEntry, Tlv};
use crate::error::Error;
use crate::path::{Path, PathKind};

const TAG_LABEL: u8 = template::TAG_UTF8_STRING;
const TAG_APP_NAME: u8 = 0x0D;
const TAG_APP_OID: u8 = 0x06;
const TAG_PATH: u8 = 0x80;
const TAG_VALUE: u8 = 0x81;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataObjectInfo {
    pub label: String,
    pub app_name: Option<String>,
    pub app_oid: Option<const_oid::ObjectIdentifier>,
    pub path: Option<Path>,
    pub value: Option<Vec<u8>>,
}

impl DataObjectInfo {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), app_name: None, app_oid: None, path: None, value: None }
    }
}

impl DfEntry for DataObjectInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        Ok(Self {
            label: find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?.unwrap_or_default(),
            app_name: find_tag(&items, TAG_APP_NAME).map(decode_utf8_string).transpose()?,
            app_oid: find_tag(&items, TAG_APP_OID).map(decode_oid).transpose()?,
            path: find_tag(&items, TAG_PATH)
                .map(|t| Path { kind: PathKind::Path, bytes: t.value.clone(), aid: None, index: None, count: None }),
            value: find_tag(&items, TAG_VALUE).map(|t| t.value.clone()),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> = vec![utf8_string(TAG_LABEL, &self.label)];
        if let Some(name) = &self.app_name {
            items.push(utf8_string(TAG_APP_NAME, name));
        }
        if let Some(oid) = &self.app_oid {
            items.push(encode_oid(TAG_APP_OID, oid));
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
        let mut info = DataObjectInfo::new("Card holder photo");
        info.app_name = Some("Photo".into());
        info.path = Some(Path::file_id(0x5018));
        let bytes = info.encode();
        assert_eq!(DataObjectInfo::decode(&bytes).unwrap(), info);
    }

    #[test]
    fn oid_round_trips() {
        let oid = const_oid::ObjectIdentifier::new("1.2.840.113549.1.1.1").unwrap();
        let mut info = DataObjectInfo::new("x");
        info.app_oid = Some(oid);
        let bytes = info.encode();
        assert_eq!(DataObjectInfo::decode(&bytes).unwrap().app_oid, Some(oid));
    }
}
