//! AODF entries: authentication objects (spec §3 "Authentication info
//! (PIN)").

use super::template::{
    self, decode_integer, decode_utf8_string, find_tag, integer, octet_string, utf8_string, DfEntry, Tlv,
};
use crate::error::{Error, ErrorKind};
use crate::path::Path;

const TAG_LABEL: u8 = template::TAG_UTF8_STRING;
const TAG_AUTH_ID: u8 = template::TAG_OCTET_STRING;
const TAG_PIN_FLAGS: u8 = 0x80;
const TAG_PIN_TYPE: u8 = 0x81;
const TAG_MIN_LENGTH: u8 = 0x82;
const TAG_STORED_LENGTH: u8 = 0x83;
const TAG_MAX_LENGTH: u8 = 0x84;
const TAG_PIN_REFERENCE: u8 = 0x85;
const TAG_PATH: u8 = 0x86;
const TAG_PAD_CHAR: u8 = 0x87;
const TAG_TRIES_LEFT: u8 = 0x88;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PinType {
    Bcd,
    Ascii,
    Utf8,
    HalfNibble,
}

impl PinType {
    fn to_code(self) -> i32 {
        match self {
            PinType::Bcd => 0,
            PinType::Ascii => 1,
            PinType::Utf8 => 2,
            PinType::HalfNibble => 3,
        }
    }

    fn from_code(code: i32) -> Result<Self, Error> {
        Ok(match code {
            0 => PinType::Bcd,
            1 => PinType::Ascii,
            2 => PinType::Utf8,
            3 => PinType::HalfNibble,
            _ => return Err(ErrorKind::InvalidArguments.into()),
        })
    }
}

/// A PIN's static attributes, as they appear in the AODF. `pin_reference`
/// and `max_length` have already been through the normalization spec §3
/// requires: a legacy negatively-encoded reference is folded back into
/// range by adding 256, and an absent `max_length` is given the default
/// the PKCS#15 v1.1 profile implies (card max if known, otherwise twice
/// `stored_length` for a BCD-encoded PIN, else `stored_length`, else 8).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuthInfo {
    pub label: String,
    pub auth_id: Vec<u8>,
    pub pin_flags: u16,
    pub pin_type: PinType,
    pub min_length: u8,
    pub stored_length: u8,
    pub max_length: u8,
    pub pin_reference: u16,
    pub path: Option<Path>,
    pub pad_char: Option<u8>,
    pub tries_left: Option<u8>,
}

fn normalize_reference(raw: i32) -> u16 {
    let adjusted = if raw < 0 { raw + 256 } else { raw };
    adjusted.clamp(0, 255) as u16
}

fn default_max_length(pin_type: PinType, stored_length: u8, card_max: Option<u8>) -> u8 {
    if let Some(max) = card_max {
        return max;
    }
    match pin_type {
        PinType::Bcd => stored_length.saturating_mul(2),
        _ if stored_length > 0 => stored_length,
        _ => 8,
    }
}

impl AuthInfo {
    pub fn new(label: impl Into<String>, pin_type: PinType, pin_reference: u16, stored_length: u8) -> Self {
        Self {
            label: label.into(),
            auth_id: Vec::new(),
            pin_flags: 0,
            pin_type,
            min_length: 4,
            stored_length,
            max_length: default_max_length(pin_type, stored_length, None),
            pin_reference,
            path: None,
            pad_char: None,
            tries_left: None,
        }
    }
}

impl DfEntry for AuthInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let items = template::parse_sequence(bytes)?;
        let label = find_tag(&items, TAG_LABEL).map(decode_utf8_string).transpose()?.unwrap_or_default();
        let auth_id = find_tag(&items, TAG_AUTH_ID).map(|t| t.value.clone()).unwrap_or_default();
        let pin_flags = find_tag(&items, TAG_PIN_FLAGS).map(decode_integer).transpose()?.unwrap_or(0) as u16;
        let pin_type = find_tag(&items, TAG_PIN_TYPE)
            .map(decode_integer)
            .transpose()?
            .map(PinType::from_code)
            .transpose()?
            .unwrap_or(PinType::Utf8);
        let min_length = find_tag(&items, TAG_MIN_LENGTH).map(decode_integer).transpose()?.unwrap_or(0) as u8;
        let stored_length = find_tag(&items, TAG_STORED_LENGTH).map(decode_integer).transpose()?.unwrap_or(0) as u8;
        let raw_reference = find_tag(&items, TAG_PIN_REFERENCE)
            .map(decode_integer)
            .transpose()?
            .ok_or(Error::from(ErrorKind::InvalidArguments))?;
        let pin_reference = normalize_reference(raw_reference);
        let card_max = find_tag(&items, TAG_MAX_LENGTH).map(decode_integer).transpose()?.map(|v| v as u8);
        let max_length = default_max_length(pin_type, stored_length, card_max);
        let path = find_tag(&items, TAG_PATH).map(|t| crate::path::Path {
            kind: crate::path::PathKind::Path,
            bytes: t.value.clone(),
            aid: None,
            index: None,
            count: None,
        });
        let pad_char = find_tag(&items, TAG_PAD_CHAR).map(|t| t.value.first().copied()).flatten();
        let tries_left = find_tag(&items, TAG_TRIES_LEFT).map(decode_integer).transpose()?.map(|v| v as u8);

        Ok(Self {
            label,
            auth_id,
            pin_flags,
            pin_type,
            min_length,
            stored_length,
            max_length,
            pin_reference,
            path,
            pad_char,
            tries_left,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Tlv> = vec![
            utf8_string(TAG_LABEL, &self.label),
            octet_string(TAG_AUTH_ID, &self.auth_id),
            integer(TAG_PIN_FLAGS, self.pin_flags as i32),
            integer(TAG_PIN_TYPE, self.pin_type.to_code()),
            integer(TAG_MIN_LENGTH, self.min_length as i32),
            integer(TAG_STORED_LENGTH, self.stored_length as i32),
            integer(TAG_MAX_LENGTH, self.max_length as i32),
            integer(TAG_PIN_REFERENCE, self.pin_reference as i32),
        ];
        if let Some(path) = &self.path {
            items.push(octet_string(TAG_PATH, &path.bytes));
        }
        if let Some(pad) = self.pad_char {
            items.push(octet_string(TAG_PAD_CHAR, &[pad]));
        }
        if let Some(tries) = self.tries_left {
            items.push(integer(TAG_TRIES_LEFT, tries as i32));
        }
        template::encode_sequence(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut info = AuthInfo::new("User PIN", PinType::Utf8, 0x01, 4);
        info.auth_id = vec![0x01];
        info.tries_left = Some(3);
        let encoded = info.encode();
        let decoded = AuthInfo::decode(&encoded).unwrap();
        assert_eq!(decoded, info);
    }

    #[test]
    fn legacy_negative_reference_is_normalized() {
        let items = vec![
            utf8_string(TAG_LABEL, "PIN"),
            octet_string(TAG_AUTH_ID, &[0x01]),
            integer(TAG_PIN_FLAGS, 0),
            integer(TAG_PIN_TYPE, 2),
            integer(TAG_MIN_LENGTH, 4),
            integer(TAG_STORED_LENGTH, 8),
            integer(TAG_MAX_LENGTH, 8),
            integer(TAG_PIN_REFERENCE, -127),
        ];
        let bytes = template::encode_sequence(&items);
        let decoded = AuthInfo::decode(&bytes).unwrap();
        assert_eq!(decoded.pin_reference, 129);
    }

    #[test]
    fn bcd_default_max_length_doubles_stored_length() {
        let info = AuthInfo::new("PIN", PinType::Bcd, 1, 4);
        assert_eq!(info.max_length, 8);
    }

    #[test]
    fn missing_pin_reference_is_an_error() {
        let items = vec![utf8_string(TAG_LABEL, "PIN")];
        let bytes = template::encode_sequence(&items);
        assert!(AuthInfo::decode(&bytes).is_err());
    }
}
