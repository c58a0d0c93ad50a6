//! Error taxonomy shared by every layer of the crate (spec §7).

use thiserror::Error;

/// Abstract error kind. Status words are classified into these once, at
/// the APDU boundary (§4.E), and the classification never changes as the
/// error propagates back up through the command set and PKCS#15 layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    InvalidArguments,
    OutOfMemory,
    BufferTooSmall,
    NotSupported,
    FileNotFound,
    RecordNotFound,
    WrongLength,
    PinIncorrect,
    AuthMethodBlocked,
    SecurityStatusNotSatisfied,
    CmdTooLong,
    UnknownReply,
    TransmitFailed,
    Internal,
}

/// A classified error plus whatever extra context the layer that raised it
/// could attach. `tries_left` is only ever set for [`ErrorKind::PinIncorrect`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind:?}{}{}", tries_left.map(|t| format!(" (tries_left={t})")).unwrap_or_default(), sw.map(|(a,b)| format!(" [sw={a:02X}{b:02X}]")).unwrap_or_default())]
pub struct Error {
    pub kind: ErrorKind,
    pub tries_left: Option<u8>,
    pub sw: Option<(u8, u8)>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, tries_left: None, sw: None }
    }

    pub fn with_tries_left(kind: ErrorKind, tries_left: u8) -> Self {
        Self { kind, tries_left: Some(tries_left), sw: None }
    }

    pub fn with_sw(kind: ErrorKind, sw1: u8, sw2: u8) -> Self {
        Self { kind, tries_left: None, sw: Some((sw1, sw2)) }
    }

    pub fn is_pin_incorrect(&self) -> bool {
        self.kind == ErrorKind::PinIncorrect
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_incorrect_carries_tries_left() {
        let e = Error::with_tries_left(ErrorKind::PinIncorrect, 3);
        assert!(e.is_pin_incorrect());
        assert_eq!(e.tries_left, Some(3));
    }
}
