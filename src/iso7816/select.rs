//! SELECT FILE (spec §4.F "SELECT FILE(path, want_fci)").

use super::fci::parse_fci;
use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::file::File;
use crate::path::{Path, PathKind};
use crate::reader::Reader;

const INS_SELECT: u8 = 0xA4;

/// A `PathKind::Path` value that is nothing but the MF id is the "bare MF"
/// case spec §4.F groups with file-ID selection (P1 `0`), not with the
/// multi-component absolute-path case (P1 `8`).
fn is_bare_mf(path: &Path) -> bool {
    path.kind == PathKind::Path && path.bytes == [0x3F, 0x00]
}

fn p1_for(path: &Path) -> u8 {
    match path.kind {
        PathKind::FileId => 0x00,
        PathKind::DfName => 0x04,
        PathKind::Path if is_bare_mf(path) => 0x00,
        PathKind::Path => 0x08,
    }
}

/// Strip a leading `3F00` (the MF) from an absolute path, per spec §4.F.
/// A bare `3F00` path is left untouched — it falls under `p1_for`'s
/// file-ID/bare-MF case and is sent as the 2-byte selector, not stripped
/// to nothing.
fn strip_mf_prefix(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= 2 && bytes[0] == 0x3F && bytes[1] == 0x00 && bytes.len() > 2 {
        &bytes[2..]
    } else {
        bytes
    }
}

/// SELECT FILE. Returns the parsed FCI when `want_fci` is set and the card
/// returned a `0x6F` template; otherwise `None` and only success/status is
/// observed. The FCI-return P2 (`0x02`) is always sent — `want_fci` only
/// controls whether the caller bothers to parse the response.
pub fn select_file(reader: &mut dyn Reader, path: &Path, want_fci: bool) -> Result<Option<File>, Error> {
    let selector: &[u8] = if path.kind == PathKind::Path { strip_mf_prefix(&path.bytes) } else { &path.bytes };
    let apdu = Apdu::case3_short(0x00, INS_SELECT, p1_for(path), 0x02, selector.to_vec());
    let resp = apdu::transmit(reader, &apdu)?;
    resp.classify()?;

    if want_fci && !resp.data.is_empty() {
        Ok(Some(parse_fci(&resp.data)?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct FixedReader(Vec<u8>, u8, u8, Vec<Vec<u8>>);
    impl Reader for FixedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
            self.3.push(apdu.to_vec());
            Ok(RawResponse { data: self.0.clone(), sw1: self.1, sw2: self.2 })
        }
        fn detect_card_presence(&mut self) -> CardPresence {
            CardPresence::Present
        }
        fn capabilities(&self) -> ReaderCaps {
            ReaderCaps::empty()
        }
        fn atr(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn s3_select_absolute_path_strips_mf() {
        let mut reader = FixedReader(vec![], 0x90, 0x00, vec![]);
        let path = Path::from_file_ids(&[0x3F00, 0x5015]).unwrap();
        select_file(&mut reader, &path, false).unwrap();
        assert_eq!(reader.3[0], vec![0x00, 0xA4, 0x08, 0x02, 0x02, 0x50, 0x15]);
    }

    #[test]
    fn s3_select_bare_mf_uses_p1_zero() {
        let mut reader = FixedReader(vec![], 0x90, 0x00, vec![]);
        let path = Path::from_file_ids(&[0x3F00]).unwrap();
        select_file(&mut reader, &path, false).unwrap();
        assert_eq!(reader.3[0], vec![0x00, 0xA4, 0x00, 0x02, 0x02, 0x3F, 0x00]);
    }

    #[test]
    fn parses_fci_when_requested() {
        let fci = vec![0x6F, 0x08, 0x83, 0x02, 0x50, 0x15, 0x80, 0x02, 0x00, 0x64];
        let mut reader = FixedReader(fci, 0x90, 0x00, vec![]);
        let path = Path::file_id(0x5015);
        let file = select_file(&mut reader, &path, true).unwrap().unwrap();
        assert_eq!(file.file_id, 0x5015);
    }
}
