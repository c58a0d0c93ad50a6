//! Card file path model (spec §3 "Path", §4.B).

use crate::error::{Error, ErrorKind};

pub const MAX_PATH_LEN: usize = 16;
pub const MAX_AID_LEN: usize = 16;

/// Selection discriminant (ISO 7816-4 §7.1.1, P1 of SELECT FILE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PathKind {
    FileId,
    DfName,
    Path,
}

/// A card file path. `bytes` holds the selector payload: two bytes for
/// [`PathKind::FileId`], up to 16 for [`PathKind::DfName`], or a
/// concatenation of 2-byte file ids for [`PathKind::Path`]. `aid` is an
/// optional application-identifier prefix for PKCS#15 applications not
/// rooted at `3F00`. `index`/`count` are ranged-read hints and do not
/// participate in equality or prefix comparison.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Path {
    pub kind: PathKind,
    pub bytes: Vec<u8>,
    pub aid: Option<Vec<u8>>,
    pub index: Option<usize>,
    pub count: Option<usize>,
}

impl Path {
    pub fn file_id(id: u16) -> Self {
        Self { kind: PathKind::FileId, bytes: id.to_be_bytes().to_vec(), aid: None, index: None, count: None }
    }

    pub fn df_name(aid: &[u8]) -> Result<Self, Error> {
        if aid.len() > MAX_AID_LEN {
            return Err(ErrorKind::InvalidArguments.into());
        }
        Ok(Self { kind: PathKind::DfName, bytes: aid.to_vec(), aid: None, index: None, count: None })
    }

    pub fn from_file_ids(ids: &[u16]) -> Result<Self, Error> {
        let mut bytes = Vec::with_capacity(ids.len() * 2);
        for id in ids {
            bytes.extend_from_slice(&id.to_be_bytes());
        }
        if bytes.len() > MAX_PATH_LEN {
            return Err(ErrorKind::InvalidArguments.into());
        }
        Ok(Self { kind: PathKind::Path, bytes, aid: None, index: None, count: None })
    }

    pub fn with_range(mut self, index: usize, count: usize) -> Self {
        self.index = Some(index);
        self.count = Some(count);
        self
    }

    pub fn with_aid(mut self, aid: &[u8]) -> Result<Self, Error> {
        if aid.len() > MAX_AID_LEN {
            return Err(ErrorKind::InvalidArguments.into());
        }
        self.aid = Some(aid.to_vec());
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append `other` onto `self`. Fails if the combined length exceeds 16
    /// bytes or either side is `DF_NAME` (spec §3 invariant).
    pub fn concat(&self, other: &Path) -> Result<Path, Error> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.kind == PathKind::DfName || other.kind == PathKind::DfName {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let total = self.bytes.len() + other.bytes.len();
        if total > MAX_PATH_LEN {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let mut bytes = self.bytes.clone();
        bytes.extend_from_slice(&other.bytes);
        Ok(Path { kind: PathKind::Path, bytes, aid: self.aid.clone(), index: None, count: None })
    }

    /// True iff `prefix` is no longer than `self` and its bytes match the
    /// leading bytes of `self`. The AID prefix is not considered.
    pub fn compare_path_prefix(prefix: &Path, path: &Path) -> bool {
        prefix.bytes.len() <= path.bytes.len() && path.bytes.starts_with(&prefix.bytes)
    }

    /// `aid::hex` when an AID is present, else `hex` with a trailing `::`
    /// for a bare `DF_NAME` (spec §4.B).
    pub fn print_path(&self) -> String {
        let hex = crate::bytes::bin_to_hex(&self.bytes);
        match (&self.aid, self.kind) {
            (Some(aid), _) => format!("{}::{}", crate::bytes::bin_to_hex(aid), hex),
            (None, PathKind::DfName) => format!("{hex}::"),
            (None, _) => hex,
        }
    }

    /// Parse an accepted on-wire format: optional leading `i`/`I` marks
    /// [`PathKind::FileId`], followed by hex digits with optional `:` or
    /// space separators (spec §4.B).
    pub fn parse_path(s: &str) -> Result<Self, Error> {
        let (force_file_id, rest) = match s.chars().next() {
            Some('i') | Some('I') => (true, &s[1..]),
            _ => (false, s),
        };
        let bytes = crate::bytes::hex_to_bin(rest)?;
        if bytes.len() > MAX_PATH_LEN {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let kind = if force_file_id || bytes.len() == 2 { PathKind::FileId } else { PathKind::Path };
        Ok(Self { kind, bytes, aid: None, index: None, count: None })
    }
}
