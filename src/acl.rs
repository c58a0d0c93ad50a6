//! Access-control list chains (spec §3 "ACL entry", §4.B "add_acl_entry").

/// One link in an ACL chain: an authentication method plus the key/PIN
/// reference it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AclEntry {
    pub method: AclMethod,
    pub key_ref: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AclMethod {
    Chv,
    Key,
    Terminal,
    ProtectedAuth,
}

/// The ACL for a single operation (e.g. READ, UPDATE). A chain of length
/// zero is one of three sentinel states, kept distinguishable from a real
/// chain by construction rather than by magic pointer values (spec §3,
/// §9 "Sentinel pointers in ACL").
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Acl {
    /// The operation is never permitted.
    Never,
    /// No condition is set (distinct from "never" — callers may still
    /// attempt it and let the card decide).
    #[default]
    None,
    /// The ACL could not be determined from the FCI.
    Unknown,
    /// One or more real entries, in the order they must be satisfied.
    Chain(Vec<AclEntry>),
}

impl Acl {
    /// Add a real entry to this chain. A `Never` chain silently drops the
    /// addition; a `None`/`Unknown` chain becomes a fresh one-entry chain;
    /// adding a duplicate (same method + key_ref) is a no-op (spec §3).
    pub fn add_acl_entry(&mut self, method: AclMethod, key_ref: u8) {
        match self {
            Acl::Never => {}
            Acl::None | Acl::Unknown => {
                *self = Acl::Chain(vec![AclEntry { method, key_ref }]);
            }
            Acl::Chain(entries) => {
                if !entries.iter().any(|e| e.method == method && e.key_ref == key_ref) {
                    entries.push(AclEntry { method, key_ref });
                }
            }
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Acl::Never)
    }

    pub fn entries(&self) -> &[AclEntry] {
        match self {
            Acl::Chain(v) => v,
            _ => &[],
        }
    }
}

/// Fixed set of file operations an ACL array is indexed by (spec §3
/// "an ACL array indexed by operation").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AclOp {
    ReadBinary,
    UpdateBinary,
    WriteBinary,
    ReadRecord,
    UpdateRecord,
    WriteRecord,
    AppendRecord,
    DeleteFile,
    CreateFile,
    Invalidate,
    Rehabilitate,
    Administer,
}

pub const ACL_OP_COUNT: usize = 12;
