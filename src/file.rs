//! Card file representation after SELECT (spec §3 "File (FCI)").

use crate::acl::{Acl, AclOp, ACL_OP_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FileType {
    Df,
    WorkingEf,
    InternalEf,
}

/// EF structure byte, bits 0-2 of the FCI descriptor (tag `0x82`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EfStructure {
    Transparent,
    LinearFixed,
    LinearFixedTlv,
    LinearVariable,
    LinearVariableTlv,
    Cyclic,
    CyclicTlv,
}

impl EfStructure {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0x01 => EfStructure::Transparent,
            0x02 => EfStructure::LinearFixed,
            0x03 => EfStructure::LinearFixedTlv,
            0x04 => EfStructure::LinearVariable,
            0x05 => EfStructure::LinearVariableTlv,
            0x06 => EfStructure::Cyclic,
            0x07 => EfStructure::CyclicTlv,
            _ => EfStructure::Transparent,
        }
    }
}

/// In-memory representation of a selected card file. Ownership replaces
/// the source's magic-word validity check (spec §9): a `File` that exists
/// is valid by construction, and there is no `File::free` — values are
/// dropped normally by Rust's ownership rules.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct File {
    pub file_id: u16,
    pub file_type: FileType,
    pub ef_structure: Option<EfStructure>,
    pub shareable: bool,
    pub size: u16,
    pub record_length: Option<u16>,
    pub record_count: Option<u16>,
    pub df_name: Option<Vec<u8>>,
    pub security_attr: Option<Vec<u8>>,
    pub proprietary_attr: Option<Vec<u8>>,
    pub type_attr: Option<Vec<u8>>,
    pub status: u8,
    acl: [Acl; ACL_OP_COUNT],
}

impl File {
    pub fn new(file_id: u16, file_type: FileType) -> Self {
        Self {
            file_id,
            file_type,
            ef_structure: None,
            shareable: false,
            size: 0,
            record_length: None,
            record_count: None,
            df_name: None,
            security_attr: None,
            proprietary_attr: None,
            type_attr: None,
            status: 0,
            acl: Default::default(),
        }
    }

    pub fn acl(&self, op: AclOp) -> &Acl {
        &self.acl[op as usize]
    }

    pub fn acl_mut(&mut self, op: AclOp) -> &mut Acl {
        &mut self.acl[op as usize]
    }

    /// Deep copy. Present for API parity with the source's `dup`; under
    /// ownership there is no partial-allocation failure mode to collapse
    /// (spec §4.B), this always succeeds.
    pub fn dup(&self) -> Self {
        self.clone()
    }
}

/// Decode the `0x82` file-descriptor byte (spec §4.F FCI parser).
pub fn decode_descriptor_byte(b: u8) -> (FileType, Option<EfStructure>, bool) {
    let shareable = b & 0x40 != 0;
    let category = (b >> 3) & 0x07;
    match category {
        0x07 => (FileType::Df, None, shareable),
        0x00 | 0x01 => (FileType::WorkingEf, Some(EfStructure::from_bits(b)), shareable),
        _ => (FileType::InternalEf, Some(EfStructure::from_bits(b)), shareable),
    }
}
