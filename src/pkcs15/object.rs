//! PKCS#15 object (spec §3 "PKCS#15 object").

use crate::path::Path;

pub const MAX_LABEL_LEN: usize = 255;
pub const MAX_ACCESS_RULES: usize = 8;

/// Stable index into the [`super::graph::Pkcs15Card`] arena, replacing raw
/// `next`/`prev` pointers (spec §9 "Doubly-linked mutable object graph").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    PrivateKey,
    PublicKey,
    Certificate,
    Data,
    AuthPin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObjectFlags {
    pub private: bool,
    pub modifiable: bool,
    pub seen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessRule {
    pub acl_op: crate::acl::AclOp,
    pub auth_id: u8,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ObjectPayload {
    PrivateKey(super::asn1::prkdf::PrivateKeyInfo),
    PublicKey(super::asn1::pukdf::PublicKeyInfo),
    Certificate(super::asn1::cdf::CertificateInfo),
    Data(super::asn1::dodf::DataObjectInfo),
    AuthPin(super::asn1::aodf::AuthInfo),
}

/// One entry from a directory file (PrKDF/PuKDF/CDF/DODF/AODF), appended
/// to the card's object list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Object {
    pub kind: ObjectKind,
    pub label: String,
    pub flags: ObjectFlags,
    pub auth_id: Vec<u8>,
    pub access_rules: Vec<AccessRule>,
    pub user_consent: u8,
    pub content: Option<Vec<u8>>,
    pub payload: ObjectPayload,
    pub(super) prev: Option<ObjectId>,
    pub(super) next: Option<ObjectId>,
}

impl Object {
    pub fn new(kind: ObjectKind, label: impl Into<String>, payload: ObjectPayload) -> Self {
        let label = label.into();
        debug_assert!(label.len() <= MAX_LABEL_LEN);
        Self {
            kind,
            label,
            flags: ObjectFlags::default(),
            auth_id: Vec::new(),
            access_rules: Vec::new(),
            user_consent: 0,
            content: None,
            payload,
            prev: None,
            next: None,
        }
    }

    pub fn requires_user_consent(&self) -> bool {
        self.user_consent > 0
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.payload {
            ObjectPayload::PrivateKey(p) => p.path.as_ref(),
            ObjectPayload::PublicKey(p) => p.path.as_ref(),
            ObjectPayload::Certificate(c) => c.path.as_ref(),
            ObjectPayload::Data(d) => d.path.as_ref(),
            ObjectPayload::AuthPin(a) => a.path.as_ref(),
        }
    }
}
