//! The PKCS#15 object graph (spec §4.G, §9 "Doubly-linked mutable object
//! graph"). Objects live in an arena (`Vec<Option<Object>>`); what was a
//! doubly-linked list of heap nodes in the source becomes a doubly-linked
//! list of stable [`ObjectId`] indices, so there is no raw pointer whose
//! validity a caller has to reason about.

use super::asn1::{aodf::AuthInfo, cdf::CertificateInfo, dodf::DataObjectInfo, prkdf::PrivateKeyInfo, pukdf::PublicKeyInfo, tokeninfo::TokenInfo, DfEntry};
use super::object::{Object, ObjectFlags, ObjectId, ObjectKind, ObjectPayload};
use crate::cache::FileCache;
use crate::config::Config;
use crate::driver::Driver;
use crate::error::{Error, ErrorKind};
use crate::path::Path;
use crate::reader::Reader;

const EF_DIR: u16 = 0x2F00;
const EF_ODF: u16 = 0x5031;
const EF_TOKEN_INFO: u16 = 0x5032;

/// One directory-file kind the ODF points at (spec §3 "Directory file").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfKind {
    PrKDF,
    PuKDF,
    CDF,
    DODF,
    AODF,
}

const ODF_TAGS: [(u8, DfKind); 5] =
    [(0xA0, DfKind::PrKDF), (0xA1, DfKind::PuKDF), (0xA4, DfKind::CDF), (0xA5, DfKind::DODF), (0xA8, DfKind::AODF)];

/// Search criteria for [`Pkcs15Card::search_objects`] (spec §4.G). Every
/// populated field narrows the result; an absent field imposes no
/// constraint.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub class_mask: Option<Vec<ObjectKind>>,
    pub id: Option<Vec<u8>>,
    pub app_oid: Option<const_oid::ObjectIdentifier>,
    pub path: Option<Path>,
    pub usage_mask: Option<u16>,
    pub usage_value: Option<u16>,
    pub flags_private: Option<bool>,
    pub reference: Option<u8>,
    pub label: Option<String>,
    pub app_label: Option<String>,
}

impl SearchFilter {
    pub fn matches(&self, obj: &Object) -> bool {
        if let Some(mask) = &self.class_mask {
            if !mask.contains(&obj.kind) {
                return false;
            }
        }
        if let Some(private) = self.flags_private {
            if obj.flags.private != private {
                return false;
            }
        }
        if let Some(label) = &self.label {
            if &obj.label != label {
                return false;
            }
        }
        let (id, usage, reference, app_oid, app_label) = match &obj.payload {
            ObjectPayload::PrivateKey(p) => (Some(&p.id), Some(p.usage), Some(p.key_reference), None, None),
            ObjectPayload::PublicKey(p) => (Some(&p.id), Some(p.usage), None, None, None),
            ObjectPayload::Certificate(c) => (Some(&c.id), None, None, None, None),
            ObjectPayload::Data(d) => (None, None, None, d.app_oid.as_ref(), d.app_name.as_deref()),
            ObjectPayload::AuthPin(a) => (Some(&a.auth_id), None, Some(a.pin_reference as u8), None, None),
        };
        if let Some(want) = &self.id {
            if id != Some(want) {
                return false;
            }
        }
        if let Some(want) = self.reference {
            if reference != Some(want) {
                return false;
            }
        }
        if let Some(want) = &self.app_oid {
            if app_oid != Some(want) {
                return false;
            }
        }
        if let Some(want) = &self.app_label {
            if app_label != Some(want.as_str()) {
                return false;
            }
        }
        if let (Some(mask), Some(usage)) = (self.usage_mask, usage) {
            let value = self.usage_value.unwrap_or(mask);
            if usage & mask != value & mask {
                return false;
            }
        }
        true
    }
}

/// The card aggregate: bound file handles, loaded objects, and the
/// options that gate caching (spec §4.G "Pkcs15Card").
pub struct Pkcs15Card {
    objects: Vec<Option<Object>>,
    head: Option<ObjectId>,
    tail: Option<ObjectId>,
    pub config: Config,
    pub app_path: Path,
    pub token_info: Option<TokenInfo>,
    cache: Option<FileCache>,
    bound_dfs: Vec<DfKind>,
    /// Free-space descriptors from the card's unused-space EF (spec §3
    /// "PKCS#15 card"). Populated only by the personalization/write path,
    /// which is out of scope here (spec.md §1 Non-goals) — always empty
    /// after `bind`, kept as a real field rather than dropped so the
    /// aggregate's shape matches the data model.
    unused_space: Vec<(Path, u16)>,
}

impl Pkcs15Card {
    pub fn new(config: Config) -> Self {
        crate::apdu::set_log_apdu_bytes(config.log_apdu_bytes);
        let cache = if config.use_file_cache { Some(FileCache::new(".eid")) } else { None };
        Self {
            objects: Vec::new(),
            head: None,
            tail: None,
            config,
            app_path: Path::file_id(0x3F00),
            token_info: None,
            cache,
            bound_dfs: Vec::new(),
            unused_space: Vec::new(),
        }
    }

    /// Free-space descriptors read from the card, if any (always empty in
    /// this crate — see the field doc comment).
    pub fn unused_space(&self) -> &[(Path, u16)] {
        &self.unused_space
    }

    pub fn len(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an object to the end of the list, wiring `prev`/`next` so the
    /// invariant `obj.prev.next == Some(obj)` (spec §9) holds by
    /// construction.
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        object.prev = self.tail;
        object.next = None;
        if let Some(tail) = self.tail {
            self.objects[tail.0].as_mut().expect("tail object present").next = Some(id);
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        self.objects.push(Some(object));
        id
    }

    /// Unlink and drop the object at `id`. Remaining objects' `prev`/`next`
    /// are patched so the chain stays consistent; no raw pointer is ever
    /// left dangling because there is no raw pointer.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<(), Error> {
        let (prev, next) = {
            let obj = self.objects.get(id.0).and_then(|o| o.as_ref()).ok_or(Error::from(ErrorKind::InvalidArguments))?;
            (obj.prev, obj.next)
        };
        if let Some(prev) = prev {
            self.objects[prev.0].as_mut().expect("prev object present").next = next;
        } else {
            self.head = next;
        }
        if let Some(next) = next {
            self.objects[next.0].as_mut().expect("next object present").prev = prev;
        } else {
            self.tail = prev;
        }
        self.objects[id.0] = None;
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0).and_then(|o| o.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter().enumerate().filter_map(|(i, o)| o.as_ref().map(|o| (ObjectId(i), o)))
    }

    pub fn search_objects(&self, filter: &SearchFilter) -> Vec<(ObjectId, &Object)> {
        self.iter().filter(|(_, obj)| filter.matches(obj)).collect()
    }

    /// Find the "SO PIN" — the authentication PIN flagged as a security
    /// officer/administrator credential — by convention the first
    /// `AuthPin` object whose flags mark it private.
    pub fn find_so_pin(&self) -> Option<(ObjectId, &AuthInfo)> {
        self.iter().find_map(|(id, obj)| match &obj.payload {
            ObjectPayload::AuthPin(pin) if obj.flags.private => Some((id, pin)),
            _ => None,
        })
    }

    pub fn find_pin_by_auth_id(&self, auth_id: &[u8]) -> Option<(ObjectId, &AuthInfo)> {
        self.iter().find_map(|(id, obj)| match &obj.payload {
            ObjectPayload::AuthPin(pin) if pin.auth_id == auth_id => Some((id, pin)),
            _ => None,
        })
    }

    pub fn find_pin_by_reference(&self, reference: u16) -> Option<(ObjectId, &AuthInfo)> {
        self.iter().find_map(|(id, obj)| match &obj.payload {
            ObjectPayload::AuthPin(pin) if pin.pin_reference == reference => Some((id, pin)),
            _ => None,
        })
    }

    fn read_transparent_ef(&self, reader: &mut dyn Reader, driver: &dyn Driver, path: &Path) -> Result<Vec<u8>, Error> {
        if let Some(cache) = &self.cache {
            if let Some(data) = cache.get(path) {
                return Ok(data);
            }
        }
        let file = driver.select_file(reader, path, true)?.ok_or(Error::from(ErrorKind::FileNotFound))?;
        let data = driver.read_binary(reader, 0, file.size as usize)?;
        if let Some(cache) = &self.cache {
            let _ = cache.put(path, &data);
        }
        Ok(data)
    }

    /// Walk EF(DIR), select the application DF, read TokenInfo and the
    /// ODF, then lazily load each directory file the ODF points at (spec
    /// §4.G "binds the directory structure on demand").
    pub fn bind(&mut self, reader: &mut dyn Reader, driver: &dyn Driver, aid: Option<&[u8]>) -> Result<(), Error> {
        if let Some(aid) = aid {
            self.app_path = Path::df_name(aid)?;
            driver.select_file(reader, &self.app_path, false)?;
        } else {
            driver.select_file(reader, &Path::file_id(EF_DIR), false).ok();
        }

        let token_info_path = self.app_path.concat(&Path::file_id(EF_TOKEN_INFO))?;
        if let Ok(bytes) = self.read_transparent_ef(reader, driver, &token_info_path) {
            self.token_info = TokenInfo::decode(&bytes).ok();
        }

        let odf_path = self.app_path.concat(&Path::file_id(EF_ODF))?;
        let odf_bytes = self.read_transparent_ef(reader, driver, &odf_path)?;
        let entries = crate::pkcs15::asn1::template::parse_all(&odf_bytes)?;

        for (tag, kind) in ODF_TAGS {
            if self.bound_dfs.contains(&kind) {
                continue;
            }
            let Some(entry) = crate::pkcs15::asn1::template::find_tag(&entries, tag) else { continue };
            let df_path_bytes = crate::pkcs15::asn1::template::parse_sequence(&entry.value)
                .ok()
                .and_then(|items| items.first().map(|t| t.value.clone()))
                .unwrap_or_default();
            let df_path = Path { kind: crate::path::PathKind::Path, bytes: df_path_bytes, aid: None, index: None, count: None };
            let full_path = self.app_path.concat(&df_path)?;
            let df_bytes = self.read_transparent_ef(reader, driver, &full_path)?;
            self.load_df(kind, &df_bytes)?;
            self.bound_dfs.push(kind);
        }
        Ok(())
    }

    fn load_df(&mut self, kind: DfKind, bytes: &[u8]) -> Result<(), Error> {
        for entry in crate::pkcs15::asn1::template::parse_all(bytes)? {
            let object = match kind {
                DfKind::PrKDF => {
                    let info = PrivateKeyInfo::decode(&entry.value)?;
                    Object::new(ObjectKind::PrivateKey, info.label.clone(), ObjectPayload::PrivateKey(info))
                }
                DfKind::PuKDF => {
                    let info = PublicKeyInfo::decode(&entry.value)?;
                    Object::new(ObjectKind::PublicKey, info.label.clone(), ObjectPayload::PublicKey(info))
                }
                DfKind::CDF => {
                    let info = CertificateInfo::decode(&entry.value)?;
                    Object::new(ObjectKind::Certificate, info.label.clone(), ObjectPayload::Certificate(info))
                }
                DfKind::DODF => {
                    let info = DataObjectInfo::decode(&entry.value)?;
                    Object::new(ObjectKind::Data, info.label.clone(), ObjectPayload::Data(info))
                }
                DfKind::AODF => {
                    let info = AuthInfo::decode(&entry.value)?;
                    let mut obj = Object::new(ObjectKind::AuthPin, info.label.clone(), ObjectPayload::AuthPin(info));
                    obj.flags = ObjectFlags { private: true, modifiable: false, seen: true };
                    obj
                }
            };
            self.add_object(object);
        }
        Ok(())
    }
}
