//! PKCS#15 object model (spec §4.G, §4.H).

pub mod asn1;
pub mod graph;
pub mod object;

pub use graph::{DfKind, Pkcs15Card, SearchFilter};
pub use object::{AccessRule, Object, ObjectFlags, ObjectId, ObjectKind, ObjectPayload};
