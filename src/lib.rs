//! ISO/IEC 7816 command layer and PKCS#15 object model for smart-card
//! middleware. Every external collaborator — the reader backend, the
//! ASN.1/DER primitive codec, the optional mutex capability — is consumed
//! through a trait; the library itself never talks to PC/SC or a specific
//! card directly.

pub mod acl;
pub mod apdu;
pub mod atr;
pub mod bytes;
pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod file;
pub mod iso7816;
pub mod lock;
pub mod oid;
pub mod path;
pub mod pin;
pub mod pincache;
pub mod pkcs15;
pub mod reader;
pub mod secret;

#[cfg(feature = "pcsc-reader")]
pub mod pcsc_reader;

pub use error::{Error, ErrorKind, Result};
