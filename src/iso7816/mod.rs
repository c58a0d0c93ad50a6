//! ISO 7816 command set (spec §4.F). Each submodule is a thin builder
//! over the APDU layer ([`crate::apdu`]); contracts are given as
//! input/output constraints in each function's doc comment.

pub mod admin;
pub mod binary;
pub mod challenge;
pub mod fci;
pub mod mse;
pub mod pso;
pub mod record;
pub mod select;
pub mod verify;

pub use admin::{create_file, delete_file};
pub use binary::{read_binary, update_binary, write_binary, APDU_CHOP_SIZE};
pub use challenge::get_challenge;
pub use fci::parse_fci;
pub use mse::{manage_security_environment, KeyKind, SeOperation, SeParams};
pub use pso::{pso_decipher, pso_sign};
pub use record::{append_record, read_record, update_record, RecordFlag, RecordMode};
pub use select::select_file;
pub use verify::{change_reference_data, reset_retry_counter, verify};
