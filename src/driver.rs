//! Driver-capability interface (spec §9 "Card-specific drivers").
//!
//! The ISO 7816 operation set is the default implementation of this
//! trait; a card-specific quirk driver overrides only the methods it
//! needs to, the way a subclass would, without reimplementing the rest.

use crate::error::Error;
use crate::file::File;
use crate::path::Path;
use crate::reader::Reader;
use crate::secret::Secret;

pub trait Driver {
    fn select_file(&self, reader: &mut dyn Reader, path: &Path, want_fci: bool) -> Result<Option<File>, Error> {
        crate::iso7816::select_file(reader, path, want_fci)
    }

    fn read_binary(&self, reader: &mut dyn Reader, offset: u16, count: usize) -> Result<Vec<u8>, Error> {
        crate::iso7816::read_binary(reader, offset, count)
    }

    fn update_binary(&self, reader: &mut dyn Reader, offset: u16, data: &[u8]) -> Result<(), Error> {
        crate::iso7816::update_binary(reader, offset, data)
    }

    fn verify(&self, reader: &mut dyn Reader, key_ref: u8, pin: &Secret) -> Result<(), Error> {
        crate::iso7816::verify(reader, key_ref, pin)
    }

    fn change_reference_data(
        &self,
        reader: &mut dyn Reader,
        key_ref: u8,
        old: &Secret,
        new: &Secret,
    ) -> Result<(), Error> {
        crate::iso7816::change_reference_data(reader, key_ref, old, new)
    }

    fn reset_retry_counter(
        &self,
        reader: &mut dyn Reader,
        key_ref: u8,
        puk: &Secret,
        new: &Secret,
    ) -> Result<(), Error> {
        crate::iso7816::reset_retry_counter(reader, key_ref, puk, new)
    }

    fn pso_sign(&self, reader: &mut dyn Reader, hash: &[u8]) -> Result<Vec<u8>, Error> {
        crate::iso7816::pso_sign(reader, hash)
    }

    fn pso_decipher(&self, reader: &mut dyn Reader, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        crate::iso7816::pso_decipher(reader, ciphertext)
    }
}

/// The base driver: plain ISO 7816, every method at its default
/// implementation. Constructed once and reused (or wrapped) by quirk
/// drivers rather than re-derived per card (spec §9).
#[derive(Debug, Default, Clone, Copy)]
pub struct Iso7816Driver;

impl Driver for Iso7816Driver {}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReverseHashDriver;
    impl Driver for ReverseHashDriver {
        fn pso_sign(&self, reader: &mut dyn Reader, hash: &[u8]) -> Result<Vec<u8>, Error> {
            let mut reversed = hash.to_vec();
            reversed.reverse();
            crate::iso7816::pso_sign(reader, &reversed)
        }
    }

    struct FixedReader(Vec<Vec<u8>>);
    impl Reader for FixedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<crate::reader::RawResponse, Error> {
            self.0.push(apdu.to_vec());
            Ok(crate::reader::RawResponse { data: vec![], sw1: 0x90, sw2: 0x00 })
        }
        fn detect_card_presence(&mut self) -> crate::reader::CardPresence {
            crate::reader::CardPresence::Present
        }
        fn capabilities(&self) -> crate::reader::ReaderCaps {
            crate::reader::ReaderCaps::empty()
        }
        fn atr(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn quirk_driver_overrides_one_method() {
        let driver = ReverseHashDriver;
        let mut reader = FixedReader(vec![]);
        driver.pso_sign(&mut reader, &[0x01, 0x02, 0x03]).unwrap();
        // data field starts at offset 5 in the case4-short APDU.
        assert_eq!(&reader.0[0][5..8], &[0x03, 0x02, 0x01]);
    }
}
