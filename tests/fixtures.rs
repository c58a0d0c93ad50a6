//! Integration tests replaying canned APDU exchanges end to end through
//! the real `iso7816` builders and `apdu::transmit` loop (spec §8 S2-S5).

use sc_pkcs15::apdu;
use sc_pkcs15::error::Error;
use sc_pkcs15::iso7816;
use sc_pkcs15::reader::{CardPresence, RawResponse, Reader, ReaderCaps};
use sc_pkcs15::secret::Secret;

/// Replays a fixed script of (expected request, response) pairs; panics if
/// the caller sends something other than what the script expects, so a
/// mismatch in a builder's byte-exactness fails loudly instead of just
/// returning a wrong response.
struct FakeReader {
    script: Vec<(Vec<u8>, RawResponse)>,
    cursor: usize,
    atr: Vec<u8>,
}

impl FakeReader {
    fn new(script: Vec<(Vec<u8>, RawResponse)>) -> Self {
        Self { script, cursor: 0, atr: vec![0x3B, 0xF7, 0x11, 0x00, 0x00, 0x81, 0x31, 0xFE, 0x45] }
    }
}

impl Reader for FakeReader {
    fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
        let (expected, response) = self.script.get(self.cursor).expect("script exhausted");
        assert_eq!(apdu, expected.as_slice(), "unexpected APDU at step {}", self.cursor);
        self.cursor += 1;
        Ok(response.clone())
    }

    fn detect_card_presence(&mut self) -> CardPresence {
        CardPresence::Present
    }

    fn capabilities(&self) -> ReaderCaps {
        ReaderCaps::empty()
    }

    fn atr(&self) -> &[u8] {
        &self.atr
    }
}

#[test]
fn s3_select_then_read_binary_round_trip() {
    let mut reader = FakeReader::new(vec![
        (vec![0x00, 0xA4, 0x08, 0x02, 0x02, 0x50, 0x15], RawResponse { data: vec![], sw1: 0x90, sw2: 0x00 }),
        (
            vec![0x00, 0xB0, 0x00, 0x00, 0x04],
            RawResponse { data: vec![0xDE, 0xAD, 0xBE, 0xEF], sw1: 0x90, sw2: 0x00 },
        ),
    ]);

    let path = sc_pkcs15::path::Path::file_id(0x5015);
    iso7816::select_file(&mut reader, &path, false).unwrap();
    let data = iso7816::read_binary(&mut reader, 0, 4).unwrap();
    assert_eq!(data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn s4_verify_failure_then_success_carries_tries_left() {
    let mut reader = FakeReader::new(vec![
        (vec![0x00, 0x20, 0x00, 0x01, 0x04, b'1', b'2', b'3', b'4'], RawResponse { data: vec![], sw1: 0x63, sw2: 0xC2 }),
        (vec![0x00, 0x20, 0x00, 0x01, 0x04, b'5', b'6', b'7', b'8'], RawResponse { data: vec![], sw1: 0x90, sw2: 0x00 }),
    ]);

    let wrong = Secret::new(b"1234".to_vec());
    let err = iso7816::verify(&mut reader, 0x01, &wrong).unwrap_err();
    assert_eq!(err.tries_left, Some(2));

    let right = Secret::new(b"5678".to_vec());
    iso7816::verify(&mut reader, 0x01, &right).unwrap();
}

#[test]
fn s5_pso_sign_then_get_response_chain() {
    let hash = vec![0xAB; 20];
    let mut signature = vec![0x11; 200];
    signature.extend(std::iter::repeat(0x22).take(56));

    let mut request = vec![0x00, 0x2A, 0x9E, 0x9A, 0x14];
    request.extend_from_slice(&hash);
    request.push(0x00);

    let mut reader = FakeReader::new(vec![
        (request, RawResponse { data: signature[..200].to_vec(), sw1: 0x61, sw2: 0x38 }),
        (vec![0x00, 0xC0, 0x00, 0x00, 0x38], RawResponse { data: signature[200..].to_vec(), sw1: 0x90, sw2: 0x00 }),
    ]);

    let result = iso7816::pso_sign(&mut reader, &hash).unwrap();
    assert_eq!(result, signature);
}

#[test]
fn atr_is_available_from_the_reader_capability() {
    let reader = FakeReader::new(vec![]);
    let atr = sc_pkcs15::atr::parse_atr(reader.atr()).unwrap();
    assert_eq!(atr.fi, Some(372));
}

#[test]
fn transmit_maps_reader_failure_to_transmit_failed() {
    struct BrokenReader;
    impl Reader for BrokenReader {
        fn transmit(&mut self, _apdu: &[u8]) -> Result<RawResponse, Error> {
            Err(Error::from(sc_pkcs15::error::ErrorKind::TransmitFailed))
        }
        fn detect_card_presence(&mut self) -> CardPresence {
            CardPresence::Absent
        }
        fn capabilities(&self) -> ReaderCaps {
            ReaderCaps::empty()
        }
        fn atr(&self) -> &[u8] {
            &[]
        }
    }

    let mut reader = BrokenReader;
    let apdu = sc_pkcs15::apdu::Apdu::case1(0x00, 0xA4, 0x00, 0x00);
    let err = apdu::transmit(&mut reader, &apdu).unwrap_err();
    assert_eq!(err.kind, sc_pkcs15::error::ErrorKind::TransmitFailed);
}
