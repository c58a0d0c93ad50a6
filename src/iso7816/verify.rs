//! VERIFY, CHANGE REFERENCE DATA, RESET RETRY COUNTER (spec §4.F, §4.I).

use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::reader::Reader;
use crate::secret::Secret;

const INS_VERIFY: u8 = 0x20;
const INS_CHANGE_REFERENCE_DATA: u8 = 0x24;
const INS_RESET_RETRY_COUNTER: u8 = 0x2C;
const QUALIFIER_CHV: u8 = 0x00;

/// VERIFY CHV. On `0x63Cx` the caller receives `ErrorKind::PinIncorrect`
/// with `tries_left` populated (via [`crate::apdu::classify_status_word`]);
/// the outbound buffer is always zeroed immediately after transmission
/// regardless of outcome (spec §4.F).
pub fn verify(reader: &mut dyn Reader, key_ref: u8, pin: &Secret) -> Result<(), Error> {
    let mut data = pin.as_bytes().to_vec();
    let apdu = Apdu::case3_short(0x00, INS_VERIFY, QUALIFIER_CHV, key_ref, data.clone());
    let result = apdu::transmit(reader, &apdu).and_then(|r| r.classify());
    data.iter_mut().for_each(|b| *b = 0);
    result
}

/// CHANGE REFERENCE DATA. `old` empty means "unblock style" P1 (card
/// decides from context); P1 is chosen from the (oldlen==0, newlen==0)
/// matrix (spec §4.F).
pub fn change_reference_data(reader: &mut dyn Reader, key_ref: u8, old: &Secret, new: &Secret) -> Result<(), Error> {
    let p1 = match (old.is_empty(), new.is_empty()) {
        (true, true) => 0x00,
        (true, false) => 0x01,
        (false, _) => 0x00,
    };
    let mut data = old.as_bytes().to_vec();
    data.extend_from_slice(new.as_bytes());
    let apdu = Apdu::case3_short(0x00, INS_CHANGE_REFERENCE_DATA, p1, key_ref, data.clone());
    let result = apdu::transmit(reader, &apdu).and_then(|r| r.classify());
    data.iter_mut().for_each(|b| *b = 0);
    result
}

/// RESET RETRY COUNTER. `puk` empty means the card's own stored unblock
/// data is used; `new` empty means "unblock without changing the PIN
/// value" (spec §4.F).
pub fn reset_retry_counter(reader: &mut dyn Reader, key_ref: u8, puk: &Secret, new: &Secret) -> Result<(), Error> {
    let p1 = match (puk.is_empty(), new.is_empty()) {
        (true, true) => 0x03,
        (true, false) => 0x02,
        (false, true) => 0x01,
        (false, false) => 0x00,
    };
    let mut data = puk.as_bytes().to_vec();
    data.extend_from_slice(new.as_bytes());
    let apdu = Apdu::case3_short(0x00, INS_RESET_RETRY_COUNTER, p1, key_ref, data.clone());
    let result = apdu::transmit(reader, &apdu).and_then(|r| r.classify());
    data.iter_mut().for_each(|b| *b = 0);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct FixedReader(u8, u8, Vec<Vec<u8>>);
    impl Reader for FixedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
            self.2.push(apdu.to_vec());
            Ok(RawResponse { data: vec![], sw1: self.0, sw2: self.1 })
        }
        fn detect_card_presence(&mut self) -> CardPresence {
            CardPresence::Present
        }
        fn capabilities(&self) -> ReaderCaps {
            ReaderCaps::empty()
        }
        fn atr(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn s4_verify_wrong_pin_tries_left_2() {
        let mut reader = FixedReader(0x63, 0xC2, vec![]);
        let pin = Secret::new(b"1234".to_vec());
        let err = verify(&mut reader, 0x01, &pin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PinIncorrect);
        assert_eq!(err.tries_left, Some(2));
    }

    #[test]
    fn s4_zero_tries_is_still_pin_incorrect_not_blocked() {
        let mut reader = FixedReader(0x63, 0xC0, vec![]);
        let pin = Secret::new(b"1234".to_vec());
        let err = verify(&mut reader, 0x01, &pin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PinIncorrect);
        assert_eq!(err.tries_left, Some(0));
    }

    #[test]
    fn sw6983_is_auth_method_blocked_not_pin_incorrect() {
        let mut reader = FixedReader(0x69, 0x83, vec![]);
        let pin = Secret::new(b"1234".to_vec());
        let err = verify(&mut reader, 0x01, &pin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthMethodBlocked);
    }

    #[test]
    fn change_reference_data_concats_old_and_new() {
        let mut reader = FixedReader(0x90, 0x00, vec![]);
        let old = Secret::new(b"1234".to_vec());
        let new = Secret::new(b"5678".to_vec());
        change_reference_data(&mut reader, 0x01, &old, &new).unwrap();
        assert_eq!(reader.2[0][5..], *b"12345678");
    }
}
