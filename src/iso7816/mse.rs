//! MANAGE SECURITY ENVIRONMENT (spec §4.F "MSE").

use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::reader::Reader;

const INS_MSE: u8 = 0x22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeOperation {
    Sign,
    Decipher,
}

impl SeOperation {
    fn p1p2(self) -> (u8, u8) {
        match self {
            SeOperation::Decipher => (0x41, 0xB8),
            SeOperation::Sign => (0x81, 0xB6),
        }
    }
}

/// Key reference kind for tag `0x83`/`0x84` (spec §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Asymmetric,
    Symmetric,
}

#[derive(Debug, Clone, Default)]
pub struct SeParams {
    pub algorithm_ref: Option<u8>,
    pub file_ref: Option<Vec<u8>>,
    pub key_ref: Option<(KeyKind, u8)>,
}

fn encode_tlvs(params: &SeParams) -> Vec<u8> {
    let mut out = Vec::new();
    if let Some(alg) = params.algorithm_ref {
        out.extend_from_slice(&[0x80, 0x01, alg]);
    }
    if let Some(file_ref) = &params.file_ref {
        out.push(0x81);
        out.push(file_ref.len() as u8);
        out.extend_from_slice(file_ref);
    }
    if let Some((kind, key_ref)) = params.key_ref {
        let tag = match kind {
            KeyKind::Asymmetric => 0x83,
            KeyKind::Symmetric => 0x84,
        };
        out.extend_from_slice(&[tag, 0x01, key_ref]);
    }
    out
}

/// MANAGE SECURITY ENVIRONMENT for sign/decipher. If `se_number` is given,
/// a preceding `SET SE = n` (P1=0xF2) is sent first, both wrapped under
/// the caller's lock so no other operation's APDUs interleave (spec §4.F,
/// §5).
pub fn manage_security_environment(
    reader: &mut dyn Reader,
    lock: &dyn crate::lock::Lock,
    op: SeOperation,
    se_number: Option<u8>,
    params: &SeParams,
) -> Result<(), Error> {
    lock.lock();
    let result = (|| {
        if let Some(n) = se_number {
            let set_se = Apdu::case3_short(0x00, INS_MSE, 0xF2, n, vec![]);
            apdu::transmit(reader, &set_se)?.classify()?;
        }
        let (p1, p2) = op.p1p2();
        let apdu = Apdu::case3_short(0x00, INS_MSE, p1, p2, encode_tlvs(params));
        apdu::transmit(reader, &apdu)?.classify()
    })();
    lock.unlock();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::StdLock;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct FixedReader(Vec<Vec<u8>>);
    impl Reader for FixedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
            self.0.push(apdu.to_vec());
            Ok(RawResponse { data: vec![], sw1: 0x90, sw2: 0x00 })
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
    fn sign_uses_81_b6() {
        let mut reader = FixedReader(vec![]);
        let lock = StdLock::default();
        let params = SeParams { key_ref: Some((KeyKind::Asymmetric, 0x01)), ..Default::default() };
        manage_security_environment(&mut reader, &lock, SeOperation::Sign, None, &params).unwrap();
        assert_eq!(reader.0[0][2], 0x81);
        assert_eq!(reader.0[0][3], 0xB6);
    }

    #[test]
    fn decipher_uses_41_b8() {
        let mut reader = FixedReader(vec![]);
        let lock = StdLock::default();
        let params = SeParams::default();
        manage_security_environment(&mut reader, &lock, SeOperation::Decipher, None, &params).unwrap();
        assert_eq!(reader.0[0][2], 0x41);
        assert_eq!(reader.0[0][3], 0xB8);
    }

    #[test]
    fn se_number_sends_set_se_first() {
        let mut reader = FixedReader(vec![]);
        let lock = StdLock::default();
        manage_security_environment(&mut reader, &lock, SeOperation::Sign, Some(1), &SeParams::default()).unwrap();
        assert_eq!(reader.0.len(), 2);
        assert_eq!(reader.0[0], vec![0x00, 0x22, 0xF2, 0x01, 0x00]);
    }
}
