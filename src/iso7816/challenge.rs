//! GET CHALLENGE (spec §4.F).

use crate::apdu::{self, Apdu};
use crate::error::Error;
use crate::reader::Reader;

const INS_GET_CHALLENGE: u8 = 0x84;
const CHUNK: usize = 8;

/// Fill `buf` with card-generated randomness, 8 bytes per GET CHALLENGE
/// call, repeating until `buf` is full (spec §4.F).
pub fn get_challenge(reader: &mut dyn Reader, buf: &mut [u8]) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        let want = (buf.len() - filled).min(CHUNK);
        let apdu = Apdu::case2_short(0x00, INS_GET_CHALLENGE, 0x00, 0x00, want);
        let resp = apdu::transmit(reader, &apdu)?;
        resp.classify()?;
        let n = resp.data.len().min(want);
        buf[filled..filled + n].copy_from_slice(&resp.data[..n]);
        filled += n;
        if n == 0 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct FixedReader;
    impl Reader for FixedReader {
        fn transmit(&mut self, _apdu: &[u8]) -> Result<RawResponse, Error> {
            Ok(RawResponse { data: vec![0xAA; 8], sw1: 0x90, sw2: 0x00 })
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
    fn fills_buffer_in_8_byte_chunks() {
        let mut reader = FixedReader;
        let mut buf = [0u8; 16];
        get_challenge(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [0xAAu8; 16]);
    }
}
