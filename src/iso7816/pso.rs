//! PERFORM SECURITY OPERATION: sign and decipher (spec §4.F "PSO-SIGN").

use crate::apdu::{self, Apdu};
use crate::error::{Error, ErrorKind};
use crate::reader::Reader;

const INS_PSO: u8 = 0x2A;
const P1_SIGN: u8 = 0x9E;
const P2_SIGN: u8 = 0x9A;
const P1_DECIPHER: u8 = 0x80;
const P2_DECIPHER: u8 = 0x86;

/// PSO-SIGN: compute a signature over `hash` (already hashed/padded by the
/// caller). Short-form only; `hash.len()` must be `<= 255` (spec §4.F).
pub fn pso_sign(reader: &mut dyn Reader, hash: &[u8]) -> Result<Vec<u8>, Error> {
    if hash.len() > 255 {
        return Err(ErrorKind::CmdTooLong.into());
    }
    let apdu = Apdu::case4_short(0x00, INS_PSO, P1_SIGN, P2_SIGN, hash.to_vec(), 256);
    let resp = apdu::transmit(reader, &apdu)?;
    resp.classify()?;
    Ok(resp.data)
}

/// PSO-DECIPHER: decrypt `ciphertext`, which is sent prefixed with the
/// `0x00` padding-indicator byte required by the command (spec §4.F).
pub fn pso_decipher(reader: &mut dyn Reader, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    if ciphertext.len() + 1 > 255 {
        return Err(ErrorKind::CmdTooLong.into());
    }
    let mut data = vec![0x00];
    data.extend_from_slice(ciphertext);
    let apdu = Apdu::case4_short(0x00, INS_PSO, P1_DECIPHER, P2_DECIPHER, data, 256);
    let resp = apdu::transmit(reader, &apdu)?;
    resp.classify()?;
    Ok(resp.data)
}
