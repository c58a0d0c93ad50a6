//! Answer-to-Reset parser (spec §4.D).

use crate::error::{Error, ErrorKind};

/// Fi/Di/f/N fixed tables (ISO 7816-3 Table 7/8). `None` marks an RFU slot.
const FI_TABLE: [Option<u16>; 16] =
    [Some(372), Some(372), Some(558), Some(744), Some(1116), Some(1488), Some(1860), None, None, Some(512), Some(768), Some(1024), Some(1536), Some(2048), None, None];
const DI_TABLE: [Option<u8>; 16] = [None, Some(1), Some(2), Some(4), Some(8), Some(16), Some(32), None, Some(12), Some(20), None, None, None, None, None, None];
const F_TABLE_MHZ: [Option<f32>; 16] = [Some(4.0), Some(5.0), Some(6.0), Some(8.0), Some(12.0), Some(16.0), Some(20.0), None, None, Some(5.0), Some(7.5), Some(10.0), Some(15.0), Some(20.0), None, None];

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Atr {
    pub fi: Option<u16>,
    pub di: Option<u8>,
    pub f_mhz: Option<f32>,
    pub history_bytes: Vec<u8>,
    pub protocols: Vec<u8>,
}

/// Parse an Answer-to-Reset beginning with `0x3B` or `0x3F`.
///
/// Walks the interface-byte groups: for each group, bits 4-7 of the
/// preceding `T0`/`TDi` select which of TA/TB/TC/TD are present
/// (bit0→TA, bit1→TB, bit2→TC, bit3→TD), consuming one byte per set bit in
/// that fixed order. The next group is driven by the current `TDi`'s low
/// nibble (the `T` protocol type) and the loop continues only while a
/// `TDi` byte was actually present — re-derived directly from ISO 7816-3
/// rather than the source's `tx[3] > 0 && tx[3] & 0xF0` heuristic (spec §9
/// Open Question: the heuristic conflates "no TD present" with "TD's high
/// nibble is zero").
pub fn parse_atr(bytes: &[u8]) -> Result<Atr, Error> {
    if bytes.is_empty() {
        return Err(ErrorKind::Internal.into());
    }
    if bytes[0] != 0x3B && bytes[0] != 0x3F {
        return Err(ErrorKind::Internal.into());
    }
    if bytes.len() < 2 {
        return Err(ErrorKind::Internal.into());
    }

    let mut pos = 1usize;
    let t0 = bytes[pos];
    pos += 1;
    let n_hist = (t0 & 0x0F) as usize;
    let mut presence_mask = t0 >> 4;

    let mut fi = None;
    let mut di = None;
    let mut f_mhz = None;
    let mut protocols = Vec::new();
    let mut first_group = true;

    loop {
        let mut td_byte: Option<u8> = None;
        for bit in 0..4 {
            if presence_mask & (1 << bit) == 0 {
                continue;
            }
            let byte = *bytes.get(pos).ok_or(Error::from(ErrorKind::Internal))?;
            pos += 1;
            match bit {
                0 if first_group => {
                    // TA1: FI in high nibble, DI in low nibble.
                    let fi_idx = (byte >> 4) as usize;
                    let di_idx = (byte & 0x0F) as usize;
                    fi = FI_TABLE[fi_idx];
                    di = DI_TABLE[di_idx];
                    f_mhz = F_TABLE_MHZ[fi_idx];
                }
                3 => td_byte = Some(byte),
                _ => {}
            }
        }
        first_group = false;
        match td_byte {
            Some(td) => {
                protocols.push(td & 0x0F);
                presence_mask = td >> 4;
            }
            None => break,
        }
    }

    let remaining = bytes.len().saturating_sub(pos);
    let hist_len = n_hist.min(remaining);
    let history_bytes = bytes[pos..pos + hist_len].to_vec();

    Ok(Atr { fi, di, f_mhz, history_bytes, protocols })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_atr_example() {
        // 3B F7 11 00 00 81 31 FE 45 4A 43 4F 50 32 31 56 22
        let bytes = [
            0x3B, 0xF7, 0x11, 0x00, 0x00, 0x81, 0x31, 0xFE, 0x45, 0x4A, 0x43, 0x4F, 0x50, 0x32,
            0x31, 0x56, 0x22,
        ];
        let atr = parse_atr(&bytes).unwrap();
        assert_eq!(atr.fi, Some(372));
        assert_eq!(atr.di, Some(1));
        assert_eq!(atr.f_mhz, Some(5.0));
        assert_eq!(atr.history_bytes.len(), 7);
        assert_eq!(atr.history_bytes, vec![0x4A, 0x43, 0x4F, 0x50, 0x32, 0x31, 0x56]);
    }

    #[test]
    fn empty_atr_is_internal_error() {
        assert_eq!(parse_atr(&[]).unwrap_err().kind, ErrorKind::Internal);
    }

    #[test]
    fn bad_sync_byte_is_internal_error() {
        assert_eq!(parse_atr(&[0x00, 0x00]).unwrap_err().kind, ErrorKind::Internal);
    }
}
