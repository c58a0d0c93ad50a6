//! APDU encoding, transmission and status-word classification (spec §4.E).

use crate::error::{Error, ErrorKind};
use crate::reader::Reader;
use std::sync::atomic::{AtomicBool, Ordering};

/// Gates whether `transmit` dumps full outbound/inbound APDU bytes at
/// `trace` level (spec §6 `Config::log_apdu_bytes`). A process-wide flag
/// rather than a threaded parameter, the same way `log`'s own max-level
/// filter is process-wide — every `iso7816::*` builder shares one
/// transmission path and none of them carry a `Config` of their own.
static LOG_APDU_BYTES: AtomicBool = AtomicBool::new(false);

/// Set from `Config::log_apdu_bytes` when a config is loaded. PIN-bearing
/// command data (VERIFY / CHANGE REFERENCE DATA / RESET RETRY COUNTER) is
/// always redacted in the trace dump regardless of this flag.
pub fn set_log_apdu_bytes(enabled: bool) {
    LOG_APDU_BYTES.store(enabled, Ordering::Relaxed);
}

const PIN_BEARING_INS: [u8; 3] = [0x20, 0x24, 0x2C];

fn trace_apdu_bytes(direction: &str, ins: u8, data: &[u8]) {
    if !LOG_APDU_BYTES.load(Ordering::Relaxed) {
        return;
    }
    if PIN_BEARING_INS.contains(&ins) {
        log::trace!("apdu {direction}: ins={:#04x} data=**** ({} bytes)", ins, data.len());
    } else {
        log::trace!("apdu {direction}: ins={:#04x} data={}", ins, crate::bytes::bin_to_hex(data));
    }
}

/// One of the four ISO 7816-4 command cases, short or extended form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApduCase {
    Case1,
    Case2Short,
    Case3Short,
    Case4Short,
    Case2Ext,
    Case3Ext,
    Case4Ext,
}

/// A command APDU (header + optional outbound data + optional expected
/// response length). `le` of `None` with `Case2*`/`Case4*` means "read
/// everything the card offers" (`Le = 0` on the wire).
#[derive(Debug, Clone)]
pub struct Apdu {
    pub case: ApduCase,
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
    pub le: Option<usize>,
}

impl Apdu {
    pub fn case1(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self { case: ApduCase::Case1, cla, ins, p1, p2, data: Vec::new(), le: None }
    }

    pub fn case2_short(cla: u8, ins: u8, p1: u8, p2: u8, le: usize) -> Self {
        Self { case: ApduCase::Case2Short, cla, ins, p1, p2, data: Vec::new(), le: Some(le) }
    }

    pub fn case3_short(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self { case: ApduCase::Case3Short, cla, ins, p1, p2, data, le: None }
    }

    pub fn case4_short(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>, le: usize) -> Self {
        Self { case: ApduCase::Case4Short, cla, ins, p1, p2, data, le: Some(le) }
    }

    /// Serialize to wire bytes, bit-identical to the ISO 7816-4 rules.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = vec![self.cla, self.ins, self.p1, self.p2];
        match self.case {
            ApduCase::Case1 => {}
            ApduCase::Case2Short => {
                let le = self.le.unwrap_or(0);
                if le > 256 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(if le == 256 { 0x00 } else { le as u8 });
            }
            ApduCase::Case3Short => {
                if self.data.len() > 255 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(self.data.len() as u8);
                out.extend_from_slice(&self.data);
            }
            ApduCase::Case4Short => {
                if self.data.len() > 255 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(self.data.len() as u8);
                out.extend_from_slice(&self.data);
                let le = self.le.unwrap_or(0);
                if le > 256 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(if le == 256 { 0x00 } else { le as u8 });
            }
            ApduCase::Case2Ext => {
                let le = self.le.unwrap_or(0);
                out.push(0x00);
                out.extend_from_slice(&(le as u16).to_be_bytes());
            }
            ApduCase::Case3Ext => {
                if self.data.len() > 65535 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(0x00);
                out.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
                out.extend_from_slice(&self.data);
            }
            ApduCase::Case4Ext => {
                if self.data.len() > 65535 {
                    return Err(ErrorKind::CmdTooLong.into());
                }
                out.push(0x00);
                out.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
                out.extend_from_slice(&self.data);
                let le = self.le.unwrap_or(0);
                out.extend_from_slice(&(le as u16).to_be_bytes());
            }
        }
        Ok(out)
    }
}

/// Final status word plus response body, after GET RESPONSE/retry-Le
/// handling (spec §4.E "Transmission protocol").
#[derive(Debug, Clone)]
pub struct Response {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    pub fn data_remaining(&self) -> Option<u8> {
        if self.sw1 == 0x61 {
            Some(self.sw2)
        } else {
            None
        }
    }

    pub fn classify(&self) -> Result<(), Error> {
        classify_status_word(self.sw1, self.sw2)
    }
}

/// Transmit `apdu`, following up with GET RESPONSE on `0x61xx` and a single
/// Le retry on `0x6Cxx` (spec §4.E steps 2-3).
pub fn transmit(reader: &mut dyn Reader, apdu: &Apdu) -> Result<Response, Error> {
    let bytes = apdu.serialize()?;
    log::debug!("apdu tx: ins={:#04x} p1={:#04x} p2={:#04x} lc={}", apdu.ins, apdu.p1, apdu.p2, apdu.data.len());
    trace_apdu_bytes("tx", apdu.ins, &apdu.data);
    let raw = reader.transmit(&bytes).map_err(|_| Error::from(ErrorKind::TransmitFailed))?;
    let mut data = raw.data;
    let (mut sw1, mut sw2) = (raw.sw1, raw.sw2);
    trace_apdu_bytes("rx", apdu.ins, &data);

    if sw1 == 0x6C {
        let retry = Apdu { le: Some(sw2 as usize), ..apdu.clone() };
        let bytes = retry.serialize()?;
        let raw = reader.transmit(&bytes).map_err(|_| Error::from(ErrorKind::TransmitFailed))?;
        data = raw.data;
        sw1 = raw.sw1;
        sw2 = raw.sw2;
    }

    while sw1 == 0x61 {
        let get_response = Apdu::case2_short(apdu.cla, 0xC0, 0x00, 0x00, sw2 as usize);
        let bytes = get_response.serialize()?;
        let raw = reader.transmit(&bytes).map_err(|_| Error::from(ErrorKind::TransmitFailed))?;
        data.extend_from_slice(&raw.data);
        sw1 = raw.sw1;
        sw2 = raw.sw2;
    }

    log::debug!("apdu rx: sw={:02X}{:02X} len={}", sw1, sw2, data.len());
    Ok(Response { data, sw1, sw2 })
}

/// Classify a status word into an [`ErrorKind`]. `0x9000` is success
/// (returns `Ok(())`); `0x63Cx` is [`ErrorKind::PinIncorrect`] with
/// `tries_left = x`; anything not in the table is
/// [`ErrorKind::UnknownReply`] (spec §4.E).
pub fn classify_status_word(sw1: u8, sw2: u8) -> Result<(), Error> {
    if sw1 == 0x90 && sw2 == 0x00 {
        return Ok(());
    }
    if sw1 == 0x61 {
        // More data available; not itself an error at this layer.
        return Ok(());
    }
    if sw1 == 0x63 && (sw2 & 0xF0) == 0xC0 {
        return Err(Error::with_tries_left(ErrorKind::PinIncorrect, sw2 & 0x0F));
    }
    let kind = match (sw1, sw2) {
        (0x62, 0x83) => ErrorKind::Internal, // file deactivated
        (0x64, _) => ErrorKind::TransmitFailed,
        (0x65, _) => ErrorKind::Internal,
        (0x67, 0x00) => ErrorKind::WrongLength,
        (0x68, _) => ErrorKind::NotSupported,
        (0x69, 0x81) => ErrorKind::NotSupported,
        (0x69, 0x82) => ErrorKind::SecurityStatusNotSatisfied,
        (0x69, 0x83) => ErrorKind::AuthMethodBlocked,
        (0x69, 0x84) => ErrorKind::InvalidArguments,
        (0x69, 0x85) => ErrorKind::SecurityStatusNotSatisfied,
        (0x69, 0x86) => ErrorKind::FileNotFound,
        (0x6A, 0x80) => ErrorKind::InvalidArguments,
        (0x6A, 0x81) => ErrorKind::NotSupported,
        (0x6A, 0x82) => ErrorKind::FileNotFound,
        (0x6A, 0x83) => ErrorKind::RecordNotFound,
        (0x6A, 0x84) => ErrorKind::OutOfMemory,
        (0x6A, 0x86) => ErrorKind::InvalidArguments,
        (0x6A, 0x88) => ErrorKind::RecordNotFound,
        (0x6B, 0x00) => ErrorKind::InvalidArguments,
        (0x6C, _) => ErrorKind::WrongLength,
        (0x6D, 0x00) => ErrorKind::NotSupported,
        (0x6E, 0x00) => ErrorKind::NotSupported,
        (0x6F, 0x00) => ErrorKind::Internal,
        _ => ErrorKind::UnknownReply,
    };
    Err(Error::with_sw(kind, sw1, sw2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{CardPresence, ReaderCaps, RawResponse};

    struct ScriptedReader {
        responses: Vec<RawResponse>,
        sent: Vec<Vec<u8>>,
    }

    impl Reader for ScriptedReader {
        fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
            self.sent.push(apdu.to_vec());
            Ok(self.responses.remove(0))
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
    fn s3_select_absolute_path_serializes() {
        let apdu = Apdu::case3_short(0x00, 0xA4, 0x08, 0x02, vec![0x50, 0x15]);
        assert_eq!(apdu.serialize().unwrap(), vec![0x00, 0xA4, 0x08, 0x02, 0x02, 0x50, 0x15]);
    }

    #[test]
    fn s5_pso_sign_serializes() {
        let hash = vec![0xAB; 20];
        let apdu = Apdu::case4_short(0x00, 0x2A, 0x9E, 0x9A, hash.clone(), 256);
        let mut expected = vec![0x00, 0x2A, 0x9E, 0x9A, 0x14];
        expected.extend_from_slice(&hash);
        expected.push(0x00);
        assert_eq!(apdu.serialize().unwrap(), expected);
    }

    #[test]
    fn get_response_chains_on_61xx() {
        let mut reader = ScriptedReader {
            responses: vec![
                RawResponse { data: vec![], sw1: 0x61, sw2: 0x05 },
                RawResponse { data: vec![1, 2, 3, 4, 5], sw1: 0x90, sw2: 0x00 },
            ],
            sent: vec![],
        };
        let apdu = Apdu::case1(0x00, 0xA4, 0x00, 0x00);
        let resp = transmit(&mut reader, &apdu).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(reader.sent[1], vec![0x00, 0xC0, 0x00, 0x00, 0x05]);
    }

    #[test]
    fn retries_once_on_6cxx() {
        let mut reader = ScriptedReader {
            responses: vec![
                RawResponse { data: vec![], sw1: 0x6C, sw2: 0x10 },
                RawResponse { data: vec![0; 16], sw1: 0x90, sw2: 0x00 },
            ],
            sent: vec![],
        };
        let apdu = Apdu::case2_short(0x00, 0xB0, 0x00, 0x00, 0x00);
        let resp = transmit(&mut reader, &apdu).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.data.len(), 16);
    }

    #[test]
    fn s4_sw63cx_is_pin_incorrect() {
        let err = classify_status_word(0x63, 0xC2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PinIncorrect);
        assert_eq!(err.tries_left, Some(2));

        let err0 = classify_status_word(0x63, 0xC0).unwrap_err();
        assert_eq!(err0.kind, ErrorKind::PinIncorrect);
        assert_eq!(err0.tries_left, Some(0));
    }

    #[test]
    fn s4_sw6983_is_auth_method_blocked() {
        let err = classify_status_word(0x69, 0x83).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthMethodBlocked);
    }

    #[test]
    fn status_word_mapping_law() {
        let err = classify_status_word(0x63, 0xC3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PinIncorrect);
        assert_eq!(err.tries_left, Some(3));
    }

    #[test]
    fn unrecognized_sw_is_unknown_reply() {
        let err = classify_status_word(0x42, 0x42).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownReply);
    }

    #[test]
    fn success_sw_classifies_ok() {
        assert!(classify_status_word(0x90, 0x00).is_ok());
    }

    #[test]
    fn pin_bearing_instructions_are_verify_change_and_reset() {
        assert!(PIN_BEARING_INS.contains(&0x20)); // VERIFY
        assert!(PIN_BEARING_INS.contains(&0x24)); // CHANGE REFERENCE DATA
        assert!(PIN_BEARING_INS.contains(&0x2C)); // RESET RETRY COUNTER
        assert!(!PIN_BEARING_INS.contains(&0xA4)); // SELECT FILE
    }

    #[test]
    fn byte_trace_toggle_does_not_affect_transmission() {
        set_log_apdu_bytes(true);
        let mut reader =
            ScriptedReader { responses: vec![RawResponse { data: vec![], sw1: 0x90, sw2: 0x00 }], sent: vec![] };
        let apdu = Apdu::case3_short(0x00, INS_VERIFY_FOR_TEST, 0x00, 0x01, vec![b'1', b'2', b'3', b'4']);
        transmit(&mut reader, &apdu).unwrap();
        set_log_apdu_bytes(false);
        assert_eq!(reader.sent[0], vec![0x00, 0x20, 0x00, 0x01, 0x04, b'1', b'2', b'3', b'4']);
    }

    const INS_VERIFY_FOR_TEST: u8 = 0x20;
}
