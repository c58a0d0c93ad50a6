//! A [`Reader`] backed by the host's PC/SC service, behind the
//! `pcsc-reader` feature (spec §6 "Reader capability (consumed)"). Grounded
//! in the `pcsc` crate's own examples for the connect/transmit/status
//! sequence, the same role the teacher crate gives its `rusb`-backed NFC
//! reader behind its own optional feature.

use crate::error::{Error, ErrorKind};
use crate::reader::{CardPresence, RawResponse, Reader, ReaderCaps};
use pcsc::{Card, Context, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};

pub struct PcscReader {
    context: Context,
    reader_name: std::ffi::CString,
    card: Option<Card>,
    atr: Vec<u8>,
}

impl PcscReader {
    /// Connect to the first reader PC/SC reports, if any.
    pub fn first_available() -> Result<Self, Error> {
        let context = Context::establish(Scope::User).map_err(|_| ErrorKind::TransmitFailed)?;
        let mut buf = vec![0u8; 2048];
        let readers = context.list_readers(&mut buf).map_err(|_| ErrorKind::TransmitFailed)?;
        let reader_name = readers.into_iter().next().ok_or(Error::from(ErrorKind::FileNotFound))?.to_owned();
        Ok(Self { context, reader_name, card: None, atr: Vec::new() })
    }

    fn connect(&mut self) -> Result<&mut Card, Error> {
        if self.card.is_none() {
            let card = self
                .context
                .connect(&self.reader_name, ShareMode::Shared, Protocols::ANY)
                .map_err(|_| ErrorKind::TransmitFailed)?;
            let mut names_buf = [0u8; 2048];
            let mut atr_buf = [0u8; pcsc::MAX_ATR_SIZE];
            if let Ok(status) = card.status2(&mut names_buf, &mut atr_buf) {
                self.atr = status.atr().to_vec();
            }
            self.card = Some(card);
        }
        Ok(self.card.as_mut().expect("just connected"))
    }
}

impl Reader for PcscReader {
    fn transmit(&mut self, apdu: &[u8]) -> Result<RawResponse, Error> {
        let card = self.connect()?;
        let mut response_buf = [0u8; MAX_BUFFER_SIZE];
        let response = card.transmit(apdu, &mut response_buf).map_err(|_| Error::from(ErrorKind::TransmitFailed))?;
        if response.len() < 2 {
            return Err(ErrorKind::TransmitFailed.into());
        }
        let (data, sw) = response.split_at(response.len() - 2);
        Ok(RawResponse { data: data.to_vec(), sw1: sw[0], sw2: sw[1] })
    }

    fn detect_card_presence(&mut self) -> CardPresence {
        match self.connect() {
            Ok(_) => CardPresence::Present,
            Err(_) if self.card.is_none() => CardPresence::Absent,
            Err(_) => CardPresence::Unknown,
        }
    }

    fn capabilities(&self) -> ReaderCaps {
        ReaderCaps::empty()
    }

    fn atr(&self) -> &[u8] {
        &self.atr
    }
}
