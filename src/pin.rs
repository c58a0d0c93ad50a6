//! PIN lifecycle (spec §4.I): verify, change, unblock, each gated by a
//! length check derived from the PIN's AODF entry before any APDU goes out,
//! and each feeding the pin cache (spec §4.J) on success.

use crate::config::Config;
use crate::driver::Driver;
use crate::error::{Error, ErrorKind};
use crate::pincache::{self, PinCache};
use crate::pkcs15::asn1::aodf::AuthInfo;
use crate::pkcs15::graph::Pkcs15Card;
use crate::reader::{Reader, ReaderCaps};
use crate::secret::Secret;

/// The largest PIN value this crate will stage into an outbound buffer.
/// Exists so a corrupt or hostile AODF entry (absurd `stored_length`)
/// can't be used to allocate an unbounded buffer downstream.
pub const SC_MAX_PIN_SIZE: usize = 64;

/// Length-check a candidate PIN against its AODF entry. A PIN-pad capable
/// reader collects and forwards the PIN itself, so a software-side length
/// check would reject input the reader never showed us — skip it (spec
/// §4.I).
fn validate_pin_length(info: &AuthInfo, pin: &Secret, caps: ReaderCaps) -> Result<(), Error> {
    if info.stored_length as usize > SC_MAX_PIN_SIZE {
        return Err(ErrorKind::BufferTooSmall.into());
    }
    if caps.contains(ReaderCaps::PIN_PAD) {
        return Ok(());
    }
    let len = pin.len();
    if len < info.min_length as usize || len > info.max_length as usize {
        return Err(ErrorKind::InvalidArguments.into());
    }
    Ok(())
}

/// Cache (or evict) a PIN after a successful card operation. Denied
/// eligibility evicts whatever was cached for this reference rather than
/// leaving it in place, so a PIN that just lost cache eligibility (e.g. a
/// newly-bound object demanding user consent) can't be served stale (spec
/// §4.I "on success, invoke pin-cache add", §4.J denial conditions).
fn cache_on_success(
    cache: &mut PinCache,
    config: &Config,
    caps: ReaderCaps,
    user_consent_required: bool,
    reference: u16,
    pin: &Secret,
) {
    match pincache::eligibility(config, caps, user_consent_required) {
        Ok(()) => cache.put(reference, pin.clone(), config.pin_cache_counter),
        Err(_) => cache.invalidate(reference),
    }
}

pub fn verify_pin(
    reader: &mut dyn Reader,
    driver: &dyn Driver,
    cache: &mut PinCache,
    config: &Config,
    info: &AuthInfo,
    pin: &Secret,
    user_consent_required: bool,
) -> Result<(), Error> {
    validate_pin_length(info, pin, reader.capabilities())?;
    driver.verify(reader, info.pin_reference as u8, pin)?;
    cache_on_success(cache, config, reader.capabilities(), user_consent_required, info.pin_reference, pin);
    Ok(())
}

pub fn change_pin(
    reader: &mut dyn Reader,
    driver: &dyn Driver,
    cache: &mut PinCache,
    config: &Config,
    info: &AuthInfo,
    old: &Secret,
    new: &Secret,
    user_consent_required: bool,
) -> Result<(), Error> {
    validate_pin_length(info, new, reader.capabilities())?;
    driver.change_reference_data(reader, info.pin_reference as u8, old, new)?;
    cache_on_success(cache, config, reader.capabilities(), user_consent_required, info.pin_reference, new);
    Ok(())
}

/// Unblock via RESET RETRY COUNTER. An empty `new` means "reset the retry
/// counter without changing the PIN value" and skips PIN-length validation
/// entirely — there is nothing to validate (spec §4.I, §4.F P1 matrix). The
/// PUK itself is validated against its own AODF entry, located via
/// `card.find_pin_by_auth_id(info.auth_id)`; if no separate PUK object is
/// bound, the PIN's own attributes are used for the PUK half, per spec
/// §4.I.
pub fn unblock_pin(
    reader: &mut dyn Reader,
    driver: &dyn Driver,
    card: &Pkcs15Card,
    cache: &mut PinCache,
    config: &Config,
    info: &AuthInfo,
    puk: &Secret,
    new: &Secret,
    user_consent_required: bool,
) -> Result<(), Error> {
    let puk_info = card.find_pin_by_auth_id(&info.auth_id).map(|(_, p)| p).unwrap_or(info);
    validate_pin_length(puk_info, puk, reader.capabilities())?;
    if !new.is_empty() {
        validate_pin_length(info, new, reader.capabilities())?;
    }
    driver.reset_retry_counter(reader, info.pin_reference as u8, puk, new)?;
    if new.is_empty() {
        cache.invalidate(info.pin_reference);
    } else {
        cache_on_success(cache, config, reader.capabilities(), user_consent_required, info.pin_reference, new);
    }
    Ok(())
}
