//! PIN cache state machine (spec §4.J). A cached PIN is revalidated by a
//! simple use counter rather than an absolute expiry — every reader and
//! card interaction in this API is synchronous, so "N operations have
//! happened since this PIN was entered" is the only drift that matters.

use crate::config::Config;
use crate::reader::ReaderCaps;
use crate::secret::Secret;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDenial {
    /// `Config::use_pin_cache` is off.
    Disabled,
    /// The reader collects the PIN itself; nothing reaches this process to
    /// cache.
    PinPadReader,
    /// The object being accessed (or another object sharing this PIN)
    /// requires explicit user consent per operation.
    UserConsentRequired,
}

/// Whether a PIN is eligible for caching at all, independent of whether
/// one happens to be cached right now (spec §4.J "denial conditions").
pub fn eligibility(config: &Config, caps: ReaderCaps, any_sharer_requires_consent: bool) -> Result<(), CacheDenial> {
    if !config.use_pin_cache {
        return Err(CacheDenial::Disabled);
    }
    if caps.contains(ReaderCaps::PIN_PAD) {
        return Err(CacheDenial::PinPadReader);
    }
    if any_sharer_requires_consent {
        return Err(CacheDenial::UserConsentRequired);
    }
    Ok(())
}

struct CachedPin {
    secret: Secret,
    uses_left: u32,
}

/// A cold/cached state machine keyed by PIN reference. `get` both reads
/// and counts down; a PIN whose counter reaches zero is wiped instead of
/// served one last time, so callers always revalidate before the cached
/// value could be stale (spec §4.J "counter-bounded revalidation").
#[derive(Default)]
pub struct PinCache {
    entries: HashMap<u16, CachedPin>,
}

impl PinCache {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Store `secret` for `reference`, usable for `counter` subsequent
    /// `get` calls before it must be re-verified.
    pub fn put(&mut self, reference: u16, secret: Secret, counter: u32) {
        if counter == 0 {
            self.entries.remove(&reference);
            return;
        }
        self.entries.insert(reference, CachedPin { secret, uses_left: counter });
    }

    /// Returns the cached PIN and decrements its remaining-uses counter,
    /// wiping the entry once it is exhausted.
    pub fn get(&mut self, reference: u16) -> Option<Secret> {
        let exhausted = {
            let entry = self.entries.get_mut(&reference)?;
            entry.uses_left = entry.uses_left.saturating_sub(1);
            entry.uses_left == 0
        };
        let secret = self.entries.get(&reference).map(|e| e.secret.clone());
        if exhausted {
            self.entries.remove(&reference);
        }
        secret
    }

    pub fn invalidate(&mut self, reference: u16) {
        self.entries.remove(&reference);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_cached(&self, reference: u16) -> bool {
        self.entries.contains_key(&reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_denies_caching() {
        let config = Config::default();
        assert_eq!(eligibility(&config, ReaderCaps::empty(), false), Err(CacheDenial::Disabled));
    }

    #[test]
    fn pin_pad_reader_denies_caching_even_when_enabled() {
        let config = Config { use_pin_cache: true, ..Config::default() };
        assert_eq!(eligibility(&config, ReaderCaps::PIN_PAD, false), Err(CacheDenial::PinPadReader));
    }

    #[test]
    fn user_consent_sharer_denies_caching() {
        let config = Config { use_pin_cache: true, ..Config::default() };
        assert_eq!(eligibility(&config, ReaderCaps::empty(), true), Err(CacheDenial::UserConsentRequired));
    }

    #[test]
    fn enabled_non_pinpad_no_consent_is_eligible() {
        let config = Config { use_pin_cache: true, ..Config::default() };
        assert_eq!(eligibility(&config, ReaderCaps::empty(), false), Ok(()));
    }

    #[test]
    fn get_counts_down_and_wipes_on_exhaustion() {
        let mut cache = PinCache::new();
        cache.put(0x01, Secret::new(b"1234".to_vec()), 2);
        assert!(cache.get(0x01).is_some());
        assert!(cache.is_cached(0x01));
        assert!(cache.get(0x01).is_some());
        assert!(!cache.is_cached(0x01));
        assert!(cache.get(0x01).is_none());
    }

    #[test]
    fn zero_counter_never_caches() {
        let mut cache = PinCache::new();
        cache.put(0x01, Secret::new(b"1234".to_vec()), 0);
        assert!(!cache.is_cached(0x01));
    }

    #[test]
    fn invalidate_all_wipes_every_entry() {
        let mut cache = PinCache::new();
        cache.put(0x01, Secret::new(b"1234".to_vec()), 5);
        cache.put(0x02, Secret::new(b"5678".to_vec()), 5);
        cache.invalidate_all();
        assert!(!cache.is_cached(0x01));
        assert!(!cache.is_cached(0x02));
    }
}
