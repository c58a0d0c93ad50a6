//! Recognized configuration options (spec §6 "Configuration").

use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable disk cache read-through against the `.eid` directory.
    pub use_file_cache: bool,
    /// Enable the PIN cache (§4.J).
    pub use_pin_cache: bool,
    /// Max uses of a cached PIN between card operations that might
    /// invalidate it.
    pub pin_cache_counter: u32,
    /// Emit full APDU byte dumps at `trace` level. PIN-bearing command
    /// data is always redacted regardless of this flag.
    pub log_apdu_bytes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { use_file_cache: false, use_pin_cache: false, pin_cache_counter: 1, log_apdu_bytes: false }
    }
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(|_| ErrorKind::InvalidArguments.into())
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|_| Error::from(ErrorKind::FileNotFound))?;
        Self::from_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let c = Config::default();
        assert!(!c.use_file_cache);
        assert!(!c.use_pin_cache);
        assert_eq!(c.pin_cache_counter, 1);
    }

    #[test]
    fn parses_partial_toml() {
        let c = Config::from_str("use_pin_cache = true\npin_cache_counter = 5\n").unwrap();
        assert!(c.use_pin_cache);
        assert_eq!(c.pin_cache_counter, 5);
        assert!(!c.use_file_cache);
    }
}
