//! On-disk file-content cache (spec §6 "Persistence").
//!
//! Raw file-content dumps keyed by the absolute path's hex form, stored
//! under a `.eid` directory. Opaque format: whatever bytes the card
//! returned for that file are written back verbatim.

use crate::path::Path;
use std::io;

pub struct FileCache {
    root: std::path::PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, path: &Path) -> std::path::PathBuf {
        let mut key = String::new();
        if let Some(aid) = &path.aid {
            key.push_str(&crate::bytes::bin_to_hex(aid));
            key.push('_');
        }
        key.push_str(&crate::bytes::bin_to_hex(&path.bytes));
        self.root.join(key)
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        std::fs::read(self.entry_path(path)).ok()
    }

    pub fn put(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.entry_path(path), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_tempdir() {
        let dir = std::env::temp_dir().join(format!("sc-pkcs15-test-{:p}", &0u8));
        let cache = FileCache::new(&dir);
        let path = Path::file_id(0x5015);
        cache.put(&path, &[1, 2, 3]).unwrap();
        assert_eq!(cache.get(&path), Some(vec![1, 2, 3]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn miss_returns_none() {
        let dir = std::env::temp_dir().join("sc-pkcs15-test-miss-does-not-exist");
        let cache = FileCache::new(&dir);
        assert_eq!(cache.get(&Path::file_id(0x1234)), None);
    }
}
