//! Optional threading capability (spec §5, §9 "Global reader/thread vtable").
//!
//! When a host provides its own mutex capability it implements [`Lock`];
//! when it does not, [`StdLock`] gives card-level operations a safe
//! default instead of leaving them unsynchronized. Both sides of one
//! logical operation (e.g. MSE + PSO) must run between one `lock()`/
//! `unlock()` pair so that no APDUs for a different operation interleave
//! on the same card (spec §5 "Ordering guarantees").

use parking_lot::lock_api::RawMutex as _;

pub trait Lock: Send + Sync {
    fn lock(&self);
    fn unlock(&self);
}

/// Default lock backed by `parking_lot`'s raw mutex, which (unlike
/// `std::sync::Mutex`) exposes `lock`/`unlock` without an RAII guard tied
/// to a borrow — matching the capability's explicit lock/unlock contract.
#[derive(Default)]
pub struct StdLock {
    raw: parking_lot::RawMutex,
}

impl Lock for StdLock {
    fn lock(&self) {
        self.raw.lock();
    }

    fn unlock(&self) {
        // SAFETY: only ever called by the same logical-operation owner that
        // just called `lock`, per the capability's documented contract.
        unsafe { self.raw.unlock() };
    }
}
