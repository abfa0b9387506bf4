//! 401 sign-out de-duplication.
//!
//! Several authenticated requests can be in flight when a session dies
//! server-side, and each of them will come back with a 401. Only the first
//! observer may trigger the sign-out side effect (clear session, return to
//! the login screen); the rest are dropped, not queued. The guard resets
//! unconditionally once sign-out completes so a later 401 from a fresh
//! session can trigger again.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SignOutGuard {
    in_progress: AtomicBool,
}

impl SignOutGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the sign-out. Returns true for exactly one caller per
    /// window; everyone else gets false until `finish` is called.
    pub fn begin(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the guard after the sign-out side effect has completed.
    /// Must run on every path out of sign-out, including failures.
    pub fn finish(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_only_first_observer_wins() {
        let guard = SignOutGuard::new();
        assert!(guard.begin());
        assert!(!guard.begin());
        assert!(!guard.begin());
    }

    #[test]
    fn test_guard_resets_after_finish() {
        let guard = SignOutGuard::new();
        assert!(guard.begin());
        guard.finish();
        assert!(guard.begin());
    }

    #[test]
    fn test_concurrent_observers_admit_exactly_one() {
        let guard = Arc::new(SignOutGuard::new());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let guard = Arc::clone(&guard);
            handles.push(std::thread::spawn(move || guard.begin()));
        }

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|won| *won)
            .count();
        assert_eq!(admitted, 1);
    }
}
