//! Guard against bridge traffic after library shutdown.
//!
//! Once the library has been shut down, creating or destroying a wrapper is
//! a use-after-teardown bug on the caller's side. The flag is recorded in
//! all builds; the assertions themselves compile out of release builds.

use std::sync::atomic::{AtomicBool, Ordering};

pub struct ShutdownChecker {
    shutdown: AtomicBool,
}

impl ShutdownChecker {
    pub const fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
        }
    }

    /// Marks shutdown. May be called at most once; the transition is
    /// one-way.
    pub fn set_is_shutdown(&self) {
        let was = self.shutdown.swap(true, Ordering::SeqCst);
        debug_assert!(!was, "shutdown flagged twice");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    #[track_caller]
    pub fn assert_not_shutdown(&self) {
        debug_assert!(
            !self.is_shutdown(),
            "bridge object created or destroyed after shutdown"
        );
    }
}

static CHECKER: ShutdownChecker = ShutdownChecker::new();

/// Flags the process-wide bridge as shut down.
pub fn set_is_shutdown() {
    log::debug!("bridge shutdown flagged");
    CHECKER.set_is_shutdown();
}

pub fn is_shutdown() -> bool {
    CHECKER.is_shutdown()
}

/// Called by every wrapper constructor and destructor.
#[track_caller]
pub fn assert_not_shutdown() {
    CHECKER.assert_not_shutdown();
}
