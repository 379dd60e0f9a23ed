//! Quiet-period debouncing for search-as-you-type
//!
//! Every keystroke arms a new quiet period and invalidates the previous one;
//! only the period that survives untouched reports settled, so at most one
//! provider call fires per typing burst. The interval is a tunable, not a
//! constant.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default quiet period after the last keystroke
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub struct Debouncer {
    quiet: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    /// Arm a quiet period for the latest input and wait it out.
    ///
    /// Returns `true` when no newer input arrived in the meantime; the caller
    /// then performs the search. A superseded wait returns `false` and the
    /// caller does nothing.
    pub async fn settle(&self) -> bool {
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;
        issued == self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate any pending quiet period (input cleared, selection made)
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
