//! Reactive state: typed signals with bindings and batched delivery.
//!
//! A [`Signal`] holds a value readable from any thread; writes happen
//! on the main thread and fire bindings. [`batch`] coalesces writes so
//! each binding observes only the final value, delivered once, in the
//! order bindings were first triggered. Every write marks a global
//! dirty flag the frame loop tests and clears.

pub mod batch;
pub mod signal;

pub use batch::{batch, is_batching};
pub use signal::{Signal, Unbind};

use std::sync::atomic::{AtomicBool, Ordering};

/// Global "something changed, render next frame" flag.
static DIRTY: AtomicBool = AtomicBool::new(false);

/// Mark the UI dirty. Called by every signal write; applications can
/// call it directly after out-of-band mutations.
pub fn mark_dirty() {
    DIRTY.store(true, Ordering::SeqCst);
}

/// Atomically read and clear the dirty flag.
pub fn take_dirty() -> bool {
    DIRTY.swap(false, Ordering::SeqCst)
}

/// Read the dirty flag without clearing it.
pub fn is_dirty() -> bool {
    DIRTY.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_flag_set_and_take() {
        let _ = take_dirty();
        assert!(!is_dirty());
        mark_dirty();
        assert!(is_dirty());
        assert!(take_dirty());
        assert!(!is_dirty());
        assert!(!take_dirty());
    }
}
