//! Batched binding delivery.
//!
//! A process-wide context tracks nesting depth, a pending map keyed by
//! binding id, and an insertion-order vector. Signals enqueue flush
//! jobs here while a batch is open; the outermost batch runs each job
//! once, in first-trigger order, with the signal's final value. The
//! depth counter is restored on unwind.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Job = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct BatchState {
    depth: u32,
    pending: HashMap<u64, Job>,
    order: Vec<u64>,
}

static BATCH: Mutex<Option<BatchState>> = Mutex::new(None);

fn state() -> MutexGuard<'static, Option<BatchState>> {
    BATCH.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns true while at least one batch is open.
pub fn is_batching() -> bool {
    state().as_ref().is_some_and(|s| s.depth > 0)
}

/// Queue a flush job for a binding. The first trigger of a binding id
/// fixes its position in the flush order; later triggers within the
/// batch replace the job (so the final value wins) without moving it.
///
/// Returns false when no batch is open and the caller should deliver
/// immediately.
pub(crate) fn enqueue(binding_id: u64, job: Job) -> bool {
    let mut guard = state();
    let Some(s) = guard.as_mut() else {
        return false;
    };
    if s.depth == 0 {
        return false;
    }
    if s.pending.insert(binding_id, job).is_none() {
        s.order.push(binding_id);
    }
    true
}

/// Run a closure with batched binding delivery.
///
/// Nested batches are supported; bindings run once, after the
/// outermost batch completes, each observing only the final value of
/// its signal. If the closure panics, the depth counter unwinds with
/// it and any pending deliveries of the outermost batch still run.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    {
        let mut guard = state();
        let s = guard.get_or_insert_with(BatchState::default);
        s.depth += 1;
    }
    let _guard = DepthGuard;
    f()
}

struct DepthGuard;

impl Drop for DepthGuard {
    fn drop(&mut self) {
        let jobs = {
            let mut guard = state();
            let Some(s) = guard.as_mut() else { return };
            s.depth = s.depth.saturating_sub(1);
            if s.depth > 0 {
                return;
            }
            let mut pending = std::mem::take(&mut s.pending);
            let order = std::mem::take(&mut s.order);
            order
                .into_iter()
                .filter_map(|id| pending.remove(&id))
                .collect::<Vec<_>>()
        };
        // Jobs run outside the lock so bindings may freely touch
        // signals (including opening new batches).
        tracing::debug!(jobs = jobs.len(), "flushing batch");
        for job in jobs {
            job();
        }
    }
}

/// The batch context is process-wide; tests that open batches
/// serialize on this lock so parallel test threads do not share a
/// flush.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    pub(crate) static SERIAL: Mutex<()> = Mutex::new(());
}
