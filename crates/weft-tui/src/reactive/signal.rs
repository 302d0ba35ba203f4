//! Typed state cells with bindings.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::reactive::{batch, mark_dirty};

static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(0);

#[cfg(debug_assertions)]
static MAIN_THREAD: Mutex<Option<std::thread::ThreadId>> = Mutex::new(None);

/// Record the calling thread as the main thread. Writes from any other
/// thread abort debug builds. Called by the app runtime at startup.
pub(crate) fn pin_main_thread() {
    #[cfg(debug_assertions)]
    {
        let mut guard = MAIN_THREAD
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(std::thread::current().id());
    }
}

#[cfg(debug_assertions)]
fn assert_main_thread() {
    let guard = MAIN_THREAD.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(main) = *guard {
        assert_eq!(
            std::thread::current().id(),
            main,
            "Signal::set called off the main thread"
        );
    }
}

type BindingFn<T> = Box<dyn FnMut(&T) + Send>;

struct Binding<T> {
    id: u64,
    active: Arc<AtomicBool>,
    f: BindingFn<T>,
}

struct SignalInner<T> {
    value: RwLock<T>,
    bindings: Mutex<Vec<Binding<T>>>,
}

/// A reactive state cell.
///
/// `get` is safe from any thread; `set`/`update` belong to the main
/// thread and fire bindings in registration order. Cloning the signal
/// clones the handle, not the value.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle returned by [`Signal::bind`]; deactivates the binding.
///
/// Deactivation is immediate; the slot itself is reclaimed on the next
/// `set` to the cell.
pub struct Unbind {
    active: Arc<AtomicBool>,
}

impl Unbind {
    /// Deactivate the binding.
    pub fn unbind(self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

fn lock_bindings<T>(inner: &SignalInner<T>) -> MutexGuard<'_, Vec<Binding<T>>> {
    inner.bindings.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Create a signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                value: RwLock::new(value),
                bindings: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Read the current value (any thread).
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store a new value, mark the UI dirty, and fire bindings.
    ///
    /// Bindings fire on every `set`, including one that stores an
    /// equal value. Inside a batch the delivery is deferred and
    /// coalesced to the final value.
    pub fn set(&self, value: T) {
        #[cfg(debug_assertions)]
        assert_main_thread();

        {
            let mut guard = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = value;
        }
        mark_dirty();
        self.compact();
        self.fire();
    }

    /// Apply a function to the current value and store the result.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.get());
        self.set(next);
    }

    /// Register a binding, fired after each `set`. Returns the handle
    /// that deactivates it.
    pub fn bind(&self, f: impl FnMut(&T) + Send + 'static) -> Unbind {
        let active = Arc::new(AtomicBool::new(true));
        let binding = Binding {
            id: NEXT_BINDING_ID.fetch_add(1, Ordering::SeqCst),
            active: Arc::clone(&active),
            f: Box::new(f),
        };
        lock_bindings(&self.inner).push(binding);
        Unbind { active }
    }

    /// Number of live bindings (inactive ones linger until the next
    /// `set` compacts the list).
    pub fn binding_count(&self) -> usize {
        lock_bindings(&self.inner).len()
    }

    /// Drop deactivated bindings.
    fn compact(&self) {
        lock_bindings(&self.inner).retain(|b| b.active.load(Ordering::SeqCst));
    }

    fn fire(&self) {
        if batch::is_batching() {
            let ids: Vec<u64> = lock_bindings(&self.inner).iter().map(|b| b.id).collect();
            for id in ids {
                let signal = self.clone();
                batch::enqueue(
                    id,
                    Box::new(move || {
                        let value = signal.get();
                        signal.run_binding(id, &value);
                    }),
                );
            }
        } else {
            let value = self.get();
            self.run_all(&value);
        }
    }

    /// Run every active binding in registration order. Bindings are
    /// moved out of the lock while running so they may touch this
    /// signal (bind, unbind, even set) without deadlocking.
    fn run_all(&self, value: &T) {
        let mut running = std::mem::take(&mut *lock_bindings(&self.inner));
        for binding in &mut running {
            if binding.active.load(Ordering::SeqCst) {
                (binding.f)(value);
            }
        }
        let mut guard = lock_bindings(&self.inner);
        let added = std::mem::take(&mut *guard);
        running.extend(added);
        *guard = running;
    }

    /// Run one binding by id (batch flush path).
    fn run_binding(&self, id: u64, value: &T) {
        let mut running = std::mem::take(&mut *lock_bindings(&self.inner));
        for binding in &mut running {
            if binding.id == id && binding.active.load(Ordering::SeqCst) {
                (binding.f)(value);
            }
        }
        let mut guard = lock_bindings(&self.inner);
        let added = std::mem::take(&mut *guard);
        running.extend(added);
        *guard = running;
    }
}
