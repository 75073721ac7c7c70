//! Abort signals for listener removal.
//!
//! An [`AbortController`] owns an [`AbortSignal`]; passing the signal in
//! [`ListenerOptions`](crate::ListenerOptions) ties the registration's
//! lifetime to it. Aborting runs every registered abort callback exactly
//! once, in registration order.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

type AbortCallback = Box<dyn FnOnce()>;

/// Key of one abort callback, used to [`forget`](AbortSignal::forget) it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbortHandle(u64);

#[derive(Default)]
struct SignalInner {
    aborted: Cell<bool>,
    next: Cell<u64>,
    callbacks: RefCell<Vec<(AbortHandle, AbortCallback)>>,
}

/// A shared, single-threaded abort flag.
///
/// Clones observe the same state.
#[derive(Clone, Default)]
pub struct AbortSignal {
    inner: Rc<SignalInner>,
}

impl AbortSignal {
    /// A signal that is already aborted.
    pub fn new_aborted() -> Self {
        let signal = Self::default();
        signal.inner.aborted.set(true);
        signal
    }

    /// Whether the signal has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.get()
    }

    /// Run `f` when the signal aborts.
    ///
    /// Has no effect once the signal is already aborted. The returned handle
    /// drops the callback again via [`forget`](Self::forget).
    pub fn on_abort(&self, f: impl FnOnce() + 'static) -> AbortHandle {
        let handle = AbortHandle(self.inner.next.get());
        self.inner.next.set(handle.0 + 1);
        if !self.is_aborted() {
            self.inner.callbacks.borrow_mut().push((handle, Box::new(f)));
        }
        handle
    }

    /// Drop the abort callback behind `handle` without running it.
    ///
    /// Unknown or already-run handles are ignored.
    pub fn forget(&self, handle: AbortHandle) {
        self.inner
            .callbacks
            .borrow_mut()
            .retain(|(key, _)| *key != handle);
    }

    /// Number of abort callbacks still waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }

    fn abort(&self) {
        if self.inner.aborted.replace(true) {
            return;
        }
        // Callbacks may touch the signal again; never run them under the borrow.
        let callbacks = std::mem::take(&mut *self.inner.callbacks.borrow_mut());
        for (_, callback) in callbacks {
            callback();
        }
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Owner of an [`AbortSignal`].
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    /// Create a controller with a fresh signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// The controlled signal.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort the signal. Idempotent.
    pub fn abort(&self) {
        self.signal.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_runs_callbacks_once() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        signal.on_abort(move || h.set(h.get() + 1));
        let h = Rc::clone(&hits);
        signal.on_abort(move || h.set(h.get() + 10));

        assert!(!signal.is_aborted());
        controller.abort();
        controller.abort();
        assert!(signal.is_aborted());
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn test_forget_drops_callback() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let first = signal.on_abort(move || h.set(h.get() + 1));
        let h = Rc::clone(&hits);
        signal.on_abort(move || h.set(h.get() + 10));
        assert_eq!(signal.pending(), 2);

        signal.forget(first);
        signal.forget(first);
        assert_eq!(signal.pending(), 1);

        controller.abort();
        assert_eq!(hits.get(), 10);
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn test_on_abort_after_abort_is_ignored() {
        let signal = AbortSignal::new_aborted();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        signal.on_abort(move || h.set(1));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_callback_may_register_during_abort() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let inner = signal.clone();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        signal.on_abort(move || {
            // Already aborted: ignored instead of panicking on the borrow.
            inner.on_abort(move || h.set(1));
        });
        controller.abort();
        assert_eq!(hits.get(), 0);
    }
}
