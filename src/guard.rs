use std::cell::RefCell;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Reentrant mutual exclusion around a value.
///
/// A thread that holds the guard may enter it again, which is what lets a
/// memoized function call back into its own cache while its outer call is
/// still running. Other threads block until the outermost entry is left.
///
/// The lock only hands out shared access, so the value sits in a `RefCell`.
/// Borrows are confined to the closures passed to [`Entered::read`] and
/// [`Entered::write`] and can thus never be held across a nested call.
pub struct Guard<T> {
    lock: ReentrantMutex<RefCell<T>>,
}

impl<T> Guard<T> {
    /// Guard a value.
    pub fn new(value: T) -> Self {
        Self { lock: ReentrantMutex::new(RefCell::new(value)) }
    }

    /// Enter the guard, blocking while another thread holds it.
    ///
    /// The guard is left when the returned value is dropped, including
    /// during unwinding.
    #[inline]
    pub fn enter(&self) -> Entered<'_, T> {
        let reentered = self.lock.is_owned_by_current_thread();
        Entered { inner: self.lock.lock(), reentered }
    }
}

impl<T: Default> Default for Guard<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Exclusive access to a guarded value for the current thread.
pub struct Entered<'a, T> {
    inner: ReentrantMutexGuard<'a, RefCell<T>>,
    reentered: bool,
}

impl<T> Entered<'_, T> {
    /// Whether the current thread already held the guard before entering.
    #[inline]
    pub fn reentered(&self) -> bool {
        self.reentered
    }

    /// Read the guarded value.
    #[inline]
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Mutate the guarded value.
    #[inline]
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}
