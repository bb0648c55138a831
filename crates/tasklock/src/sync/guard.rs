//! RAII scope guard for task mutexes

use crate::sync::Lockable;
use crate::ticks::Ticks;

/// Scope-bound owner of one lock acquisition.
///
/// A guard binds a lock reference to a local ownership flag. Whatever way
/// the enclosing scope is left — normal return, early return, or unwind —
/// dropping the guard releases the lock iff this guard still owns it, so
/// an acquisition can never leak out of its scope.
///
/// Four construction policies select the initial transition:
/// [`new`](Self::new) blocks until acquired, [`deferred`](Self::deferred)
/// starts unowned, [`try_new`](Self::try_new) makes one non-suspending
/// attempt, and [`with_timeout`](Self::with_timeout) attempts under a tick
/// deadline. The latter two always return a guard; query
/// [`owns_lock`](Self::owns_lock) for the outcome.
///
/// Acquire and release methods are idempotent: acquiring while owned and
/// releasing while unowned are no-ops, so a guard can never double-lock or
/// double-unlock its mutex. Only one guard may own a given acquisition;
/// the type is not clonable.
pub struct LockGuard<'a, M: Lockable> {
    mutex: &'a M,
    owns: bool,
}

impl<'a, M: Lockable> LockGuard<'a, M> {
    /// Bind `mutex` and acquire it, suspending the calling task until the
    /// lock is granted. The returned guard always owns the lock.
    pub fn new(mutex: &'a M) -> Self {
        let mut guard = Self { mutex, owns: false };
        guard.lock();
        guard
    }

    /// Bind `mutex` without touching it. Acquire later through
    /// [`lock`](Self::lock), [`try_lock`](Self::try_lock) or
    /// [`try_lock_for`](Self::try_lock_for).
    pub fn deferred(mutex: &'a M) -> Self {
        Self { mutex, owns: false }
    }

    /// Bind `mutex` and make one non-suspending acquisition attempt.
    /// Returns immediately either way; check [`owns_lock`](Self::owns_lock).
    pub fn try_new(mutex: &'a M) -> Self {
        let mut guard = Self { mutex, owns: false };
        guard.try_lock();
        guard
    }

    /// Bind `mutex` and attempt acquisition for up to `timeout` ticks.
    /// Returns once acquired or the deadline passes; check
    /// [`owns_lock`](Self::owns_lock).
    pub fn with_timeout(mutex: &'a M, timeout: Ticks) -> Self {
        let mut guard = Self { mutex, owns: false };
        guard.try_lock_for(timeout);
        guard
    }

    /// Acquire the lock, suspending until granted. No-op when this guard
    /// already owns it.
    pub fn lock(&mut self) {
        if !self.owns {
            self.mutex.lock();
            self.owns = true;
        }
    }

    /// Acquire without suspending. Returns the ownership state, which is
    /// left untouched when the guard already owns the lock.
    pub fn try_lock(&mut self) -> bool {
        if !self.owns {
            self.owns = self.mutex.try_lock();
        }
        self.owns
    }

    /// Acquire under a tick deadline. Returns the ownership state; an
    /// existing hold is preserved, not re-entered.
    pub fn try_lock_for(&mut self, timeout: Ticks) -> bool {
        if !self.owns {
            self.owns = self.mutex.try_lock_for(timeout);
        }
        self.owns
    }

    /// Release the lock if this guard owns it; otherwise a no-op.
    pub fn unlock(&mut self) {
        if self.owns {
            self.owns = false;
            self.mutex.unlock();
        }
    }

    /// Whether this guard owns the lock.
    ///
    /// Reports the guard's own flag — the authority on whether dropping it
    /// will release — not the lock's holder query.
    pub fn owns_lock(&self) -> bool {
        self.owns
    }
}

impl<M: Lockable> Drop for LockGuard<'_, M> {
    fn drop(&mut self) {
        self.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{Mutex, RecursiveMutex};
    use crate::ticks;

    #[test]
    fn test_immediate_guard_owns_on_construction() {
        let mutex = Mutex::new();

        {
            let guard = LockGuard::new(&mutex);
            assert!(guard.owns_lock());
            assert!(mutex.is_locked());
        }

        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_deferred_guard_starts_unowned() {
        let mutex = Mutex::new();

        let mut guard = LockGuard::deferred(&mutex);
        assert!(!guard.owns_lock());
        assert!(!mutex.is_locked());

        guard.lock();
        assert!(guard.owns_lock());
        assert!(mutex.is_locked());
    }

    #[test]
    fn test_try_guard_against_free_lock() {
        let mutex = Mutex::new();

        let guard = LockGuard::try_new(&mutex);
        assert!(guard.owns_lock());
    }

    #[test]
    fn test_try_guard_against_held_lock() {
        let mutex = Mutex::new();

        let first = LockGuard::new(&mutex);
        let second = LockGuard::try_new(&mutex);

        assert!(first.owns_lock());
        assert!(!second.owns_lock());

        drop(second);
        // The failed guard must not have released the hold it never had
        assert!(mutex.is_locked());
        drop(first);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_timed_guard_against_free_lock() {
        let mutex = Mutex::new();

        let guard = LockGuard::with_timeout(&mutex, ticks::from_millis(10));
        assert!(guard.owns_lock());
    }

    #[test]
    fn test_acquire_is_idempotent_while_owned() {
        let mutex = Mutex::new();

        let mut guard = LockGuard::new(&mutex);
        // All three acquires keep the existing hold without re-entering
        guard.lock();
        assert!(guard.try_lock());
        assert!(guard.try_lock_for(0));
        assert!(guard.owns_lock());

        guard.unlock();
        assert!(!mutex.is_locked());
        assert_eq!(mutex.unlock_failures(), 0);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mutex = Mutex::new();

        let mut guard = LockGuard::new(&mutex);
        guard.unlock();
        guard.unlock();

        assert!(!guard.owns_lock());
        assert!(!mutex.is_locked());
        assert_eq!(mutex.unlock_failures(), 0);
    }

    #[test]
    fn test_drop_after_manual_unlock_releases_nothing() {
        let mutex = Mutex::new();

        {
            let mut guard = LockGuard::new(&mutex);
            guard.unlock();
        }

        assert_eq!(mutex.unlock_failures(), 0);
    }

    #[test]
    fn test_guard_over_recursive_mutex_releases_one_hold() {
        let mutex = RecursiveMutex::new();

        let outer = LockGuard::new(&mutex);
        {
            let inner = LockGuard::new(&mutex);
            assert!(inner.owns_lock());
            assert_eq!(mutex.hold_count(), 2);
        }

        // Inner guard released exactly its own hold
        assert!(mutex.is_locked());
        assert_eq!(mutex.hold_count(), 1);

        drop(outer);
        assert!(!mutex.is_locked());
        assert_eq!(mutex.unlock_failures(), 0);
    }

    #[test]
    fn test_reacquire_after_manual_unlock() {
        let mutex = Mutex::new();

        let mut guard = LockGuard::new(&mutex);
        guard.unlock();
        assert!(!mutex.is_locked());

        assert!(guard.try_lock());
        assert!(mutex.is_locked());
    }
}
