//! Non-recursive task mutex

use crate::sched::{RawLock, TaskId};
use crate::sync::Lockable;
use crate::ticks::{self, Ticks};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Exclusive lock for protecting shared data between tasks.
///
/// Wraps one native scheduler lock object. Priority inheritance comes from
/// that object; this wrapper adds no inversion-avoidance logic of its own.
///
/// The lock is non-recursive: a task that already holds it and tries to
/// acquire again will fail (or deadlock on an unbounded wait), and a single
/// `unlock` always frees it. Use [`RecursiveMutex`](crate::sync::RecursiveMutex)
/// when nested acquisition is needed.
///
/// Task context only — never call these methods from an interrupt handler.
pub struct Mutex {
    /// The native lock object. `None` when creation failed.
    handle: Option<Box<RawLock>>,

    /// Unlock calls the native object rejected. Advisory.
    failed_unlocks: AtomicUsize,
}

impl Mutex {
    /// Create the native lock object.
    ///
    /// Never blocks. Check [`is_valid`](Self::is_valid) afterwards on
    /// ports where allocation can fail; an invalid instance stays invalid
    /// and must be discarded.
    pub fn new() -> Self {
        Self {
            handle: RawLock::exclusive(),
            failed_unlocks: AtomicUsize::new(0),
        }
    }

    /// Whether the native lock object was created successfully.
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Acquire, suspending the calling task until the lock is granted.
    pub fn lock(&self) {
        // Loop in case a port's indefinite wait can return early.
        while !self.try_lock_for(ticks::max_delay()) {}
    }

    /// Acquire without suspending. Returns true iff the lock was free.
    pub fn try_lock(&self) -> bool {
        self.try_lock_for(0)
    }

    /// Acquire, suspending the calling task for up to `timeout` ticks
    /// ([`ticks::max_delay`] suspends indefinitely). Returns true iff
    /// acquired before the deadline.
    pub fn try_lock_for(&self, timeout: Ticks) -> bool {
        match &self.handle {
            Some(lock) => lock.acquire(timeout),
            None => false,
        }
    }

    /// Release the lock.
    ///
    /// A release the native object rejects (the calling task is not the
    /// holder) is swallowed: the release path never fails. Such calls are
    /// tallied in [`unlock_failures`](Self::unlock_failures).
    pub fn unlock(&self) {
        if let Some(lock) = &self.handle {
            if lock.release().is_err() {
                self.failed_unlocks.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Whether some task currently holds the lock.
    ///
    /// Snapshot taken without synchronization against concurrent acquires;
    /// use it as a diagnostic, never as a locking protocol.
    pub fn is_locked(&self) -> bool {
        self.holder().is_some()
    }

    /// The task currently holding the lock, if any. Same advisory caveat
    /// as [`is_locked`](Self::is_locked).
    pub fn holder(&self) -> Option<TaskId> {
        self.handle.as_deref().and_then(RawLock::holder)
    }

    /// Number of unlock calls the native object rejected so far.
    pub fn unlock_failures(&self) -> usize {
        self.failed_unlocks.load(Ordering::Relaxed)
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockable for Mutex {
    fn lock(&self) {
        Mutex::lock(self);
    }

    fn try_lock(&self) -> bool {
        Mutex::try_lock(self)
    }

    fn try_lock_for(&self, timeout: Ticks) -> bool {
        Mutex::try_lock_for(self, timeout)
    }

    fn unlock(&self) {
        Mutex::unlock(self);
    }
}
