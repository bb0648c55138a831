//! Recursive task mutex

use crate::sched::{RawLock, TaskId};
use crate::sync::Lockable;
use crate::ticks::{self, Ticks};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Exclusive lock the holding task may acquire again without deadlocking.
///
/// Each successful acquisition by the holder raises a hold count kept by
/// the native lock object; the lock frees up for other tasks only once
/// `unlock` has been called the same number of times. Tasks other than the
/// holder block or fail exactly as on [`Mutex`](crate::sync::Mutex).
///
/// This is a separate type rather than a variant of `Mutex`: re-entrancy
/// is chosen at construction, and code written against a recursive lock
/// must not be handed a non-recursive one.
///
/// Task context only — never call these methods from an interrupt handler.
pub struct RecursiveMutex {
    /// The native lock object. `None` when creation failed.
    handle: Option<Box<RawLock>>,

    /// Unlock calls the native object rejected. Advisory.
    failed_unlocks: AtomicUsize,
}

impl RecursiveMutex {
    /// Create the native recursive lock object.
    ///
    /// Never blocks. Check [`is_valid`](Self::is_valid) afterwards on
    /// ports where allocation can fail; an invalid instance stays invalid
    /// and must be discarded.
    pub fn new() -> Self {
        Self {
            handle: RawLock::recursive(),
            failed_unlocks: AtomicUsize::new(0),
        }
    }

    /// Whether the native lock object was created successfully.
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Acquire one hold, suspending the calling task until granted.
    /// Succeeds immediately when the caller already holds the lock.
    pub fn lock(&self) {
        // Loop in case a port's indefinite wait can return early.
        while !self.try_lock_for(ticks::max_delay()) {}
    }

    /// Acquire one hold without suspending.
    pub fn try_lock(&self) -> bool {
        self.try_lock_for(0)
    }

    /// Acquire one hold, suspending the calling task for up to `timeout`
    /// ticks ([`ticks::max_delay`] suspends indefinitely).
    pub fn try_lock_for(&self, timeout: Ticks) -> bool {
        match &self.handle {
            Some(lock) => lock.acquire(timeout),
            None => false,
        }
    }

    /// Release one hold; the last one frees the lock.
    ///
    /// A release the native object rejects (caller is not the holder, or
    /// the count is already balanced) is swallowed and tallied in
    /// [`unlock_failures`](Self::unlock_failures).
    pub fn unlock(&self) {
        if let Some(lock) = &self.handle {
            if lock.release().is_err() {
                self.failed_unlocks.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Whether some task currently holds the lock. Advisory snapshot.
    pub fn is_locked(&self) -> bool {
        self.holder().is_some()
    }

    /// The task currently holding the lock, if any. Advisory snapshot.
    pub fn holder(&self) -> Option<TaskId> {
        self.handle.as_deref().and_then(RawLock::holder)
    }

    /// Unmatched acquisitions by the current holder. Advisory snapshot,
    /// 0 when the lock is free.
    pub fn hold_count(&self) -> usize {
        self.handle.as_deref().map_or(0, RawLock::hold_depth)
    }

    /// Number of unlock calls the native object rejected so far.
    pub fn unlock_failures(&self) -> usize {
        self.failed_unlocks.load(Ordering::Relaxed)
    }
}

impl Default for RecursiveMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockable for RecursiveMutex {
    fn lock(&self) {
        RecursiveMutex::lock(self);
    }

    fn try_lock(&self) -> bool {
        RecursiveMutex::try_lock(self)
    }

    fn try_lock_for(&self, timeout: Ticks) -> bool {
        RecursiveMutex::try_lock_for(self, timeout)
    }

    fn unlock(&self) {
        RecursiveMutex::unlock(self);
    }
}
