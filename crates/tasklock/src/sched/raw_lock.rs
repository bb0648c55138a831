//! Native exclusive-lock object, host-port edition

use crate::sched::TaskId;
use crate::ticks::{self, Ticks};
use crossbeam::atomic::AtomicCell;
use parking_lot::{Condvar, Mutex as ParkingLotMutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Errors reported by the native release operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ReleaseError {
    /// Release called by a task that does not hold the lock.
    #[error("release called by non-holder task {0:?}")]
    NotOwner(TaskId),

    /// Release called while no task holds the lock.
    #[error("release called on an unheld lock")]
    NotHeld,
}

/// Owner and hold depth, guarded by the wait mutex.
struct HoldState {
    owner: Option<TaskId>,
    depth: usize,
}

/// The scheduler's exclusive-lock object.
///
/// On this port a blocked acquire parks the calling thread on a condvar
/// until the lock frees up or the tick deadline passes. A recursive handle
/// lets the holding task re-acquire, bumping the hold count; an exclusive
/// handle makes the holder wait on itself exactly like any other contender.
///
/// Wake order after a release is the condvar's wake policy; no fairness
/// layer is added here. Priority inheritance is the scheduler's concern.
pub(crate) struct RawLock {
    recursive: bool,

    /// Authoritative owner and hold depth.
    state: ParkingLotMutex<HoldState>,

    /// Signalled once per full release.
    available: Condvar,

    /// Mirror of `state.owner` for holder queries without taking the lock.
    owner: AtomicCell<Option<TaskId>>,

    /// Mirror of `state.depth`, advisory like `owner`.
    depth: AtomicUsize,
}

impl RawLock {
    /// Create a non-recursive lock object.
    ///
    /// Returns `None` when the port cannot allocate one; the host port
    /// always can.
    pub(crate) fn exclusive() -> Option<Box<RawLock>> {
        Some(Box::new(RawLock::new(false)))
    }

    /// Create a recursive lock object. `None` on allocation failure.
    pub(crate) fn recursive() -> Option<Box<RawLock>> {
        Some(Box::new(RawLock::new(true)))
    }

    fn new(recursive: bool) -> RawLock {
        RawLock {
            recursive,
            state: ParkingLotMutex::new(HoldState {
                owner: None,
                depth: 0,
            }),
            available: Condvar::new(),
            owner: AtomicCell::new(None),
            depth: AtomicUsize::new(0),
        }
    }

    /// Acquire one hold, waiting up to `timeout` ticks.
    ///
    /// A zero timeout polls once without suspending. [`ticks::max_delay`]
    /// waits until the lock is granted. On a recursive handle the current
    /// holder succeeds immediately and the hold count grows; on an
    /// exclusive handle the holder waits on itself like any other task.
    pub(crate) fn acquire(&self, timeout: Ticks) -> bool {
        let me = TaskId::current();
        let mut state = self.state.lock();

        if self.recursive && state.owner == Some(me) {
            state.depth += 1;
            self.depth.store(state.depth, Ordering::Relaxed);
            return true;
        }

        if state.owner.is_none() {
            self.grant(&mut state, me);
            return true;
        }

        if timeout == 0 {
            return false;
        }

        if timeout == ticks::max_delay() {
            while state.owner.is_some() {
                self.available.wait(&mut state);
            }
        } else {
            let deadline = Instant::now() + ticks::duration_from_ticks(timeout);
            while state.owner.is_some() {
                if self.available.wait_until(&mut state, deadline).timed_out() {
                    break;
                }
            }
        }

        if state.owner.is_none() {
            self.grant(&mut state, me);
            true
        } else {
            false
        }
    }

    fn grant(&self, state: &mut HoldState, task: TaskId) {
        state.owner = Some(task);
        state.depth = 1;
        self.owner.store(Some(task));
        self.depth.store(1, Ordering::Relaxed);
    }

    /// Release one hold.
    ///
    /// The last hold frees the lock and wakes one waiter. Fails when the
    /// calling task is not the holder.
    pub(crate) fn release(&self) -> Result<(), ReleaseError> {
        let me = TaskId::current();
        let mut state = self.state.lock();

        match state.owner {
            Some(owner) if owner == me => {
                state.depth -= 1;
                self.depth.store(state.depth, Ordering::Relaxed);
                if state.depth == 0 {
                    state.owner = None;
                    self.owner.store(None);
                    drop(state);
                    self.available.notify_one();
                }
                Ok(())
            }
            Some(_) => Err(ReleaseError::NotOwner(me)),
            None => Err(ReleaseError::NotHeld),
        }
    }

    /// Current holder, if any. Point-in-time snapshot.
    pub(crate) fn holder(&self) -> Option<TaskId> {
        self.owner.load()
    }

    /// Current hold depth. Point-in-time snapshot, 0 when free.
    pub(crate) fn hold_depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}
