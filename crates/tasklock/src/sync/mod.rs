//! Mutual-exclusion contract layer
//!
//! Two lock flavors with an identical surface — [`Mutex`] and
//! [`RecursiveMutex`] — plus the [`LockGuard`] RAII adapter that is generic
//! over the [`Lockable`] capability set. The flavors are deliberately
//! independent types: whether re-entrant acquisition is legal is decided
//! when the lock is constructed, and a shared supertype would let callers
//! lean on recursion a non-recursive lock does not provide.

mod guard;
mod lockable;
mod mutex;
mod recursive;

pub use guard::LockGuard;
pub use lockable::Lockable;
pub use mutex::Mutex;
pub use recursive::RecursiveMutex;
