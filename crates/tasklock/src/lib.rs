//! Task-level mutual exclusion primitives
//!
//! This crate provides the lock contract layer for tasks running under a
//! preemptive scheduler:
//! - Tick durations and the block-forever sentinel
//! - [`Mutex`]: non-recursive exclusive lock, priority inheritance
//!   delegated to the underlying scheduler primitive
//! - [`RecursiveMutex`]: re-entrant flavor whose hold count is kept by the
//!   underlying primitive
//! - [`LockGuard`]: scope-bound RAII adapter supporting immediate,
//!   deferred, try-once and timed acquisition
//!
//! All operations are for task context only. Do not call them from an
//! interrupt handler on ports that have one; this is a caller obligation
//! and is not runtime-checked.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod sched;
pub mod sync;
pub mod ticks;

pub use sched::TaskId;
pub use sync::{LockGuard, Lockable, Mutex, RecursiveMutex};
pub use ticks::{max_delay, Ticks};
