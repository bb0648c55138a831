//! Task identity

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_TASK: TaskId = TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed));
}

impl TaskId {
    /// Identity of the calling task.
    ///
    /// On the host port every OS thread is one task; the id is assigned on
    /// first use and stays stable for the thread's lifetime.
    pub fn current() -> Self {
        CURRENT_TASK.with(|id| *id)
    }

    /// Get the numeric ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_stable_within_task() {
        let first = TaskId::current();
        let second = TaskId::current();
        assert_eq!(first, second);
    }

    #[test]
    fn test_current_differs_across_tasks() {
        let here = TaskId::current();
        let there = std::thread::spawn(TaskId::current).join().unwrap();
        assert_ne!(here, there);
        assert!(there.as_u64() > 0);
    }
}
