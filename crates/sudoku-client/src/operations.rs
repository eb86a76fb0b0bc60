//! Tracking of in-flight asynchronous operations.
//!
//! The tracker is a cheap cloneable handle; every clone observes the same set.
//! [`OperationTracker::begin`] returns an [`OperationGuard`] that removes the
//! tag when dropped, so a request that ends on any path releases its tag.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Kinds of asynchronous work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Solve,
    Import,
}

impl Operation {
    /// Stable tag name
    pub fn tag(self) -> &'static str {
        match self {
            Operation::Solve => "solve",
            Operation::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Shared set of operations currently in flight
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    active: Rc<RefCell<BTreeSet<Operation>>>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as started; the tag is released when the guard drops
    pub fn begin(&self, op: Operation) -> OperationGuard {
        if self.active.borrow_mut().insert(op) {
            debug!(op = op.tag(), "operation started");
        }
        OperationGuard {
            tracker: self.clone(),
            op,
        }
    }

    /// Remove an operation tag. Removing an absent tag is a no-op.
    pub fn end(&self, op: Operation) {
        if self.active.borrow_mut().remove(&op) {
            debug!(op = op.tag(), "operation finished");
        }
    }

    /// Whether anything is in flight
    pub fn is_busy(&self) -> bool {
        !self.active.borrow().is_empty()
    }

    /// Whether a specific operation is in flight
    pub fn is_busy_with(&self, op: Operation) -> bool {
        self.active.borrow().contains(&op)
    }

    /// Snapshot of the active tags
    pub fn active(&self) -> Vec<Operation> {
        self.active.borrow().iter().copied().collect()
    }
}

/// Holds an operation tag for as long as it lives
#[must_use = "dropping the guard immediately ends the operation"]
#[derive(Debug)]
pub struct OperationGuard {
    tracker: OperationTracker,
    op: Operation,
}

impl OperationGuard {
    pub fn operation(&self) -> Operation {
        self.op
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.tracker.end(self.op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end_leaves_empty() {
        let tracker = OperationTracker::new();
        let guard = tracker.begin(Operation::Solve);
        assert!(tracker.is_busy());
        assert!(tracker.is_busy_with(Operation::Solve));
        assert!(!tracker.is_busy_with(Operation::Import));

        drop(guard);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_end_is_idempotent() {
        let tracker = OperationTracker::new();
        let guard = tracker.begin(Operation::Solve);
        tracker.end(Operation::Solve);
        tracker.end(Operation::Solve);
        assert!(!tracker.is_busy());

        // The guard dropping after an explicit end is also harmless
        drop(guard);
        assert!(tracker.active().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = OperationTracker::new();
        let view = tracker.clone();
        let _guard = tracker.begin(Operation::Import);
        assert!(view.is_busy_with(Operation::Import));
        assert_eq!(view.active(), vec![Operation::Import]);
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let tracker = OperationTracker::new();
        let inner = tracker.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = inner.begin(Operation::Solve);
            panic!("request blew up");
        }));
        assert!(result.is_err());
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_tags() {
        assert_eq!(Operation::Solve.tag(), "solve");
        assert_eq!(Operation::Import.to_string(), "import");
    }
}
