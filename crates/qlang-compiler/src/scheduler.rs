//! Worklist of bodies waiting to be lowered.
//!
//! Deduplication happens before an item reaches the queue: the package
//! context only enqueues a function or method the first time its `USED`
//! flag is set. The queue itself is a stack, so the most recently marked
//! body is lowered first.

use crate::symbol::{FuncId, TypeId};

/// A body that can be scheduled for lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItem<'ast> {
    /// Package-level function.
    Func(FuncId),
    /// Method `name` on a type.
    Method(TypeId, &'ast str),
}

/// Pending work plus counters for diagnostics.
#[derive(Debug, Default)]
pub struct Scheduler<'ast> {
    queue: Vec<WorkItem<'ast>>,
    scheduled: usize,
    lowered: usize,
}

impl<'ast> Scheduler<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an item. Callers guarantee each item is pushed at most once.
    pub fn push(&mut self, item: WorkItem<'ast>) {
        self.scheduled += 1;
        self.queue.push(item);
    }

    /// Take the most recently scheduled item.
    pub fn pop(&mut self) -> Option<WorkItem<'ast>> {
        self.queue.pop()
    }

    /// Record a body whose lowering finished without error.
    pub fn record_lowered(&mut self) {
        self.lowered += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total items ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Total bodies lowered successfully.
    pub fn lowered(&self) -> usize {
        self.lowered
    }
}
