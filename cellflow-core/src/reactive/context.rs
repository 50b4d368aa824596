//! Evaluation Context
//!
//! The evaluation context tracks which formula or effect function is
//! currently running. Source cells consult it before accepting a write:
//! mutating the graph from inside an evaluation is rejected with
//! [`CellError::ReentrantMutation`](crate::CellError::ReentrantMutation).
//!
//! # Implementation
//!
//! The context is a stack of cell IDs owned by the [`Runtime`](super::Runtime).
//! Entering an evaluation pushes the cell; the returned guard pops it when
//! dropped, so the stack stays balanced even if the function panics.
//!
//! The stack supports nesting: a formula may construct other formulas while
//! it runs, and construction evaluates eagerly.

use std::cell::RefCell;

use super::CellId;

/// Stack of the evaluations currently in progress.
#[derive(Debug, Default)]
pub(crate) struct EvalContext {
    stack: RefCell<Vec<CellId>>,
}

impl EvalContext {
    /// Enter an evaluation of `id`.
    ///
    /// The evaluation ends when the returned guard is dropped.
    pub(crate) fn enter(&self, id: CellId) -> EvalGuard<'_> {
        self.stack.borrow_mut().push(id);
        EvalGuard { context: self, id }
    }

    /// Check if any evaluation is in progress.
    pub(crate) fn is_active(&self) -> bool {
        !self.stack.borrow().is_empty()
    }

    /// The innermost cell being evaluated, if any.
    pub(crate) fn current(&self) -> Option<CellId> {
        self.stack.borrow().last().copied()
    }
}

/// Guard that leaves the evaluation when dropped.
#[derive(Debug)]
pub(crate) struct EvalGuard<'a> {
    context: &'a EvalContext,
    id: CellId,
}

impl Drop for EvalGuard<'_> {
    fn drop(&mut self) {
        let popped = self.context.stack.borrow_mut().pop();

        // Guards must be dropped in reverse order of entry.
        if let Some(id) = popped {
            debug_assert_eq!(
                id, self.id,
                "EvalContext mismatch: expected {:?}, got {:?}",
                self.id, id
            );
        }
    }
}
