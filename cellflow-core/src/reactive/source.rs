//! Source Cell Implementation
//!
//! A source cell is the root of a propagation chain. It holds a value set
//! directly by external code and tracks which formulas depend on it.
//!
//! # How Source Cells Work
//!
//! 1. A source cell starts with a seed value and no subscribers.
//!
//! 2. Formulas that take the cell as an input subscribe to it.
//!
//! 3. `reset` stores a new value. If it equals the previous value nothing
//!    else happens; otherwise every direct subscriber is recomputed,
//!    depth-first, in the order it subscribed, before `reset` returns.
//!
//! 4. `swap` derives the new value from the current one and resets.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::{CellError, Result};

use super::node::{CellKind, Node};
use super::runtime::{Observable, Runtime};
use super::subscriber::CellId;

/// A settable cell holding a value of type `T`.
///
/// # Example
///
/// ```rust
/// use cellflow_core::reactive::Runtime;
///
/// let runtime = Runtime::new();
/// let count = runtime.source(0);
///
/// count.reset(5).unwrap();
/// count.swap(|n| n + 1).unwrap();
/// assert_eq!(count.get().unwrap(), 6);
/// ```
pub struct SourceCell<T> {
    node: Rc<Node<T>>,
}

impl<T> SourceCell<T>
where
    T: Clone + PartialEq + 'static,
{
    pub(crate) fn new(runtime: Runtime, value: T) -> Self {
        Self {
            node: Rc::new(Node::new(runtime, CellKind::Source, value)),
        }
    }

    /// Get the cell's unique ID.
    pub fn id(&self) -> CellId {
        self.node.id()
    }

    /// Get the cell's kind.
    pub fn kind(&self) -> CellKind {
        self.node.kind()
    }

    /// Get the current value.
    ///
    /// Fails if the cell has been destroyed.
    pub fn get(&self) -> Result<T> {
        self.node.get()
    }

    /// Set a new value and propagate it to subscribers.
    ///
    /// Setting a value equal to the current one notifies nobody. Fails if the
    /// cell has been destroyed, or if called while a formula or effect
    /// function is running.
    pub fn reset(&self, value: T) -> Result<()> {
        let id = self.id();
        if let Some(during) = self.node.runtime().context().current() {
            return Err(CellError::ReentrantMutation { id, during });
        }

        match self.node.replace(value)? {
            None => {
                debug!(cell = %id, "reset skipped, value unchanged");
                Ok(())
            }
            Some(subscribers) => {
                debug!(cell = %id, subscribers = subscribers.len(), "reset");
                self.node.notify(subscribers)
            }
        }
    }

    /// Update the value using a function of the current value.
    pub fn swap<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.get()?;
        self.reset(f(&current))
    }

    /// Update the value using a function of the current value and `args`.
    ///
    /// Pass several extra arguments as a tuple.
    pub fn swap_with<A, F>(&self, f: F, args: A) -> Result<()>
    where
        F: FnOnce(&T, A) -> T,
    {
        let current = self.get()?;
        self.reset(f(&current, args))
    }

    /// Destroy the cell and every formula downstream of it.
    ///
    /// Destroying an already destroyed cell does nothing.
    pub fn destroy(&self) {
        if self.node.destroy_subscribers() {
            self.node.mark_destroyed();
            debug!(cell = %self.id(), "destroyed source");
        }
    }

    /// Check if the cell has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.node.is_destroyed()
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.node.subscriber_count()
    }

    /// Check if the cell with `id` is subscribed to this one.
    pub fn has_subscriber(&self, id: CellId) -> bool {
        self.node.has_subscriber(id)
    }

    pub(crate) fn observable(&self) -> Rc<dyn Observable> {
        self.node.clone()
    }
}

impl<T> Clone for SourceCell<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for SourceCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceCell").field(&self.node).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn source_get_and_reset() {
        let runtime = Runtime::new();
        let source = runtime.source(0);
        assert_eq!(source.get().unwrap(), 0);
        assert_eq!(source.subscriber_count(), 0);

        source.reset(42).unwrap();
        assert_eq!(source.get().unwrap(), 42);
    }

    #[test]
    fn source_swap() {
        let runtime = Runtime::new();
        let source = runtime.source(10);
        source.swap(|v| v + 5).unwrap();
        assert_eq!(source.get().unwrap(), 15);
    }

    #[test]
    fn swap_passes_extra_arguments() {
        let runtime = Runtime::new();
        let source = runtime.source(1);
        let seen = RefCell::new(None);

        source
            .swap_with(
                |v: &i32, (a, b, c): (i32, i32, i32)| {
                    *seen.borrow_mut() = Some((*v, a, b, c));
                    v + a + b + c
                },
                (1, 2, 3),
            )
            .unwrap();

        assert_eq!(*seen.borrow(), Some((1, 1, 2, 3)));
        assert_eq!(source.get().unwrap(), 7);
    }

    #[test]
    fn reset_with_equal_value_notifies_nobody() {
        let runtime = Runtime::new();
        let source = runtime.source(3);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let _effect = runtime
            .effect(move |_: i32| runs_clone.set(runs_clone.get() + 1), (source.clone(),))
            .unwrap();
        assert_eq!(runs.get(), 1);

        source.reset(3).unwrap();
        assert_eq!(runs.get(), 1);

        source.reset(4).unwrap();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn clone_shares_state() {
        let runtime = Runtime::new();
        let source1 = runtime.source(0);
        let source2 = source1.clone();

        source1.reset(42).unwrap();
        assert_eq!(source2.get().unwrap(), 42);

        source2.destroy();
        assert!(source1.is_destroyed());
    }

    #[test]
    fn destroyed_source_rejects_reads_and_writes() {
        let runtime = Runtime::new();
        let source = runtime.source("seed");
        let id = source.id();

        source.destroy();
        source.destroy();

        assert!(source.is_destroyed());
        assert_eq!(source.get(), Err(CellError::Destroyed { id }));
        assert_eq!(source.reset("again"), Err(CellError::Destroyed { id }));
        assert_eq!(source.swap(|v| *v), Err(CellError::Destroyed { id }));
    }
}
