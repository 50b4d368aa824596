//! Formula Cell Implementation
//!
//! A formula cell is a cached derived value computed by a pure function over
//! an ordered list of inputs.
//!
//! # How Formulas Work
//!
//! 1. On construction, the formula evaluates its function over the current
//!    input values and caches the result.
//!
//! 2. It then subscribes to every input that is a cell. Plain-value inputs
//!    are frozen and contribute no edge.
//!
//! 3. When an input changes, the formula is recomputed: every input is read
//!    again from the live graph, not just the one that fired.
//!
//! 4. If the new value equals the cached one, propagation stops. Otherwise
//!    the cache updates and every subscriber is recomputed in turn.
//!
//! # Diamonds
//!
//! A formula reachable from one source along several paths is recomputed
//! once per incoming edge. Because each recomputation re-reads all inputs,
//! the extra runs are redundant rather than wrong: once upstream values
//! settle, the formula's value is the same no matter the order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{CellError, Result};

use super::node::{CellKind, Node};
use super::runtime::{Observable, Reactive, Runtime};
use super::subscriber::CellId;
use super::value::{FormulaFn, Inputs};

type Evaluate<T> = Rc<dyn Fn() -> Result<T>>;

/// A cached derived value that recomputes when its inputs change.
///
/// # Example
///
/// ```rust
/// use cellflow_core::reactive::{Runtime, Value};
///
/// let runtime = Runtime::new();
/// let width = runtime.source(3u32);
/// let area = runtime
///     .formula(|w: u32, h: u32| w * h, (width.clone(), Value::plain(4u32)))
///     .unwrap();
///
/// assert_eq!(area.get().unwrap(), 12);
/// width.reset(5).unwrap();
/// assert_eq!(area.get().unwrap(), 20);
/// ```
pub struct FormulaCell<T> {
    inner: Rc<FormulaInner<T>>,
}

struct FormulaInner<T> {
    node: Node<T>,

    /// Reads the inputs and applies the function. Dropped on destroy, which
    /// releases the captured inputs.
    evaluate: RefCell<Option<Evaluate<T>>>,

    /// The inputs that are cells, for unsubscribing on destroy.
    inputs: RefCell<SmallVec<[Rc<dyn Observable>; 4]>>,
}

impl<T> FormulaCell<T>
where
    T: Clone + PartialEq + 'static,
{
    pub(crate) fn new<I, F>(runtime: Runtime, compute: F, inputs: I) -> Result<Self>
    where
        I: Inputs,
        F: FormulaFn<I::Values, T> + 'static,
    {
        let observed = inputs.observables();
        let evaluate: Evaluate<T> = Rc::new(move || {
            let values = inputs.read_all()?;
            Ok(compute.evaluate(values))
        });

        // The ID is issued first so the initial evaluation runs under it.
        let id = runtime.next_id();
        let value = {
            let _guard = runtime.context().enter(id);
            evaluate()?
        };

        let inner = Rc::new(FormulaInner {
            node: Node::with_id(id, runtime, CellKind::Formula, value),
            evaluate: RefCell::new(Some(evaluate)),
            inputs: RefCell::new(SmallVec::new()),
        });

        for input in &observed {
            input.subscribe(inner.clone());
        }
        *inner.inputs.borrow_mut() = observed;

        trace!(cell = %id, "created formula");
        Ok(Self { inner })
    }

    /// Get the cell's unique ID.
    pub fn id(&self) -> CellId {
        self.inner.node.id()
    }

    /// Get the cell's kind.
    pub fn kind(&self) -> CellKind {
        self.inner.node.kind()
    }

    /// Get the cached value.
    ///
    /// Fails if the cell has been destroyed.
    pub fn get(&self) -> Result<T> {
        self.inner.node.get()
    }

    /// Re-evaluate over the current value of every input.
    ///
    /// Subscribers are recomputed only if the value changed.
    pub fn recompute(&self) -> Result<()> {
        self.inner.recompute()
    }

    /// Destroy the formula and everything downstream of it.
    ///
    /// The formula unsubscribes from each of its inputs and releases them.
    pub fn destroy(&self) {
        self.inner.destroy()
    }

    /// Check if the cell has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.inner.node.is_destroyed()
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.node.subscriber_count()
    }

    /// Check if the cell with `id` is subscribed to this one.
    pub fn has_subscriber(&self, id: CellId) -> bool {
        self.inner.node.has_subscriber(id)
    }

    /// Get the number of inputs that are cells.
    pub fn input_count(&self) -> usize {
        self.inner.inputs.borrow().len()
    }

    pub(crate) fn observable(&self) -> Rc<dyn Observable> {
        self.inner.clone()
    }
}

impl<T> FormulaInner<T>
where
    T: Clone + PartialEq + 'static,
{
    fn recompute(&self) -> Result<()> {
        let id = self.node.id();
        let evaluate = self
            .evaluate
            .borrow()
            .clone()
            .ok_or(CellError::Destroyed { id })?;

        let value = {
            let _guard = self.node.runtime().context().enter(id);
            evaluate()?
        };

        match self.node.replace(value)? {
            None => {
                trace!(cell = %id, "recomputed formula, value unchanged");
                Ok(())
            }
            Some(subscribers) => {
                trace!(cell = %id, subscribers = subscribers.len(), "recomputed formula");
                self.node.notify(subscribers)
            }
        }
    }

    fn destroy(&self) {
        if !self.node.destroy_subscribers() {
            return;
        }

        let id = self.node.id();
        let inputs = std::mem::take(&mut *self.inputs.borrow_mut());
        for input in &inputs {
            input.unsubscribe(id);
        }
        self.evaluate.borrow_mut().take();
        self.node.mark_destroyed();

        debug!(cell = %id, inputs = inputs.len(), "destroyed formula");
    }
}

impl<T> Reactive for FormulaInner<T>
where
    T: Clone + PartialEq + 'static,
{
    fn id(&self) -> CellId {
        self.node.id()
    }

    fn recompute(&self) -> Result<()> {
        FormulaInner::recompute(self)
    }

    fn destroy(&self) {
        FormulaInner::destroy(self)
    }

    fn is_destroyed(&self) -> bool {
        self.node.is_destroyed()
    }
}

impl<T> Observable for FormulaInner<T>
where
    T: Clone + PartialEq + 'static,
{
    fn id(&self) -> CellId {
        self.node.id()
    }

    fn subscribe(&self, subscriber: Rc<dyn Reactive>) {
        self.node.subscribe(subscriber)
    }

    fn unsubscribe(&self, id: CellId) {
        self.node.unsubscribe(id)
    }
}

impl<T> Clone for FormulaCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for FormulaCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaCell")
            .field("node", &self.inner.node)
            .field("inputs", &self.inner.inputs.borrow().len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
