//! Reactive Runtime
//!
//! The runtime is the owner of everything the cells of one graph share: the
//! [`IdGenerator`] that names them and the evaluation context that guards
//! against reentrant mutation. Every cell keeps a handle to the runtime that
//! built it.
//!
//! # How It Works
//!
//! 1. [`Runtime::source`] creates a settable cell with an empty subscriber set.
//!
//! 2. [`Runtime::formula`] evaluates a function over its inputs immediately,
//!    then registers itself with every input that is a cell.
//!
//! 3. When a source is reset to a different value, each direct subscriber is
//!    recomputed, depth-first, in registration order. A recomputation that
//!    yields an equal value stops there.
//!
//! 4. [`Runtime::effect`] creates an effect-only leaf. Effects run side effects
//!    and cannot be used as inputs, so they never have subscribers.
//!
//! There is no global registry: cells hold strong references to their
//! subscribers and formulas hold strong references to their inputs. A
//! subgraph is released by calling `destroy` on its root.

use std::rc::Rc;

use crate::error::Result;

use super::context::EvalContext;
use super::effect::EffectCell;
use super::formula::FormulaCell;
use super::source::SourceCell;
use super::subscriber::{CellId, IdGenerator};
use super::value::{EffectFn, FormulaFn, Inputs};

/// A cell that can be recomputed and torn down by an upstream cell.
pub trait Reactive {
    /// Get the cell ID of this reactive value.
    fn id(&self) -> CellId;

    /// Re-evaluate over the current values of every input.
    fn recompute(&self) -> Result<()>;

    /// Tear down this cell and everything downstream of it.
    fn destroy(&self);

    /// Check if the cell has been destroyed.
    fn is_destroyed(&self) -> bool;
}

/// A cell that other cells can subscribe to.
pub trait Observable {
    /// Get the cell ID of this observable value.
    fn id(&self) -> CellId;

    /// Register `subscriber` to be recomputed when this cell changes.
    fn subscribe(&self, subscriber: Rc<dyn Reactive>);

    /// Remove the subscriber with the given ID.
    fn unsubscribe(&self, id: CellId);
}

/// Handle to a reactive runtime.
///
/// Cloning the handle is cheap; clones share the same ID sequence and
/// evaluation context.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

#[derive(Debug, Default)]
struct RuntimeInner {
    ids: IdGenerator,
    context: EvalContext,
}

impl Runtime {
    /// Create a new runtime whose first cell ID is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime that draws cell IDs from `ids`.
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                ids,
                context: EvalContext::default(),
            }),
        }
    }

    pub(crate) fn next_id(&self) -> CellId {
        self.inner.ids.next_id()
    }

    pub(crate) fn context(&self) -> &EvalContext {
        &self.inner.context
    }

    /// Check if a formula or effect function is currently running.
    pub fn is_evaluating(&self) -> bool {
        self.inner.context.is_active()
    }

    /// Create a source cell seeded with `value`.
    pub fn source<T>(&self, value: T) -> SourceCell<T>
    where
        T: Clone + PartialEq + 'static,
    {
        SourceCell::new(self.clone(), value)
    }

    /// Create a formula cell computing `compute` over `inputs`.
    ///
    /// `inputs` is a tuple whose elements are cells or [`Value`](super::Value)s.
    /// The function is called with the current value of each input, in order,
    /// once now and again whenever an input cell changes.
    ///
    /// Fails if an input cell has already been destroyed.
    pub fn formula<I, F, T>(&self, compute: F, inputs: I) -> Result<FormulaCell<T>>
    where
        I: Inputs,
        F: FormulaFn<I::Values, T> + 'static,
        T: Clone + PartialEq + 'static,
    {
        FormulaCell::new(self.clone(), compute, inputs)
    }

    /// Create an effect-only cell running `run` over `inputs`.
    ///
    /// The effect runs once now and again whenever an input cell changes.
    /// The caller owns the binding and must `destroy` the effect when done.
    pub fn effect<I, F>(&self, run: F, inputs: I) -> Result<EffectCell>
    where
        I: Inputs,
        F: EffectFn<I::Values> + 'static,
    {
        EffectCell::new(self.clone(), run, inputs)
    }
}
