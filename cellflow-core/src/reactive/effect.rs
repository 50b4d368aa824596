//! Effect Cell Implementation
//!
//! An effect cell is a side-effecting computation that runs whenever its
//! inputs change. Bindings use effects to mirror cell values into state the
//! graph does not own.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its function immediately over the current
//!    input values and subscribes to every input that is a cell.
//!
//! 2. When any input changes, the effect runs again with fresh values.
//!
//! 3. Effects are leaves. [`EffectCell`] is not an [`Input`](super::Input),
//!    so no formula can subscribe to one, and a side effect can never feed
//!    back into the graph through a value.
//!
//! # Differences from Formulas
//!
//! - Formulas return a value; effects do not.
//! - Formula functions must be pure; effect functions may mutate outside
//!   state (but not the graph itself).
//! - A formula stops propagation when its value is unchanged; an effect has
//!   nothing downstream to stop.
//!
//! # Cleanup
//!
//! The binding that created an effect owns it and must call
//! [`EffectCell::destroy`] when it is torn down. Until then the inputs keep
//! the effect, and everything its function captured, alive.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{CellError, Result};

use super::node::{CellKind, Node};
use super::runtime::{Observable, Reactive, Runtime};
use super::subscriber::CellId;
use super::value::{EffectFn, Inputs};

type Run = Box<dyn FnMut() -> Result<()>>;

/// An effect-only leaf cell.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use cellflow_core::reactive::Runtime;
///
/// let runtime = Runtime::new();
/// let title = runtime.source(String::from("draft"));
/// let rendered = Rc::new(RefCell::new(String::new()));
///
/// let sink = rendered.clone();
/// let binding = runtime
///     .effect(move |t: String| *sink.borrow_mut() = t, (title.clone(),))
///     .unwrap();
///
/// title.reset(String::from("final")).unwrap();
/// assert_eq!(*rendered.borrow(), "final");
///
/// binding.destroy();
/// ```
pub struct EffectCell {
    inner: Rc<EffectInner>,
}

struct EffectInner {
    node: Node<()>,

    /// The effect function bound to its inputs. Dropped on destroy.
    run: RefCell<Option<Run>>,

    /// The inputs that are cells, for unsubscribing on destroy.
    inputs: RefCell<SmallVec<[Rc<dyn Observable>; 4]>>,

    /// Number of times the effect has run.
    run_count: Cell<usize>,
}

impl EffectCell {
    pub(crate) fn new<I, F>(runtime: Runtime, mut effect: F, inputs: I) -> Result<Self>
    where
        I: Inputs,
        F: EffectFn<I::Values> + 'static,
    {
        let observed = inputs.observables();
        let run: Run = Box::new(move || {
            let values = inputs.read_all()?;
            effect.run(values);
            Ok(())
        });

        let inner = Rc::new(EffectInner {
            node: Node::new(runtime, CellKind::Effect, ()),
            run: RefCell::new(Some(run)),
            inputs: RefCell::new(SmallVec::new()),
            run_count: Cell::new(0),
        });

        // Run immediately so the binding reflects the current state.
        inner.execute()?;

        for input in &observed {
            input.subscribe(inner.clone());
        }
        *inner.inputs.borrow_mut() = observed;

        debug!(cell = %inner.node.id(), "created effect");
        Ok(Self { inner })
    }

    /// Get the cell's unique ID.
    pub fn id(&self) -> CellId {
        self.inner.node.id()
    }

    /// Get the cell's kind, always [`CellKind::Effect`].
    pub fn kind(&self) -> CellKind {
        self.inner.node.kind()
    }

    /// Run the effect again over the current input values.
    pub fn recompute(&self) -> Result<()> {
        self.inner.execute()
    }

    /// Unsubscribe from every input and release the effect function.
    pub fn destroy(&self) {
        self.inner.destroy()
    }

    /// Check if the effect has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.inner.node.is_destroyed()
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.get()
    }

    /// Get the number of inputs that are cells.
    pub fn input_count(&self) -> usize {
        self.inner.inputs.borrow().len()
    }
}

impl EffectInner {
    fn execute(&self) -> Result<()> {
        let id = self.node.id();
        // An effect re-entered from its own function fails the borrow.
        let mut slot = self
            .run
            .try_borrow_mut()
            .map_err(|_| CellError::EffectReentered { id })?;
        let run = slot.as_mut().ok_or(CellError::Destroyed { id })?;

        let outcome = {
            let _guard = self.node.runtime().context().enter(id);
            run()
        };
        drop(slot);

        if self.node.is_destroyed() {
            // Destroyed from inside its own function; release it now that it returned.
            self.run.borrow_mut().take();
        }
        outcome?;

        self.run_count.set(self.run_count.get() + 1);
        trace!(cell = %id, runs = self.run_count.get(), "ran effect");
        Ok(())
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
        if let Ok(mut slot) = self.run.try_borrow_mut() {
            slot.take();
        }
        self.node.mark_destroyed();

        debug!(cell = %id, "destroyed effect");
    }
}

impl Reactive for EffectInner {
    fn id(&self) -> CellId {
        self.node.id()
    }

    fn recompute(&self) -> Result<()> {
        self.execute()
    }

    fn destroy(&self) {
        EffectInner::destroy(self)
    }

    fn is_destroyed(&self) -> bool {
        self.node.is_destroyed()
    }
}

impl Clone for EffectCell {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for EffectCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectCell")
            .field("node", &self.inner.node)
            .field("run_count", &self.run_count())
            .field("inputs", &self.input_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Value;

    #[test]
    fn effect_runs_on_creation() {
        let runtime = Runtime::new();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();

        let source = runtime.source(7);
        let effect = runtime
            .effect(move |v: i32| seen_clone.set(v), (source.clone(),))
            .unwrap();

        assert_eq!(seen.get(), 7);
        assert_eq!(effect.run_count(), 1);
        assert_eq!(effect.kind(), CellKind::Effect);
        assert!(source.has_subscriber(effect.id()));
    }

    #[test]
    fn effect_runs_on_change() {
        let runtime = Runtime::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let source = runtime.source(1);
        let effect = runtime
            .effect(move |v: i32| seen_clone.borrow_mut().push(v), (source.clone(),))
            .unwrap();

        source.reset(2).unwrap();
        source.reset(2).unwrap();
        source.reset(3).unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(effect.run_count(), 3);
    }

    #[test]
    fn effect_does_not_run_after_destroy() {
        let runtime = Runtime::new();
        let source = runtime.source(0);
        let effect = runtime.effect(|_: i32| {}, (source.clone(),)).unwrap();

        effect.destroy();
        assert!(effect.is_destroyed());
        assert_eq!(source.subscriber_count(), 0);

        source.reset(1).unwrap();
        assert_eq!(effect.run_count(), 1);
        assert_eq!(effect.recompute(), Err(CellError::Destroyed { id: effect.id() }));
    }

    #[test]
    fn effect_cannot_mutate_the_graph() {
        let runtime = Runtime::new();
        let input = runtime.source(0);
        let target = runtime.source(0);
        let outcome = Rc::new(RefCell::new(None));

        let target_clone = target.clone();
        let outcome_clone = outcome.clone();
        let effect = runtime
            .effect(
                move |v: i32| *outcome_clone.borrow_mut() = Some(target_clone.reset(v)),
                (input.clone(),),
            )
            .unwrap();

        assert_eq!(
            *outcome.borrow(),
            Some(Err(CellError::ReentrantMutation {
                id: target.id(),
                during: effect.id(),
            }))
        );
        assert_eq!(target.get().unwrap(), 0);
    }

    #[test]
    fn effect_cannot_run_itself() {
        let runtime = Runtime::new();
        let input = runtime.source(0);
        let handle: Rc<RefCell<Option<EffectCell>>> = Rc::new(RefCell::new(None));
        let outcome = Rc::new(RefCell::new(None));

        let handle_clone = handle.clone();
        let outcome_clone = outcome.clone();
        let effect = runtime
            .effect(
                move |_: i32| {
                    if let Some(own) = handle_clone.borrow().as_ref() {
                        *outcome_clone.borrow_mut() = Some(own.recompute());
                    }
                },
                (input.clone(),),
            )
            .unwrap();
        *handle.borrow_mut() = Some(effect.clone());

        input.reset(1).unwrap();

        assert_eq!(
            *outcome.borrow(),
            Some(Err(CellError::EffectReentered { id: effect.id() }))
        );
        assert_eq!(effect.run_count(), 2);

        effect.destroy();
        handle.borrow_mut().take();
    }

    #[test]
    fn effect_with_plain_inputs_has_no_edges() {
        let runtime = Runtime::new();
        let effect = runtime
            .effect(|_: &'static str| {}, (Value::plain("fixed"),))
            .unwrap();
        assert_eq!(effect.input_count(), 0);
        assert_eq!(effect.run_count(), 1);
    }

    #[test]
    fn effect_clone_shares_state() {
        let runtime = Runtime::new();
        let effect1 = runtime.effect(|| {}, ()).unwrap();
        let effect2 = effect1.clone();

        assert_eq!(effect1.id(), effect2.id());

        effect1.recompute().unwrap();
        assert_eq!(effect2.run_count(), 2);

        effect1.destroy();
        assert!(effect2.is_destroyed());
    }
}
