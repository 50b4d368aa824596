//! Derived cells built from [`Runtime::formula`] and [`Runtime::effect`].
//!
//! Nothing here touches cell internals; each helper is an ordinary formula
//! with a particular function. Helpers that remember earlier values keep that
//! memory inside their closure, private to the one cell.

use std::cell::RefCell;

use crate::error::Result;

use super::effect::EffectCell;
use super::formula::FormulaCell;
use super::runtime::Runtime;
use super::value::Value;

impl Runtime {
    /// A formula over a single input.
    pub fn map<A, T, F>(&self, input: impl Into<Value<A>>, f: F) -> Result<FormulaCell<T>>
    where
        A: Clone + PartialEq + 'static,
        T: Clone + PartialEq + 'static,
        F: Fn(A) -> T + 'static,
    {
        self.formula(f, (input.into(),))
    }

    /// Project one attribute out of a record.
    ///
    /// ```rust
    /// use cellflow_core::reactive::Runtime;
    ///
    /// #[derive(Clone, PartialEq)]
    /// struct Todo {
    ///     text: String,
    ///     done: bool,
    /// }
    ///
    /// let runtime = Runtime::new();
    /// let todo = runtime.source(Todo { text: "write docs".into(), done: false });
    /// let done = runtime.field(todo.clone(), |t: &Todo| t.done).unwrap();
    ///
    /// todo.swap(|t| Todo { done: true, ..t.clone() }).unwrap();
    /// assert!(done.get().unwrap());
    /// ```
    pub fn field<R, T, F>(&self, record: impl Into<Value<R>>, project: F) -> Result<FormulaCell<T>>
    where
        R: Clone + PartialEq + 'static,
        T: Clone + PartialEq + 'static,
        F: Fn(&R) -> T + 'static,
    {
        self.map(record, move |record: R| project(&record))
    }

    /// Project the element at `index` out of a sequence.
    ///
    /// Yields `None` while the index is out of range. The index may itself
    /// be a cell.
    pub fn by_index<T>(
        &self,
        items: impl Into<Value<Vec<T>>>,
        index: impl Into<Value<usize>>,
    ) -> Result<FormulaCell<Option<T>>>
    where
        T: Clone + PartialEq + 'static,
    {
        self.formula(
            |items: Vec<T>, index: usize| items.into_iter().nth(index),
            (items.into(), index.into()),
        )
    }

    /// A cell of `(current, previous)` pairs.
    ///
    /// `previous` is `None` until the input changes for the first time.
    pub fn history<T>(&self, input: impl Into<Value<T>>) -> Result<FormulaCell<(T, Option<T>)>>
    where
        T: Clone + PartialEq + 'static,
    {
        let previous: RefCell<Option<T>> = RefCell::new(None);
        self.map(input, move |current: T| {
            let prior = previous.replace(Some(current.clone()));
            (current, prior)
        })
    }

    /// A cell that only follows values accepted by `predicate`.
    ///
    /// `predicate` receives each new input value together with the input
    /// value seen before it (`initial` the first time). Rejected values leave
    /// the cell holding the last accepted value, or `initial` if none was.
    pub fn filter<T, P>(
        &self,
        input: impl Into<Value<T>>,
        predicate: P,
        initial: T,
    ) -> Result<FormulaCell<T>>
    where
        T: Clone + PartialEq + 'static,
        P: Fn(&T, &T) -> bool + 'static,
    {
        let observed = RefCell::new(initial.clone());
        let held = RefCell::new(initial);
        self.map(input, move |current: T| {
            let accepted = predicate(&current, &observed.borrow());
            *observed.borrow_mut() = current.clone();
            if accepted {
                *held.borrow_mut() = current;
            }
            held.borrow().clone()
        })
    }

    /// Apply `f` to a value now and, if it is a cell, after every change.
    ///
    /// For a plain value `f` runs once and `None` is returned. For a cell the
    /// returned effect keeps `f` bound until it is destroyed.
    pub fn do_with<T, F>(&self, value: impl Into<Value<T>>, mut f: F) -> Result<Option<EffectCell>>
    where
        T: Clone + PartialEq + 'static,
        F: FnMut(T) + 'static,
    {
        match value.into() {
            Value::Plain(value) => {
                f(value);
                Ok(None)
            }
            Value::Cell(cell) => self.effect(f, (cell,)).map(Some),
        }
    }
}
