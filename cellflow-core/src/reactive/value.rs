//! Values and Inputs
//!
//! Any input position of a formula accepts either a cell or a plain value.
//! [`Value`] is that sum type, and [`deref`] is the uniform accessor over it:
//! cells yield their cached value, plain values pass through unchanged.
//!
//! Formula inputs are passed as tuples. The [`Inputs`] trait reads every
//! element of the tuple and reports which elements are cells, so the formula
//! can subscribe to exactly those. Plain values contribute no edge and never
//! trigger recomputation.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::Result;

use super::formula::FormulaCell;
use super::runtime::Observable;
use super::source::SourceCell;
use super::subscriber::CellId;

/// Either kind of value-carrying cell.
pub enum Cell<T> {
    /// A source cell.
    Source(SourceCell<T>),
    /// A formula cell.
    Formula(FormulaCell<T>),
}

impl<T> Cell<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Get the cell's unique ID.
    pub fn id(&self) -> CellId {
        match self {
            Cell::Source(cell) => cell.id(),
            Cell::Formula(cell) => cell.id(),
        }
    }

    /// Read the cell's current value.
    pub fn get(&self) -> Result<T> {
        match self {
            Cell::Source(cell) => cell.get(),
            Cell::Formula(cell) => cell.get(),
        }
    }

    /// Destroy the cell and everything downstream of it.
    pub fn destroy(&self) {
        match self {
            Cell::Source(cell) => cell.destroy(),
            Cell::Formula(cell) => cell.destroy(),
        }
    }

    /// Check if the cell has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        match self {
            Cell::Source(cell) => cell.is_destroyed(),
            Cell::Formula(cell) => cell.is_destroyed(),
        }
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        match self {
            Cell::Source(cell) => cell.subscriber_count(),
            Cell::Formula(cell) => cell.subscriber_count(),
        }
    }

    pub(crate) fn observable(&self) -> Rc<dyn Observable> {
        match self {
            Cell::Source(cell) => cell.observable(),
            Cell::Formula(cell) => cell.observable(),
        }
    }
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        match self {
            Cell::Source(cell) => Cell::Source(cell.clone()),
            Cell::Formula(cell) => Cell::Formula(cell.clone()),
        }
    }
}

impl<T> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Source(cell) => fmt::Debug::fmt(cell, f),
            Cell::Formula(cell) => fmt::Debug::fmt(cell, f),
        }
    }
}

impl<T> From<SourceCell<T>> for Cell<T> {
    fn from(cell: SourceCell<T>) -> Self {
        Cell::Source(cell)
    }
}

impl<T> From<FormulaCell<T>> for Cell<T> {
    fn from(cell: FormulaCell<T>) -> Self {
        Cell::Formula(cell)
    }
}

/// A plain value or a cell.
#[derive(Debug, Clone)]
pub enum Value<T> {
    /// A value frozen at construction time.
    Plain(T),
    /// A cell whose current value is read on every evaluation.
    Cell(Cell<T>),
}

impl<T> Value<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Wrap a plain value.
    pub fn plain(value: T) -> Self {
        Value::Plain(value)
    }

    /// Read the current value.
    pub fn get(&self) -> Result<T> {
        match self {
            Value::Plain(value) => Ok(value.clone()),
            Value::Cell(cell) => cell.get(),
        }
    }

    /// Check if this value is backed by a cell.
    pub fn is_cell(&self) -> bool {
        matches!(self, Value::Cell(_))
    }

    /// The backing cell, if any.
    pub fn as_cell(&self) -> Option<&Cell<T>> {
        match self {
            Value::Plain(_) => None,
            Value::Cell(cell) => Some(cell),
        }
    }
}

impl<T> From<Cell<T>> for Value<T> {
    fn from(cell: Cell<T>) -> Self {
        Value::Cell(cell)
    }
}

impl<T> From<SourceCell<T>> for Value<T> {
    fn from(cell: SourceCell<T>) -> Self {
        Value::Cell(Cell::Source(cell))
    }
}

impl<T> From<FormulaCell<T>> for Value<T> {
    fn from(cell: FormulaCell<T>) -> Self {
        Value::Cell(Cell::Formula(cell))
    }
}

/// Read a value: a cell's cached value, or a plain value unchanged.
///
/// Fails with [`CellError::Destroyed`](crate::CellError::Destroyed) if the
/// value is a destroyed cell.
pub fn deref<T>(value: &Value<T>) -> Result<T>
where
    T: Clone + PartialEq + 'static,
{
    value.get()
}

/// One input position of a formula.
pub trait Input: 'static {
    /// The value handed to the formula function.
    type Item;

    /// Read the current value of this input.
    fn read(&self) -> Result<Self::Item>;

    /// The cell behind this input, if it is one.
    fn observable(&self) -> Option<Rc<dyn Observable>>;
}

impl<T> Input for SourceCell<T>
where
    T: Clone + PartialEq + 'static,
{
    type Item = T;

    fn read(&self) -> Result<T> {
        self.get()
    }

    fn observable(&self) -> Option<Rc<dyn Observable>> {
        Some(SourceCell::observable(self))
    }
}

impl<T> Input for FormulaCell<T>
where
    T: Clone + PartialEq + 'static,
{
    type Item = T;

    fn read(&self) -> Result<T> {
        self.get()
    }

    fn observable(&self) -> Option<Rc<dyn Observable>> {
        Some(FormulaCell::observable(self))
    }
}

impl<T> Input for Cell<T>
where
    T: Clone + PartialEq + 'static,
{
    type Item = T;

    fn read(&self) -> Result<T> {
        self.get()
    }

    fn observable(&self) -> Option<Rc<dyn Observable>> {
        Some(Cell::observable(self))
    }
}

impl<T> Input for Value<T>
where
    T: Clone + PartialEq + 'static,
{
    type Item = T;

    fn read(&self) -> Result<T> {
        self.get()
    }

    fn observable(&self) -> Option<Rc<dyn Observable>> {
        self.as_cell().map(Cell::observable)
    }
}

/// An ordered tuple of formula inputs.
pub trait Inputs: 'static {
    /// Tuple of the values read from each input.
    type Values;

    /// Read every input, in order.
    fn read_all(&self) -> Result<Self::Values>;

    /// The inputs that are cells, in order.
    fn observables(&self) -> SmallVec<[Rc<dyn Observable>; 4]>;
}

/// A pure function over the values of an [`Inputs`] tuple.
///
/// Implemented for every `Fn(A, B, ...) -> T` closure; the tuple of input
/// values is spread into the call.
pub trait FormulaFn<V, T> {
    /// Call the function with the input values.
    fn evaluate(&self, values: V) -> T;
}

/// A side-effecting function over the values of an [`Inputs`] tuple.
pub trait EffectFn<V> {
    /// Run the effect with the input values.
    fn run(&mut self, values: V);
}

impl Inputs for () {
    type Values = ();

    fn read_all(&self) -> Result<()> {
        Ok(())
    }

    fn observables(&self) -> SmallVec<[Rc<dyn Observable>; 4]> {
        SmallVec::new()
    }
}

impl<Func, Out> FormulaFn<(), Out> for Func
where
    Func: Fn() -> Out,
{
    fn evaluate(&self, _: ()) -> Out {
        self()
    }
}

impl<Func> EffectFn<()> for Func
where
    Func: FnMut(),
{
    fn run(&mut self, _: ()) {
        self()
    }
}

macro_rules! impl_inputs {
    ($($input:ident : $ty:ident),+) => {
        impl<$($ty: Input),+> Inputs for ($($ty,)+) {
            type Values = ($($ty::Item,)+);

            fn read_all(&self) -> Result<Self::Values> {
                let ($($input,)+) = self;
                Ok(($($input.read()?,)+))
            }

            fn observables(&self) -> SmallVec<[Rc<dyn Observable>; 4]> {
                let ($($input,)+) = self;
                let mut cells = SmallVec::new();
                $(
                    if let Some(cell) = $input.observable() {
                        cells.push(cell);
                    }
                )+
                cells
            }
        }

        impl<Func, Out, $($ty),+> FormulaFn<($($ty,)+), Out> for Func
        where
            Func: Fn($($ty),+) -> Out,
        {
            fn evaluate(&self, ($($input,)+): ($($ty,)+)) -> Out {
                self($($input),+)
            }
        }

        impl<Func, $($ty),+> EffectFn<($($ty,)+)> for Func
        where
            Func: FnMut($($ty),+),
        {
            fn run(&mut self, ($($input,)+): ($($ty,)+)) {
                self($($input),+)
            }
        }
    };
}

impl_inputs!(a: A);
impl_inputs!(a: A, b: B);
impl_inputs!(a: A, b: B, c: C);
impl_inputs!(a: A, b: B, c: C, d: D);
impl_inputs!(a: A, b: B, c: C, d: D, e: E);
impl_inputs!(a: A, b: B, c: C, d: D, e: E, f: F);
