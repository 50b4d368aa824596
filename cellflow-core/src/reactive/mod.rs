//! Reactive Cells
//!
//! This module implements the cell graph: source cells, formula cells, and
//! effect cells. Together they form a dataflow graph in which setting a
//! source pushes the change through every formula that depends on it.
//!
//! # Concepts
//!
//! ## Sources
//!
//! A source cell holds a value set directly by external code with `reset` or
//! `swap`. Sources are the roots of the graph.
//!
//! ## Formulas
//!
//! A formula cell caches the result of a pure function over an ordered list of
//! inputs. Each input is either a cell or a plain value. Inputs are declared
//! explicitly when the formula is built; nothing is tracked by reading.
//!
//! ## Effects
//!
//! An effect cell runs a side-effecting function over its inputs, once when
//! created and again after every change. Effects are leaves: nothing can
//! subscribe to them.
//!
//! # Propagation
//!
//! Propagation is synchronous and push-based. When a cell's value changes,
//! each direct subscriber is recomputed, depth-first, in the order it
//! subscribed, before the triggering call returns. A recomputation that yields
//! a value equal to the cached one ends propagation along that path.
//!
//! # Ownership
//!
//! Cells hold their subscribers and formulas hold their inputs, so a live
//! graph keeps itself alive. `destroy` on any cell tears down the cell and
//! everything downstream of it and breaks those references.

mod context;
mod derive;
mod effect;
mod formula;
mod node;
mod runtime;
mod source;
mod subscriber;
mod value;

pub use effect::EffectCell;
pub use formula::FormulaCell;
pub use node::CellKind;
pub use runtime::{Observable, Reactive, Runtime};
pub use source::SourceCell;
pub use subscriber::{CellId, IdGenerator};
pub use value::{deref, Cell, EffectFn, FormulaFn, Input, Inputs, Value};
