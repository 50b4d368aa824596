//! Cellflow Core
//!
//! This crate provides two independent engines:
//!
//! - Reactive cells: sources, cached formulas, and effects wired into a
//!   dataflow graph with synchronous, equality-gated propagation
//! - An edit-script diff that turns one sequence into another with the
//!   fewest insertions and deletions, found as a shortest path through an
//!   edit graph
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: Cell types, the runtime that creates them, and derived-cell
//!   helpers
//! - `graph`: The edit graph, DAG shortest paths, and edit scripts
//!
//! # Example
//!
//! ```rust
//! use cellflow_core::graph::diff;
//! use cellflow_core::reactive::Runtime;
//!
//! let runtime = Runtime::new();
//!
//! // Create a source
//! let todos = runtime.source(vec!["write", "test"]);
//!
//! // Create a derived value
//! let count = runtime.map(todos.clone(), |t: Vec<&'static str>| t.len()).unwrap();
//!
//! // Update the source
//! let before = todos.get().unwrap();
//! todos
//!     .swap(|t| {
//!         let mut t = t.clone();
//!         t.push("ship");
//!         t
//!     })
//!     .unwrap();
//! assert_eq!(count.get().unwrap(), 3);
//!
//! // Describe what changed
//! let script = diff(&before, &todos.get().unwrap());
//! assert_eq!(script.cost(), 1);
//! ```

pub mod graph;
pub mod reactive;

mod error;

pub use error::{CellError, Result};
