//! Edit Graph
//!
//! This module computes minimal edit scripts between two sequences by
//! treating the problem as a shortest path through a weighted DAG.
//!
//! # Overview
//!
//! For sequences `old` and `new`, the edit graph has one vertex per grid
//! point `(j, i)` with `0 <= j <= |new|` and `0 <= i <= |old|`:
//!
//! - A skip edge of weight 0 runs from `(j, i)` to `(j + 1, i + 1)` when
//!   `old[i] == new[j]`. A vertex with a skip edge has no other edges.
//! - Otherwise a delete edge of weight 1 runs to `(j, i + 1)` and an insert
//!   edge of weight 1 runs to `(j + 1, i)`, in that order.
//!
//! Every path from `(0, 0)` to `(|new|, |old|)` spells an edit script, and a
//! shortest one spells a script with the fewest inserts and deletes.
//!
//! # Design Decisions
//!
//! 1. The graph is implicit. Adjacency lists are generated on demand from the
//!    two sequences, so building the graph allocates nothing.
//!
//! 2. The topological order comes from a depth-first postorder driven by an
//!    explicit stack, so long sequences cannot exhaust the call stack.
//!
//! 3. Ties between equally short paths are broken by edge order and the
//!    strict comparison in relaxation. The result is deterministic.

mod edit_graph;
mod path;
mod script;

pub use edit_graph::{Edge, EditGraph, WeightedDigraph};
pub use path::{shortest_path, topological_order};
pub use script::{diff, EditAction, EditScript, ListPatch};
