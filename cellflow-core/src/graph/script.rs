//! Edit Scripts
//!
//! An edit script is the list of actions that turns one sequence into
//! another. It is read left to right against a cursor into the list being
//! edited:
//!
//! - `Skip(x)` keeps the element under the cursor and moves past it.
//! - `Insert(x)` inserts `x` at the cursor and moves past it.
//! - `Delete(x)` removes the element under the cursor.
//!
//! Scripts serialize as a list of `{"kind": ..., "value": ...}` objects, the
//! shape list renderers consume.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::edit_graph::{Edge, EditGraph, WeightedDigraph};
use super::path::shortest_path;

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EditAction<T> {
    /// Insert an element taken from the new sequence.
    Insert(T),
    /// Delete an element of the old sequence.
    Delete(T),
    /// Keep an element present in both sequences.
    Skip(T),
}

impl<T> EditAction<T> {
    /// The element this action inserts, deletes, or keeps.
    pub fn value(&self) -> &T {
        match self {
            EditAction::Insert(value) | EditAction::Delete(value) | EditAction::Skip(value) => {
                value
            }
        }
    }

    /// Take the element out of the action.
    pub fn into_value(self) -> T {
        match self {
            EditAction::Insert(value) | EditAction::Delete(value) | EditAction::Skip(value) => {
                value
            }
        }
    }

    /// Check if this action changes the list.
    pub fn is_edit(&self) -> bool {
        !matches!(self, EditAction::Skip(_))
    }
}

/// A list that an edit script can be applied to in place.
pub trait ListPatch<T> {
    /// Insert `value` so that it ends up at `index`.
    fn insert_at(&mut self, index: usize, value: T);

    /// Remove the element at `index`.
    fn remove_at(&mut self, index: usize);
}

impl<T> ListPatch<T> for Vec<T> {
    fn insert_at(&mut self, index: usize, value: T) {
        self.insert(index, value);
    }

    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }
}

impl<T> ListPatch<T> for VecDeque<T> {
    fn insert_at(&mut self, index: usize, value: T) {
        self.insert(index, value);
    }

    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }
}

/// An ordered list of edit actions.
///
/// # Example
///
/// ```rust
/// use cellflow_core::graph::{diff, EditAction};
///
/// let old: Vec<char> = "bac".chars().collect();
/// let new: Vec<char> = "cbcb".chars().collect();
/// let script = diff(&old, &new);
///
/// assert_eq!(script.cost(), 3);
/// assert_eq!(script.actions()[0], EditAction::Insert('c'));
/// assert_eq!(script.apply(&old), new);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript<T> {
    actions: Vec<EditAction<T>>,
}

impl<T> EditScript<T> {
    /// Wrap a list of actions.
    pub fn new(actions: Vec<EditAction<T>>) -> Self {
        Self { actions }
    }

    /// The actions, in order.
    pub fn actions(&self) -> &[EditAction<T>] {
        &self.actions
    }

    /// Take the actions out of the script.
    pub fn into_actions(self) -> Vec<EditAction<T>> {
        self.actions
    }

    /// Get the number of actions, skips included.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the script has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Get the number of inserts and deletes.
    pub fn cost(&self) -> usize {
        self.actions.iter().filter(|action| action.is_edit()).count()
    }

    /// Iterate over the actions.
    pub fn iter(&self) -> std::slice::Iter<'_, EditAction<T>> {
        self.actions.iter()
    }

    /// Apply the script to `list`, which must hold the old sequence.
    ///
    /// Skipped and deleted elements are not compared against the list.
    ///
    /// # Panics
    ///
    /// Panics if `list` is shorter than the script expects.
    pub fn apply_to<L>(&self, list: &mut L)
    where
        T: Clone,
        L: ListPatch<T> + ?Sized,
    {
        let mut cursor = 0;
        for action in &self.actions {
            match action {
                EditAction::Skip(_) => cursor += 1,
                EditAction::Insert(value) => {
                    list.insert_at(cursor, value.clone());
                    cursor += 1;
                }
                EditAction::Delete(_) => list.remove_at(cursor),
            }
        }
    }

    /// Apply the script to a copy of `old`.
    pub fn apply(&self, old: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        let mut list = old.to_vec();
        self.apply_to(&mut list);
        list
    }
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<EditAction<T>>> for EditScript<T> {
    fn from(actions: Vec<EditAction<T>>) -> Self {
        Self::new(actions)
    }
}

impl<T> FromIterator<EditAction<T>> for EditScript<T> {
    fn from_iter<I: IntoIterator<Item = EditAction<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for EditScript<T> {
    type Item = EditAction<T>;
    type IntoIter = std::vec::IntoIter<EditAction<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
    type Item = &'a EditAction<T>;
    type IntoIter = std::slice::Iter<'a, EditAction<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// The script has the fewest possible inserts and deletes; elements are
/// never moved or substituted. Among equally short scripts the choice is
/// deterministic.
pub fn diff<T>(old: &[T], new: &[T]) -> EditScript<T>
where
    T: PartialEq + Clone,
{
    let graph = EditGraph::new(old, new);
    let path = shortest_path(&graph, graph.source(), graph.sink());
    let script: EditScript<T> = path.iter().map(|edge| action(&graph, edge)).collect();

    debug!(
        old = old.len(),
        new = new.len(),
        vertices = graph.vertex_count(),
        cost = script.cost(),
        "computed edit script"
    );
    script
}

/// Read the action an edge stands for off its coordinate delta.
fn action<T: Clone>(graph: &EditGraph<'_, T>, edge: &Edge) -> EditAction<T> {
    let (j1, i1) = graph.coords(edge.from);
    let (j2, i2) = graph.coords(edge.to);

    if j2 > j1 && i2 > i1 {
        EditAction::Skip(graph.new_seq()[j1].clone())
    } else if j2 > j1 {
        EditAction::Insert(graph.new_seq()[j1].clone())
    } else {
        EditAction::Delete(graph.old()[i1].clone())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
