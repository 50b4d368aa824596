//! Edit Graph Vertices and Edges
//!
//! Vertices are flattened grid points: `(j, i)` is stored as
//! `j * (|old| + 1) + i`, so the source `(0, 0)` is vertex `0` and the sink
//! `(|new|, |old|)` is the last vertex.

use smallvec::{smallvec, SmallVec};

/// A weighted directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The tail vertex.
    pub from: usize,
    /// The head vertex.
    pub to: usize,
    /// The cost of taking this edge.
    pub weight: usize,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: usize, to: usize, weight: usize) -> Self {
        Self { from, to, weight }
    }
}

/// A directed graph with weighted edges over vertices `0..vertex_count()`.
pub trait WeightedDigraph {
    /// Get the number of vertices.
    fn vertex_count(&self) -> usize;

    /// Get the edges leaving `v`, in order.
    fn adj(&self, v: usize) -> SmallVec<[Edge; 2]>;
}

/// The implicit edit graph between two sequences.
///
/// # Example
///
/// ```rust
/// use cellflow_core::graph::{Edge, EditGraph, WeightedDigraph};
///
/// let graph = EditGraph::new(&['a'], &['b']);
///
/// assert_eq!(graph.vertex_count(), 4);
/// assert_eq!(
///     graph.adj(0).as_slice(),
///     &[Edge::new(0, 1, 1), Edge::new(0, 2, 1)]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EditGraph<'a, T> {
    old: &'a [T],
    new: &'a [T],
}

impl<'a, T> EditGraph<'a, T> {
    /// Create the edit graph turning `old` into `new`.
    pub fn new(old: &'a [T], new: &'a [T]) -> Self {
        Self { old, new }
    }

    /// The sequence being edited.
    pub fn old(&self) -> &'a [T] {
        self.old
    }

    /// The sequence being produced.
    pub fn new_seq(&self) -> &'a [T] {
        self.new
    }

    fn width(&self) -> usize {
        self.old.len() + 1
    }

    /// Split a vertex into `(j, i)`: its position in `new` and in `old`.
    pub fn coords(&self, v: usize) -> (usize, usize) {
        (v / self.width(), v % self.width())
    }

    /// The vertex at position `j` in `new` and `i` in `old`.
    pub fn vertex(&self, j: usize, i: usize) -> usize {
        j * self.width() + i
    }

    /// The start vertex, `(0, 0)`.
    pub fn source(&self) -> usize {
        0
    }

    /// The end vertex, `(|new|, |old|)`.
    pub fn sink(&self) -> usize {
        self.vertex(self.new.len(), self.old.len())
    }
}

impl<T: PartialEq> WeightedDigraph for EditGraph<'_, T> {
    fn vertex_count(&self) -> usize {
        self.width() * (self.new.len() + 1)
    }

    fn adj(&self, v: usize) -> SmallVec<[Edge; 2]> {
        let (j, i) = self.coords(v);
        let in_old = i < self.old.len();
        let in_new = j < self.new.len();

        if in_old && in_new && self.old[i] == self.new[j] {
            return smallvec![Edge::new(v, self.vertex(j + 1, i + 1), 0)];
        }

        let mut edges = SmallVec::new();
        if in_old {
            edges.push(Edge::new(v, v + 1, 1));
        }
        if in_new {
            edges.push(Edge::new(v, v + self.width(), 1));
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn vertex_count_covers_the_grid() {
        let old = chars("bac");
        let new = chars("cbcb");
        let graph = EditGraph::new(&old, &new);

        assert_eq!(graph.vertex_count(), 20);
        assert_eq!(graph.source(), 0);
        assert_eq!(graph.sink(), 19);
    }

    #[test]
    fn adjacency_lists() {
        let old = chars("bac");
        let new = chars("cbcb");
        let graph = EditGraph::new(&old, &new);

        assert_eq!(
            graph.adj(0).as_slice(),
            &[Edge::new(0, 1, 1), Edge::new(0, 4, 1)]
        );
        assert_eq!(graph.adj(2).as_slice(), &[Edge::new(2, 7, 0)]);
        assert_eq!(graph.adj(3).as_slice(), &[Edge::new(3, 7, 1)]);
        assert_eq!(graph.adj(16).as_slice(), &[Edge::new(16, 17, 1)]);
        assert!(graph.adj(19).is_empty());
    }

    #[test]
    fn coords_round_trip() {
        let old = chars("bac");
        let new = chars("cbcb");
        let graph = EditGraph::new(&old, &new);

        assert_eq!(graph.coords(7), (1, 3));
        assert_eq!(graph.coords(19), (4, 3));
        for v in 0..graph.vertex_count() {
            let (j, i) = graph.coords(v);
            assert_eq!(graph.vertex(j, i), v);
        }
    }

    #[test]
    fn empty_sequences_have_one_vertex() {
        let empty: [u8; 0] = [];
        let graph = EditGraph::new(&empty, &empty);

        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.sink(), graph.source());
        assert!(graph.adj(0).is_empty());
    }
}
