//! Shortest Paths in a DAG
//!
//! # How It Works
//!
//! 1. A depth-first search from the source records each vertex once all of
//!    its successors are finished. Reversing that postorder gives a
//!    topological order of everything reachable from the source.
//!
//! 2. Relaxing the edges of each vertex in topological order settles every
//!    distance in a single pass, because no vertex is relaxed before all of
//!    its predecessors.
//!
//! 3. The path to the destination is read back from the predecessor edge
//!    recorded for each vertex, then reversed.

use smallvec::SmallVec;
use tracing::trace;

use super::edit_graph::{Edge, WeightedDigraph};

/// A vertex whose outgoing edges are partly explored.
struct Frame {
    vertex: usize,
    edges: SmallVec<[Edge; 2]>,
    next: usize,
}

/// Get the vertices reachable from `source` in topological order.
///
/// Visits successors in adjacency order, exactly as a recursive depth-first
/// search would, but keeps its work on the heap.
///
/// # Panics
///
/// Panics if `source` is not a vertex of `graph`.
pub fn topological_order<G>(graph: &G, source: usize) -> Vec<usize>
where
    G: WeightedDigraph + ?Sized,
{
    let mut marked = vec![false; graph.vertex_count()];
    let mut postorder = Vec::new();
    let mut stack = vec![Frame {
        vertex: source,
        edges: graph.adj(source),
        next: 0,
    }];
    marked[source] = true;

    while let Some(frame) = stack.last_mut() {
        match frame.edges.get(frame.next).copied() {
            Some(edge) => {
                frame.next += 1;
                if !marked[edge.to] {
                    marked[edge.to] = true;
                    stack.push(Frame {
                        vertex: edge.to,
                        edges: graph.adj(edge.to),
                        next: 0,
                    });
                }
            }
            None => {
                postorder.push(frame.vertex);
                stack.pop();
            }
        }
    }

    postorder.reverse();
    postorder
}

/// Get a shortest path from `source` to `dest` as a list of edges.
///
/// Returns an empty path when `dest` is `source` or is unreachable.
///
/// # Panics
///
/// Panics if `source` or `dest` is not a vertex of `graph`.
pub fn shortest_path<G>(graph: &G, source: usize, dest: usize) -> Vec<Edge>
where
    G: WeightedDigraph + ?Sized,
{
    let vertices = graph.vertex_count();
    let mut dist_to = vec![usize::MAX; vertices];
    let mut edge_to: Vec<Option<Edge>> = vec![None; vertices];
    dist_to[source] = 0;

    let order = topological_order(graph, source);
    trace!(reachable = order.len(), vertices, "relaxing in topological order");
    for v in order {
        relax(graph, v, &mut dist_to, &mut edge_to);
    }

    path_to(dest, &edge_to)
}

fn relax<G>(graph: &G, v: usize, dist_to: &mut [usize], edge_to: &mut [Option<Edge>])
where
    G: WeightedDigraph + ?Sized,
{
    for edge in graph.adj(v) {
        let candidate = dist_to[v].saturating_add(edge.weight);
        if candidate < dist_to[edge.to] {
            dist_to[edge.to] = candidate;
            edge_to[edge.to] = Some(edge);
        }
    }
}

fn path_to(dest: usize, edge_to: &[Option<Edge>]) -> Vec<Edge> {
    let mut path = Vec::new();
    let mut cursor = edge_to[dest];
    while let Some(edge) = cursor {
        path.push(edge);
        cursor = edge_to[edge.from];
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EditGraph;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn small_graph_topological_order() {
        let graph = EditGraph::new(&['a'], &['b']);
        assert_eq!(topological_order(&graph, 0), vec![0, 2, 1, 3]);
    }

    #[test]
    fn every_edge_points_forward() {
        let old = chars("bac");
        let new = chars("cbcb");
        let graph = EditGraph::new(&old, &new);

        // A matching vertex has only its skip edge, so some grid points are
        // unreachable from the source.
        let mut reachable = vec![false; graph.vertex_count()];
        let mut pending = vec![0];
        reachable[0] = true;
        while let Some(v) = pending.pop() {
            for edge in graph.adj(v) {
                if !reachable[edge.to] {
                    reachable[edge.to] = true;
                    pending.push(edge.to);
                }
            }
        }

        let order = topological_order(&graph, 0);
        let mut visited = vec![false; graph.vertex_count()];
        for &v in &order {
            assert!(!visited[v], "vertex {v} listed twice");
            visited[v] = true;
        }
        assert_eq!(visited, reachable);
        assert_eq!(order.len(), 16);
        assert_eq!(order.first(), Some(&graph.source()));
        assert_eq!(order.last(), Some(&graph.sink()));

        let mut position = vec![0; graph.vertex_count()];
        for (index, &v) in order.iter().enumerate() {
            position[v] = index;
        }
        for &v in &order {
            for edge in graph.adj(v) {
                assert!(position[edge.from] < position[edge.to], "{edge:?}");
            }
        }
    }

    #[test]
    fn shortest_path_through_edit_graph() {
        let old = chars("bac");
        let new = chars("cbcb");
        let graph = EditGraph::new(&old, &new);

        assert_eq!(
            shortest_path(&graph, 0, 19),
            vec![
                Edge::new(0, 4, 1),
                Edge::new(4, 9, 0),
                Edge::new(9, 10, 1),
                Edge::new(10, 15, 0),
                Edge::new(15, 19, 1),
            ]
        );
    }

    #[test]
    fn path_to_source_is_empty() {
        let graph = EditGraph::new(&['a'], &['b']);
        assert!(shortest_path(&graph, 0, 0).is_empty());
    }

    #[test]
    fn unreachable_destination_is_empty() {
        let graph = EditGraph::new(&['a'], &['b']);
        // (0, 1) cannot reach (1, 0).
        assert!(shortest_path(&graph, 1, 2).is_empty());
    }

    #[test]
    fn long_paths_do_not_recurse() {
        let old = vec![0u8; 100_000];
        let new = vec![1u8];
        let graph = EditGraph::new(&old, &new);

        let path = shortest_path(&graph, graph.source(), graph.sink());
        assert_eq!(path.len(), 100_001);
        assert_eq!(path.iter().map(|e| e.weight).sum::<usize>(), 100_001);
    }
}
