//! A generic mutable directed graph.
//!
//! The same structure backs both task dependency graphs and extension
//! dependency graphs. Forward and backward adjacency are kept symmetric at
//! all times: an edge `a -> b` is recorded in `a`'s outgoing set and in
//! `b`'s incoming set, and removing a vertex erases every edge that touches
//! it on both sides.
//!
//! Vertex identity is structural: any `Eq + Hash + Clone` type works, which
//! is what lets task identifiers and extension paths share the
//! implementation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A directed graph over structurally-comparable vertices.
#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    forward: HashMap<T, HashSet<T>>,
    backward: HashMap<T, HashSet<T>>,
}

impl<T: Eq + Hash> PartialEq for DirectedGraph<T> {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward && self.backward == other.backward
    }
}

impl<T: Eq + Hash> Eq for DirectedGraph<T> {}

impl<T> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> DirectedGraph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All vertices, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = &T> {
        self.forward.keys()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.forward.len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Whether the graph contains the given vertex.
    pub fn contains_vertex(&self, vertex: &T) -> bool {
        self.forward.contains_key(vertex)
    }

    /// Whether the graph contains an edge from `from` to `to`.
    pub fn contains_edge(&self, from: &T, to: &T) -> bool {
        self.forward
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// Add a vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: T) -> bool {
        if self.forward.contains_key(&vertex) {
            return false;
        }
        self.forward.insert(vertex.clone(), HashSet::new());
        self.backward.insert(vertex, HashSet::new());
        true
    }

    /// Remove a vertex along with every edge that touches it.
    /// Returns `false` if the vertex was not present.
    pub fn remove_vertex(&mut self, vertex: &T) -> bool {
        let Some(outgoing) = self.forward.remove(vertex) else {
            return false;
        };
        for target in &outgoing {
            if let Some(sources) = self.backward.get_mut(target) {
                sources.remove(vertex);
            }
        }
        if let Some(incoming) = self.backward.remove(vertex) {
            for source in &incoming {
                if let Some(targets) = self.forward.get_mut(source) {
                    targets.remove(vertex);
                }
            }
        }
        true
    }

    /// Add an edge from `from` to `to`, creating either endpoint if it is
    /// not in the graph yet. Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, from: T, to: T) -> bool {
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());
        let inserted = self
            .forward
            .get_mut(&from)
            .is_some_and(|targets| targets.insert(to.clone()));
        if inserted {
            if let Some(sources) = self.backward.get_mut(&to) {
                sources.insert(from);
            }
        }
        inserted
    }

    /// Remove the edge from `from` to `to`, leaving both vertices in place.
    /// Returns `false` if the edge was not present.
    pub fn remove_edge(&mut self, from: &T, to: &T) -> bool {
        let removed = self
            .forward
            .get_mut(from)
            .is_some_and(|targets| targets.remove(to));
        if removed {
            if let Some(sources) = self.backward.get_mut(to) {
                sources.remove(from);
            }
        }
        removed
    }

    /// The set of vertices `vertex` has an edge to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexNotFound`] if the vertex is not in the graph.
    pub fn outgoing_edges(&self, vertex: &T) -> Result<&HashSet<T>> {
        self.forward.get(vertex).ok_or(Error::VertexNotFound)
    }

    /// The set of vertices that have an edge to `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexNotFound`] if the vertex is not in the graph.
    pub fn incoming_edges(&self, vertex: &T) -> Result<&HashSet<T>> {
        self.backward.get(vertex).ok_or(Error::VertexNotFound)
    }

    /// All vertices reachable from `vertex` by following outgoing edges
    /// transitively. The vertex itself is included only when a cycle leads
    /// back to it. Returns the empty set for a vertex that is not in the
    /// graph, so lookups by possibly-unregistered identifiers stay
    /// convenient.
    pub fn reachable_vertices(&self, vertex: &T) -> HashSet<T> {
        let mut reachable = HashSet::new();
        let mut pending = VecDeque::new();
        if let Some(targets) = self.forward.get(vertex) {
            pending.extend(targets.iter().cloned());
        }
        while let Some(next) = pending.pop_front() {
            if reachable.insert(next.clone()) {
                if let Some(targets) = self.forward.get(&next) {
                    pending.extend(targets.iter().cloned());
                }
            }
        }
        reachable
    }

    /// Merge another graph's vertices and edges into this one. Additive
    /// only: nothing is removed from either graph.
    pub fn union_with(&mut self, other: &DirectedGraph<T>) {
        for vertex in other.forward.keys() {
            self.add_vertex(vertex.clone());
        }
        for (from, targets) in &other.forward {
            for to in targets {
                self.add_edge(from.clone(), to.clone());
            }
        }
    }
}

/// Document form of a graph: a vertex list plus an edge list, both sorted
/// for deterministic output.
#[derive(Serialize, Deserialize)]
struct GraphDoc<T> {
    vertices: Vec<T>,
    edges: Vec<(T, T)>,
}

impl<T> Serialize for DirectedGraph<T>
where
    T: Eq + Hash + Clone + Ord + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut vertices: Vec<T> = self.forward.keys().cloned().collect();
        vertices.sort();
        let mut edges: Vec<(T, T)> = self
            .forward
            .iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(move |to| (from.clone(), to.clone()))
            })
            .collect();
        edges.sort();
        GraphDoc { vertices, edges }.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for DirectedGraph<T>
where
    T: Eq + Hash + Clone + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = GraphDoc::<T>::deserialize(deserializer)?;
        let mut graph = DirectedGraph::new();
        for vertex in doc.vertices {
            graph.add_vertex(vertex);
        }
        for (from, to) in doc.edges {
            graph.add_edge(from, to);
        }
        Ok(graph)
    }
}
