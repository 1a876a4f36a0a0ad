//! Navigation graph over platform anchor points
//!
//! Vertices live in an append-only arena and are addressed by index. The
//! graph is rebuilt from scratch whenever a level loads.

use glam::Vec2;

/// How an agent traverses an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Walk,
}

/// Index of a vertex in its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub action: Action,
}

#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    vertices: Vec<Vec2>,
    edges: Vec<Edge>,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    pub fn add_vertex(&mut self, position: Vec2) -> VertexId {
        self.vertices.push(position);
        VertexId(self.vertices.len() - 1)
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, action: Action) {
        self.edges.push(Edge { from, to, action });
    }

    pub fn vertex(&self, id: VertexId) -> Option<Vec2> {
        self.vertices.get(id.0).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}
