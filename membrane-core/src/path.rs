use glam::Vec2;

use crate::{
    error::{Result, SimError},
    types::{Edge, MIN_VERTICES, VertexId},
    vertex::Vertex,
};

/// An ordered, cyclic sequence of vertices.
///
/// Vertex `i` is joined to vertex `(i + 1) % len`. The path never holds
/// fewer than [`MIN_VERTICES`] vertices and never shrinks.
#[derive(Clone, Debug)]
pub struct ClosedPath {
    vertices: Vec<Vertex>,
}

/// Iterator over the cyclic edges of a path or snapshot with `len` vertices.
pub fn cyclic_edges(len: usize) -> impl Iterator<Item = Edge> {
    (0..len).map(move |i| (i, (i + 1) % len))
}

impl ClosedPath {
    /// Builds a path of resting vertices at `positions`, in order.
    ///
    /// ### Errors
    /// [`SimError::InsufficientVertices`] if fewer than three positions are
    /// given.
    pub fn from_positions(positions: impl IntoIterator<Item = Vec2>) -> Result<Self> {
        let vertices: Vec<Vertex> = positions.into_iter().map(Vertex::at).collect();
        if vertices.len() < MIN_VERTICES {
            return Err(SimError::InsufficientVertices {
                count: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false` for a constructed path; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(|v| v.pos)
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> {
        cyclic_edges(self.len())
    }

    /// Length of the edge leaving vertex `from`.
    pub fn edge_length(&self, from: VertexId) -> f32 {
        let to = (from + 1) % self.len();
        self.vertices[from].pos.distance(self.vertices[to].pos)
    }

    /// Splits the edge ending at `to` by inserting its midpoint at index
    /// `to`. Passing `to == len()` splits the wraparound edge and appends
    /// the midpoint after the last vertex.
    ///
    /// ### Returns
    /// The id of the new vertex, which is `to`.
    pub fn split_edge_before(&mut self, to: VertexId) -> VertexId {
        let n = self.len();
        assert!(to >= 1 && to <= n, "edge end {to} out of range for {n} vertices");
        let a = self.vertices[to - 1];
        let b = self.vertices[to % n];
        self.vertices.insert(to, Vertex::midpoint(&a, &b));
        to
    }
}
