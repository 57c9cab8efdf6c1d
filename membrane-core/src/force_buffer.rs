use crate::types::VertexId;
use glam::Vec2;

/// A scratch buffer that accumulates repulsion per vertex for one step.
///
/// For each `VertexId`, this buffer stores:
///
/// - The sum of all force vectors acting on the vertex.
/// - How many of those contributions had their separation floored
///   because the two vertices (nearly) coincided.
///
/// Forces are gathered here from a frozen set of positions and only then
/// applied to the vertices, so the order in which pairs are visited does
/// not change the result.
#[derive(Debug, Default)]
pub struct ForceBuffer {
    /// Accumulated force for each vertex.
    force: Vec<Vec2>,
    /// Number of floored contributions for each vertex.
    floored: Vec<u32>,
}

impl ForceBuffer {
    /// Creates a new [`ForceBuffer`] with the given length, zeroed.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
            floored: vec![0; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.force.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Ensures that the internal storage has exactly `len` entries and
    /// clears all of them, even if the length was already correct.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
            self.floored.resize(len, 0);
        }
        self.clear();
    }

    /// Clears all accumulated forces, keeping the length.
    pub fn clear(&mut self) {
        self.force.fill(Vec2::ZERO);
        self.floored.fill(0);
    }

    /// Adds one force contribution for `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: VertexId, force: Vec2, floored: bool) {
        self.force[id] += force;
        if floored {
            self.floored[id] += 1;
        }
    }

    /// Total force accumulated for `id`.
    #[inline]
    pub fn total(&self, id: VertexId) -> Vec2 {
        self.force[id]
    }

    /// Number of floored contributions over all vertices.
    pub fn floored_pairs(&self) -> usize {
        self.floored.iter().map(|&c| c as usize).sum()
    }

    /// Iterates over `(id, total force)` for every vertex.
    pub fn totals(&self) -> impl Iterator<Item = (VertexId, Vec2)> + '_ {
        self.force.iter().copied().enumerate()
    }
}
