//! Drawing through a caller-supplied surface.
//!
//! The simulation never holds a rendering handle. The driver passes a
//! [`Surface`] into [`draw`] each frame and decides what a "point" and a
//! "line" look like on its canvas.

use glam::Vec2;

use crate::{path::cyclic_edges, types::VertexId};

/// Minimal drawing capability the core needs.
pub trait Surface {
    /// Plots vertex `id` at `pos` with the given stroke weight.
    fn point(&mut self, id: VertexId, pos: Vec2, weight: f32);

    /// Draws a straight segment from `from` to `to`.
    fn line(&mut self, from: Vec2, to: Vec2, weight: f32);
}

/// Stroke weights used by [`draw`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawStyle {
    pub point_weight: f32,
    pub line_weight: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            point_weight: 4.0,
            line_weight: 0.3,
        }
    }
}

/// Read-only copy of the vertex positions, in path order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub positions: Vec<Vec2>,
}

impl Snapshot {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Cyclic edges `(i, (i + 1) % len)`, wraparound included.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> {
        cyclic_edges(self.len())
    }

    /// Endpoints of every cyclic edge.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.edges()
            .map(move |(a, b)| (self.positions[a], self.positions[b]))
    }
}

/// Plots every vertex, then connects consecutive vertices, closing the
/// loop from the last back to the first.
pub fn draw(snapshot: &Snapshot, surface: &mut impl Surface, style: &DrawStyle) {
    for (id, &pos) in snapshot.positions.iter().enumerate() {
        surface.point(id, pos, style.point_weight);
    }
    for (a, b) in snapshot.segments() {
        surface.line(a, b, style.line_weight);
    }
}
