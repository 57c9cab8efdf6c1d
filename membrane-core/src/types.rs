/// Identifier for a vertex in a [`crate::path::ClosedPath`].
///
/// This is an index into the path's vertex list. Subdivision inserts
/// vertices in the middle of the list, so an id is only meaningful until
/// the next call to [`crate::simulation::ClosedPathSimulation::step`].
pub type VertexId = usize;

/// A directed edge `(from, to)` between two cyclically consecutive vertices.
pub type Edge = (VertexId, VertexId);

/// Smallest vertex count a closed path may have.
pub const MIN_VERTICES: usize = 3;
