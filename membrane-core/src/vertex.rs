use glam::Vec2;

/// A single point on the closed curve.
///
/// `acc` is the force accumulator for the current step. Whether it is
/// cleared between steps depends on [`crate::config::AccelerationPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
}

impl Vertex {
    /// Creates a vertex at rest at `pos`.
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
        }
    }

    /// Creates a vertex at rest halfway between `a` and `b`.
    pub fn midpoint(a: &Vertex, b: &Vertex) -> Self {
        Self::at((a.pos + b.pos) * 0.5)
    }

    /// Explicit Euler update: the position moves with the previous
    /// velocity, then the velocity picks up this step's acceleration.
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.vel += self.acc;
    }
}
