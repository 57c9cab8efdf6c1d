use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SimError},
    types::MIN_VERTICES,
};

/// How the per-vertex acceleration accumulator behaves between steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelerationPolicy {
    /// Never cleared: each step's repulsion is added on top of everything
    /// accumulated so far, so the outline keeps speeding up.
    #[default]
    Accumulate,
    /// Cleared to zero before every force pass.
    ResetEachStep,
}

/// Order in which repulsion and integration visit the vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    /// All forces are computed from the positions at the start of the
    /// step, then every vertex is integrated.
    #[default]
    Phased,
    /// Each vertex in index order gathers repulsion from the current
    /// positions of the others and is integrated immediately, so later
    /// vertices see earlier ones already moved.
    Interleaved,
}

/// Tuning constants for the closed-path simulation.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of vertices placed on the initial primitive. Defaults to 5;
    /// sampling is index based, so any count `>= 3` yields distinct points.
    pub vertex_count: usize,
    /// Radius of the initial circle.
    pub radius: f32,
    /// Repulsion constant `G`.
    pub gravity: f32,
    /// Multiplier applied on top of `gravity`.
    pub repulsion_scale: f32,
    /// Edges strictly longer than this are subdivided.
    pub dist_break: f32,
    /// Separations below this are floored before the inverse-square law.
    pub min_separation: f32,
    pub acceleration: AccelerationPolicy,
    pub sweep: Sweep,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vertex_count: 5,
            radius: 100.0,
            gravity: 1.5,
            repulsion_scale: 1.0,
            dist_break: 100.0,
            min_separation: 1e-3,
            acceleration: AccelerationPolicy::Accumulate,
            sweep: Sweep::Phased,
        }
    }
}

impl Config {
    /// Effective repulsion strength, `G * scale`.
    #[inline]
    pub fn strength(&self) -> f32 {
        self.gravity * self.repulsion_scale
    }

    /// Checks that the constants describe a well-defined simulation.
    ///
    /// ### Errors
    /// - [`SimError::InsufficientVertices`] if `vertex_count < 3`.
    /// - [`SimError::InvalidConfig`] if a length is not positive or a
    ///   constant is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.vertex_count < MIN_VERTICES {
            return Err(SimError::InsufficientVertices {
                count: self.vertex_count,
            });
        }

        let positive = [
            ("radius", self.radius),
            ("dist_break", self.dist_break),
            ("min_separation", self.min_separation),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("repulsion_scale", self.repulsion_scale),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        Ok(())
    }
}
