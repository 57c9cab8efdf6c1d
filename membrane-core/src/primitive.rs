//! Initial shapes a closed path can be seeded from.

use std::{f32::consts::TAU, fmt, str::FromStr};

use glam::Vec2;

use crate::error::SimError;

/// Shape the initial vertices are sampled from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Primitive {
    #[default]
    Circle,
}

impl Primitive {
    /// Samples `count` points on this primitive around `center`.
    ///
    /// For [`Primitive::Circle`], point `k` sits at
    /// `center + radius * (sin(k * step), cos(k * step))` with
    /// `step = 2π / count`. Angles are derived from the index rather than
    /// accumulated, so exactly `count` distinct points come back.
    pub fn sample(self, center: Vec2, radius: f32, count: usize) -> Vec<Vec2> {
        match self {
            Primitive::Circle => {
                let step = TAU / count as f32;
                (0..count)
                    .map(|k| {
                        let angle = k as f32 * step;
                        center + radius * Vec2::new(angle.sin(), angle.cos())
                    })
                    .collect()
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Circle => "circle",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Primitive::Circle),
            other => Err(SimError::InvalidPrimitiveKind(other.to_string())),
        }
    }
}
