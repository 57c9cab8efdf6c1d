use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::{
    config::{Config, Sweep},
    error::{Result, SimError},
    force_buffer::ForceBuffer,
    path::ClosedPath,
    phases,
    primitive::Primitive,
    render::{self, DrawStyle, Snapshot, Surface},
    types::{MIN_VERTICES, VertexId},
};

/// Size of the drawing area the initial shape is centred in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// ### Errors
    /// [`SimError::InvalidViewport`] unless both sides are positive and
    /// finite.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(SimError::InvalidViewport { width, height })
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// What happened during one call to [`ClosedPathSimulation::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Ids of vertices inserted by subdivision, valid until the next step.
    pub inserted: Vec<VertexId>,
    /// Ordered vertex pairs whose separation was floored.
    pub floored_pairs: usize,
}

/// A closed path of mutually repelling vertices that subdivides its
/// over-long edges.
///
/// The driver calls [`step`](Self::step) once per frame and reads the
/// result through [`snapshot`](Self::snapshot) or [`draw`](Self::draw)
/// between steps.
#[derive(Debug)]
pub struct ClosedPathSimulation {
    path: ClosedPath,
    cfg: Config,
    viewport: Viewport,
    forces: ForceBuffer,
    steps: u64,
}

impl ClosedPathSimulation {
    /// Seeds a new path from `primitive`, centred in a `width x height`
    /// viewport.
    ///
    /// ### Errors
    /// - [`SimError::InvalidViewport`] for a non-positive size.
    /// - [`SimError::InsufficientVertices`] / [`SimError::InvalidConfig`]
    ///   from [`Config::validate`].
    pub fn initialize(primitive: Primitive, width: f32, height: f32, cfg: Config) -> Result<Self> {
        let viewport = Viewport::new(width, height)?;
        cfg.validate()?;

        let positions = primitive.sample(viewport.center(), cfg.radius, cfg.vertex_count);
        let path = ClosedPath::from_positions(positions)?;

        ftlog::info!(
            "Initialized {primitive} with {} vertices in {width}x{height}",
            path.len()
        );

        Ok(Self {
            forces: ForceBuffer::with_len(path.len()),
            path,
            cfg,
            viewport,
            steps: 0,
        })
    }

    /// Like [`initialize`](Self::initialize) but with the primitive given
    /// by name.
    ///
    /// ### Errors
    /// [`SimError::InvalidPrimitiveKind`] for anything but `"circle"`,
    /// before any vertex is created.
    pub fn initialize_named(kind: &str, width: f32, height: f32, cfg: Config) -> Result<Self> {
        let primitive: Primitive = kind.parse()?;
        Self::initialize(primitive, width, height, cfg)
    }

    /// Wraps an existing path, e.g. a hand-built fixture.
    pub fn from_path(path: ClosedPath, viewport: Viewport, cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            forces: ForceBuffer::with_len(path.len()),
            path,
            cfg,
            viewport,
            steps: 0,
        })
    }

    /// Advances the simulation by one tick: repulsion, integration, then
    /// subdivision.
    ///
    /// ### Panics
    /// If the path has fewer than three vertices, which can only happen
    /// through a bug since paths never shrink.
    pub fn step(&mut self) -> StepReport {
        assert!(
            self.path.len() >= MIN_VERTICES,
            "closed path degenerated to {} vertices",
            self.path.len()
        );

        let floored_pairs = match self.cfg.sweep {
            Sweep::Phased => {
                let floored = phases::repulsion_phase(&mut self.path, &self.cfg, &mut self.forces);
                phases::integration_phase(&mut self.path);
                floored
            }
            Sweep::Interleaved => phases::interleaved_phase(&mut self.path, &self.cfg),
        };
        if floored_pairs > 0 {
            ftlog::warn!(
                "Step {}: floored separation of {floored_pairs} vertex pairs",
                self.steps
            );
        }

        let inserted = phases::subdivision_phase(&mut self.path, &self.cfg);
        if !inserted.is_empty() {
            ftlog::debug!(
                "Step {}: subdivided at {inserted:?}, now {} vertices",
                self.steps,
                self.path.len()
            );
        }

        self.steps += 1;
        StepReport {
            inserted,
            floored_pairs,
        }
    }

    /// Copies the current positions, in path order.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            positions: self.path.positions().collect(),
        }
    }

    /// Renders the current state onto `surface`.
    pub fn draw(&self, surface: &mut impl Surface, style: &DrawStyle) {
        render::draw(&self.snapshot(), surface, style);
    }

    /// Records a new viewport size. Existing vertices are not moved or
    /// rescaled; only a later re-initialization uses the new centre.
    ///
    /// ### Errors
    /// [`SimError::InvalidViewport`] for a non-positive size; the previous
    /// viewport is kept.
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.viewport = Viewport::new(width, height)?;
        ftlog::info!("Viewport resized to {width}x{height}");
        Ok(())
    }

    /// Replaces every velocity with a random direction of length `scale`.
    pub fn jitter(&mut self, scale: f32, rng: &mut impl Rng) {
        for v in self.path.vertices_mut() {
            let angle = rng.random_range(0.0..TAU);
            v.vel = Vec2::from_angle(angle) * scale;
        }
    }

    #[inline]
    pub fn path(&self) -> &ClosedPath {
        &self.path
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Mutable access to the tuning constants. Changes take effect on the
    /// next step; `vertex_count` and `radius` only matter for a new
    /// initialization.
    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccelerationPolicy;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn initialize_places_vertex_zero_below_center() {
        let sim = ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, Config::default())
            .unwrap();

        assert_eq!(sim.len(), 5);
        assert_eq!(sim.snapshot().positions[0], Vec2::new(400.0, 400.0));
        assert_eq!(sim.steps(), 0);
        assert!(sim.path().vertices().iter().all(|v| v.vel == Vec2::ZERO && v.acc == Vec2::ZERO));
    }

    #[test]
    fn initialize_named_rejects_unknown_kind() {
        let err = ClosedPathSimulation::initialize_named("hexagon", 800.0, 600.0, Config::default())
            .unwrap_err();
        assert_eq!(err, SimError::InvalidPrimitiveKind("hexagon".to_string()));
    }

    #[test]
    fn initialize_rejects_bad_viewport_and_config() {
        let err = ClosedPathSimulation::initialize(Primitive::Circle, 0.0, 600.0, Config::default())
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidViewport { .. }));

        let cfg = Config {
            vertex_count: 2,
            ..Config::default()
        };
        let err = ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, cfg).unwrap_err();
        assert_eq!(err, SimError::InsufficientVertices { count: 2 });
    }

    #[test]
    fn first_default_step_splits_twice() {
        // The default pentagon has edges of 2·100·sin(36°) ≈ 117.6, above
        // the default break distance, and nothing moves on the first step.
        let mut sim =
            ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, Config::default())
                .unwrap();
        let before = sim.snapshot();

        let report = sim.step();

        assert_eq!(report.inserted, vec![1, 6]);
        assert_eq!(report.floored_pairs, 0);
        assert_eq!(sim.len(), 7);
        let after = sim.snapshot();
        assert_eq!(after.positions[1], (before.positions[0] + before.positions[1]) * 0.5);
        assert_eq!(after.positions[6], (before.positions[4] + before.positions[0]) * 0.5);
    }

    #[test]
    fn step_without_split_gives_every_vertex_velocity() {
        let cfg = Config {
            dist_break: 200.0,
            ..Config::default()
        };
        let mut sim = ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, cfg).unwrap();

        let report = sim.step();

        assert!(report.inserted.is_empty());
        assert_eq!(sim.len(), 5);
        assert_eq!(sim.steps(), 1);
        assert!(sim.path().vertices().iter().all(|v| v.vel != Vec2::ZERO));
    }

    #[test]
    fn reset_policy_keeps_acceleration_per_step() {
        let cfg = Config {
            dist_break: 1000.0,
            acceleration: AccelerationPolicy::ResetEachStep,
            ..Config::default()
        };
        let mut sim = ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, cfg).unwrap();
        sim.step();
        let first = sim.path().vertex(0).acc;
        sim.step();

        // Positions barely changed, so the acceleration did not double.
        let second = sim.path().vertex(0).acc;
        assert!((second - first).length() < first.length() * 0.1);
    }

    #[test]
    fn on_resize_keeps_vertices_in_place() {
        let mut sim =
            ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, Config::default())
                .unwrap();
        let before = sim.snapshot();

        sim.on_resize(1920.0, 1080.0).unwrap();

        assert_eq!(sim.viewport().center(), Vec2::new(960.0, 540.0));
        assert_eq!(sim.snapshot(), before);

        assert!(sim.on_resize(-1.0, 10.0).is_err());
        assert_eq!(sim.viewport().width, 1920.0);
    }

    #[test]
    fn jitter_sets_velocities_of_given_length() {
        let mut sim =
            ClosedPathSimulation::initialize(Primitive::Circle, 800.0, 600.0, Config::default())
                .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        sim.jitter(2.5, &mut rng);

        for v in sim.path().vertices() {
            assert!((v.vel.length() - 2.5).abs() < 1e-5);
        }
    }

    #[test]
    fn from_path_validates_config() {
        let path = ClosedPath::from_positions([Vec2::ZERO, Vec2::X, Vec2::Y]).unwrap();
        let viewport = Viewport::new(10.0, 10.0).unwrap();
        let cfg = Config {
            dist_break: -1.0,
            ..Config::default()
        };
        assert!(ClosedPathSimulation::from_path(path, viewport, cfg).is_err());
    }
}
