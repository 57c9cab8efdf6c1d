//! Per-step phases of the closed-path simulation.
//!
//! One call to [`crate::simulation::ClosedPathSimulation::step`] runs:
//! 1. [`repulsion_phase`] — every vertex is pushed away from every other
//!    vertex with an inverse-square force, gathered in a [`ForceBuffer`]
//!    and added to each vertex's acceleration.
//! 2. [`integration_phase`] — explicit Euler update of every vertex.
//! 3. [`subdivision_phase`] — over-long edges get a midpoint vertex.
//!
//! [`interleaved_phase`] replaces 1 and 2 when the configured
//! [`Sweep`](crate::config::Sweep) is `Interleaved`.

use glam::Vec2;

use crate::{
    config::{AccelerationPolicy, Config},
    force_buffer::ForceBuffer,
    path::ClosedPath,
    types::VertexId,
};

/// Repulsive force on a vertex at `a` from a vertex at `b`.
///
/// The force points from `b` towards `a` and has length
/// `cfg.strength() / d²`, where `d` is the separation floored at
/// `cfg.min_separation`. When the two points coincide there is no
/// direction to push along, so the pair is split along the x axis:
/// the vertex with the lower index (`a_first`) goes towards `-x`.
///
/// ### Returns
/// The force and whether the separation had to be floored.
pub fn repulsion(a: Vec2, b: Vec2, a_first: bool, cfg: &Config) -> (Vec2, bool) {
    let offset = a - b;
    let dist = offset.length();
    let floored = dist.is_nan() || dist < cfg.min_separation;
    let d = if floored { cfg.min_separation } else { dist };

    let fallback = if a_first { Vec2::NEG_X } else { Vec2::X };
    let dir = offset.try_normalize().unwrap_or(fallback);

    (dir * (cfg.strength() / (d * d)), floored)
}

/// Gathers pairwise repulsion and adds it to every vertex's acceleration.
///
/// Forces are computed from the positions as they are on entry, for every
/// ordered pair of distinct vertices, into `forces` (resized and cleared
/// here). With [`AccelerationPolicy::ResetEachStep`] each accumulator is
/// zeroed before the new force is added; with
/// [`AccelerationPolicy::Accumulate`] the force is added on top of what
/// the accumulator already holds.
///
/// ### Returns
/// The number of ordered pairs whose separation was floored.
pub fn repulsion_phase(path: &mut ClosedPath, cfg: &Config, forces: &mut ForceBuffer) -> usize {
    forces.ensure_len(path.len());

    let vertices = path.vertices();
    for (i, a) in vertices.iter().enumerate() {
        for (j, b) in vertices.iter().enumerate() {
            if i == j {
                continue;
            }
            let (force, floored) = repulsion(a.pos, b.pos, i < j, cfg);
            forces.add(i, force, floored);
        }
    }

    let reset = cfg.acceleration == AccelerationPolicy::ResetEachStep;
    for (v, (_, force)) in path.vertices_mut().iter_mut().zip(forces.totals()) {
        if reset {
            v.acc = Vec2::ZERO;
        }
        v.acc += force;
    }

    forces.floored_pairs()
}

/// Moves every vertex by its velocity, then adds its acceleration to the
/// velocity. Acceleration is left as it is.
pub fn integration_phase(path: &mut ClosedPath) {
    for v in path.vertices_mut() {
        v.integrate();
    }
}

/// Repulsion and integration fused into one sweep in index order.
///
/// Vertex `i` gathers repulsion from the current positions of all other
/// vertices, so vertices `0..i` are seen after they moved this step, and
/// is integrated before moving on to `i + 1`.
///
/// ### Returns
/// The number of ordered pairs whose separation was floored.
pub fn interleaved_phase(path: &mut ClosedPath, cfg: &Config) -> usize {
    let reset = cfg.acceleration == AccelerationPolicy::ResetEachStep;
    let mut floored_pairs = 0;

    for i in 0..path.len() {
        let a = path.vertex(i).pos;
        let mut total = Vec2::ZERO;
        for (j, b) in path.vertices().iter().enumerate() {
            if i == j {
                continue;
            }
            let (force, floored) = repulsion(a, b.pos, i < j, cfg);
            total += force;
            floored_pairs += usize::from(floored);
        }

        let v = &mut path.vertices_mut()[i];
        if reset {
            v.acc = Vec2::ZERO;
        }
        v.acc += total;
        v.integrate();
    }

    floored_pairs
}

/// Inserts midpoints into over-long edges.
///
/// 1. The interior edges `(i, i + 1)` for `i` in `0..len - 1` are scanned
///    in order; the first one longer than `cfg.dist_break` is split by
///    inserting its midpoint at `i + 1`, and the scan stops.
/// 2. Independently, the wraparound edge (last to first, after any
///    insertion from 1) is split by appending its midpoint if it is longer
///    than `cfg.dist_break`.
///
/// ### Returns
/// Ids of the inserted vertices, in insertion order (zero, one or two).
pub fn subdivision_phase(path: &mut ClosedPath, cfg: &Config) -> Vec<VertexId> {
    let mut inserted = Vec::with_capacity(2);

    if let Some(i) = (0..path.len() - 1).find(|&i| path.edge_length(i) > cfg.dist_break) {
        inserted.push(path.split_edge_before(i + 1));
    }

    let last = path.len() - 1;
    if path.edge_length(last) > cfg.dist_break {
        inserted.push(path.split_edge_before(path.len()));
    }

    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use glam::Vec2;

    fn path(points: &[(f32, f32)]) -> ClosedPath {
        ClosedPath::from_positions(points.iter().map(|&(x, y)| Vec2::new(x, y))).unwrap()
    }

    #[test]
    fn repulsion_points_away_and_follows_inverse_square() {
        let cfg = Config::default();
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let (f, floored) = repulsion(a, b, true, &cfg);

        assert!(!floored);
        // Pushed towards -x, away from b.
        assert!(f.dot(b - a) < 0.0);
        // |f| = 1.5 / 10².
        assert!((f.length() - 0.015).abs() < 1e-7);
    }

    #[test]
    fn repulsion_is_antisymmetric() {
        let cfg = Config::default();
        let a = Vec2::new(3.0, -2.0);
        let b = Vec2::new(-1.0, 5.0);

        let (fa, _) = repulsion(a, b, true, &cfg);
        let (fb, _) = repulsion(b, a, false, &cfg);

        assert!((fa + fb).length() < 1e-7);
    }

    #[test]
    fn repulsion_floors_coincident_points() {
        let cfg = Config::default();
        let p = Vec2::new(5.0, 5.0);

        let (fa, floored_a) = repulsion(p, p, true, &cfg);
        let (fb, floored_b) = repulsion(p, p, false, &cfg);

        assert!(floored_a && floored_b);
        assert!(fa.is_finite() && fb.is_finite());
        // The pair is split symmetrically along x.
        assert!(fa.x < 0.0 && fb.x > 0.0);
        assert_eq!(fa, -fb);
    }

    #[test]
    fn repulsion_phase_accumulates_onto_previous_acceleration() {
        let mut p = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        let cfg = Config::default();
        let mut forces = ForceBuffer::with_len(0);

        repulsion_phase(&mut p, &cfg, &mut forces);
        let first = p.vertex(0).acc;
        repulsion_phase(&mut p, &cfg, &mut forces);

        // Positions did not change, so the same force was added twice.
        assert_eq!(forces.len(), 3);
        assert!((p.vertex(0).acc - first * 2.0).length() < 1e-7);
    }

    #[test]
    fn repulsion_phase_resets_when_configured() {
        let mut p = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        let cfg = Config {
            acceleration: AccelerationPolicy::ResetEachStep,
            ..Config::default()
        };
        let mut forces = ForceBuffer::with_len(0);

        repulsion_phase(&mut p, &cfg, &mut forces);
        let first = p.vertex(0).acc;
        repulsion_phase(&mut p, &cfg, &mut forces);

        assert_eq!(p.vertex(0).acc, first);
    }

    #[test]
    fn repulsion_phase_reports_floored_pairs() {
        let mut p = path(&[(0.0, 0.0), (0.0, 0.0), (50.0, 50.0)]);
        let cfg = Config::default();
        let mut forces = ForceBuffer::with_len(0);

        let floored = repulsion_phase(&mut p, &cfg, &mut forces);

        // (0, 1) and (1, 0).
        assert_eq!(floored, 2);
        assert!(p.vertices().iter().all(|v| v.acc.is_finite()));
    }

    #[test]
    fn integration_phase_moves_with_previous_velocity() {
        let mut p = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        p.vertices_mut()[0].vel = Vec2::new(1.0, 0.0);
        p.vertices_mut()[0].acc = Vec2::new(0.0, 1.0);

        integration_phase(&mut p);

        assert_eq!(p.vertex(0).pos, Vec2::new(1.0, 0.0));
        assert_eq!(p.vertex(0).vel, Vec2::new(1.0, 1.0));
        assert_eq!(p.vertex(1).pos, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn interleaved_phase_matches_phased_on_first_step() {
        // Everything starts at rest, so nobody moves during the first
        // sweep and both orders see the same positions.
        let cfg = Config::default();
        let mut phased = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        let mut interleaved = phased.clone();
        let mut forces = ForceBuffer::default();

        repulsion_phase(&mut phased, &cfg, &mut forces);
        integration_phase(&mut phased);
        interleaved_phase(&mut interleaved, &cfg);

        for (a, b) in phased.vertices().iter().zip(interleaved.vertices()) {
            assert!((a.vel - b.vel).length() < 1e-7);
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn interleaved_phase_sees_moved_vertices() {
        let cfg = Config::default();
        let mut phased = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        phased.vertices_mut()[0].vel = Vec2::new(10.0, 0.0);
        let mut interleaved = phased.clone();
        let mut forces = ForceBuffer::default();

        repulsion_phase(&mut phased, &cfg, &mut forces);
        integration_phase(&mut phased);
        interleaved_phase(&mut interleaved, &cfg);

        // Vertex 0 is integrated first in both, with identical inputs.
        assert_eq!(phased.vertex(0).vel, interleaved.vertex(0).vel);
        // Vertex 1 saw vertex 0 ten units closer in the interleaved sweep.
        assert!(interleaved.vertex(1).acc.x > phased.vertex(1).acc.x);
    }

    #[test]
    fn subdivision_phase_splits_first_long_interior_edge() {
        let mut p = path(&[(0.0, 0.0), (120.0, 0.0), (60.0, 50.0)]);
        let cfg = Config::default();

        let inserted = subdivision_phase(&mut p, &cfg);

        assert_eq!(inserted, vec![1]);
        assert_eq!(p.len(), 4);
        assert_eq!(p.vertex(1).pos, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn subdivision_phase_only_splits_one_interior_edge() {
        // Edges (0, 1), (1, 2) and (2, 3) are all long; only the first is split.
        let mut p = path(&[(0.0, 0.0), (120.0, 0.0), (240.0, 0.0), (0.0, 10.0)]);
        let cfg = Config {
            dist_break: 119.0,
            ..Config::default()
        };

        let inserted = subdivision_phase(&mut p, &cfg);

        assert_eq!(inserted, vec![1]);
        assert_eq!(p.len(), 5);
        assert_eq!(p.vertex(2).pos, Vec2::new(120.0, 0.0));
        assert_eq!(p.vertex(3).pos, Vec2::new(240.0, 0.0));
    }

    #[test]
    fn subdivision_phase_appends_wraparound_midpoint() {
        let mut p = path(&[(0.0, 0.0), (60.0, 50.0), (120.0, 0.0)]);
        let cfg = Config::default();

        let inserted = subdivision_phase(&mut p, &cfg);

        assert_eq!(inserted, vec![3]);
        assert_eq!(p.vertex(3).pos, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn subdivision_phase_can_insert_twice() {
        let mut p = path(&[(0.0, 0.0), (120.0, 0.0), (120.0, 50.0)]);
        let cfg = Config::default();

        let inserted = subdivision_phase(&mut p, &cfg);

        assert_eq!(inserted, vec![1, 4]);
        assert_eq!(p.len(), 5);
        assert_eq!(p.vertex(1).pos, Vec2::new(60.0, 0.0));
        assert_eq!(p.vertex(4).pos, Vec2::new(60.0, 25.0));
    }

    #[test]
    fn subdivision_phase_is_noop_below_threshold() {
        let mut p = path(&[(0.0, 0.0), (50.0, 0.0), (25.0, 40.0)]);
        let cfg = Config::default();

        assert!(subdivision_phase(&mut p, &cfg).is_empty());
        assert_eq!(p.len(), 3);
    }
}
