//! Core simulation of an expanding closed path.
//!
//! A ring of vertices repels itself and splits any edge that grows too
//! long, so the outline keeps inflating like a membrane.
//!
//! Main components:
//! - [`simulation`] — [`ClosedPathSimulation`], the single owner of the path.
//! - [`path`] — the cyclic vertex sequence and its edges.
//! - [`phases`] — repulsion, integration and subdivision for one step.
//! - [`force_buffer`] — per-step scratch space for accumulated forces.
//! - [`primitive`] — initial shapes the path is seeded from.
//! - [`render`] — snapshots and drawing through a caller-supplied surface.
//! - [`config`] — tuning constants and update policies.
//! - [`error`] — error type shared by the crate.
//! - [`types`] / [`vertex`] — ids and the vertex record.

pub mod config;
pub mod error;
pub mod force_buffer;
pub mod path;
pub mod phases;
pub mod primitive;
pub mod render;
pub mod simulation;
pub mod types;
pub mod vertex;

pub use config::{AccelerationPolicy, Config, Sweep};
pub use error::{Result, SimError};
pub use primitive::Primitive;
pub use render::{DrawStyle, Snapshot, Surface};
pub use simulation::{ClosedPathSimulation, StepReport, Viewport};
