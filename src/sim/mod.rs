//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Steps are driven only by the time deltas the host feeds in
//! - Stable iteration order (store order, by entity id)
//! - No rendering or platform dependencies
//!
//! A step integrates gravity, then resolves each ball against boundaries,
//! static lines, static circles, polylines and finally other balls, in that
//! fixed order. One pass per ball per step - there is no global solver, and
//! the occasional multi-collision artifact is accepted behavior.

pub mod collision;
pub mod geometry;
pub mod state;
pub mod step;
pub mod stepper;

pub use collision::{Deflection, reflect, resolve_ball_pair, sweep_circle, sweep_segment};
pub use geometry::{
    Bounds, Circle, Line, LineSegment, distance_from_point_to_segment,
    segment_circle_intersection, segment_segment_intersection,
};
pub use state::{
    Ball, Boundary, BoundaryOrientation, PhysicsCircle, PhysicsLine, PhysicsPolyline, Simulation,
};
pub use stepper::{FixedStepper, SemiFixedStepper, TimeStepper, VariableStepper};
