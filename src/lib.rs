//! Ballbox - a 2D ball-physics sandbox engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collision sweeps, time stepping)
//! - `scene`: Save/load of the full entity store as a versioned JSON envelope
//!
//! Rendering, input tools and the frame clock are host concerns: the host
//! feeds elapsed wall time into a [`sim::TimeStepper`], the stepper drains it
//! into [`sim::Simulation::step`] calls, and the host reads entity state back
//! between steps to draw.

pub mod scene;
pub mod sim;

pub use scene::{SceneError, SceneFile};
pub use sim::{Ball, Boundary, BoundaryOrientation, Simulation};

/// Engine configuration constants
pub mod consts {
    /// Fixed-policy simulation timestep (240 Hz)
    pub const FIXED_STEP_SIZE: f64 = 1.0 / 240.0;
    /// Semi-fixed-policy simulation timestep (60 Hz)
    pub const SEMI_FIXED_STEP_SIZE: f64 = 1.0 / 60.0;

    /// Default ball restitution
    pub const BALL_ELASTICITY: f64 = 0.7;
    /// Default boundary restitution
    pub const BOUNDARY_ELASTICITY: f64 = 0.7;
    /// Default static-line restitution
    pub const LINE_ELASTICITY: f64 = 0.9;
    /// Default static-circle restitution
    pub const CIRCLE_ELASTICITY: f64 = 0.7;

    /// Default ball radius
    pub const BALL_RADIUS: f64 = 10.0;
}
