//! Simulation entities and the entity store
//!
//! Everything a saved scene must round-trip lives here. Entities are plain
//! structs addressed by stable `u32` ids assigned at insertion; hosts keep
//! the id, not a reference, and look the entity up again to edit it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Circle, LineSegment};
use crate::consts::*;

/// A dynamic ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub position: DVec2,
    /// Position at the end of the previous step. `None` until the ball has
    /// stepped once; collision sweeps need it and skip balls without one.
    #[serde(default)]
    pub previous_position: Option<DVec2>,
    pub velocity: DVec2,
    pub radius: f64,
    /// Frozen balls (host previews, pinned props) skip stepping entirely.
    pub affected_by_physics: bool,
    pub elasticity: f64,
}

impl Ball {
    pub fn new(position: DVec2, radius: f64) -> Self {
        Self {
            id: 0,
            position,
            previous_position: None,
            velocity: DVec2::ZERO,
            radius,
            affected_by_physics: true,
            elasticity: BALL_ELASTICITY,
        }
    }

    /// Collision mass, derived from radius. The `/ 25.0` normalization is
    /// load-bearing: every ball-ball outcome depends on it.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.radius * self.radius / 25.0
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.position.x - self.radius
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.position.x + self.radius
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.position.y - self.radius
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.position.y + self.radius
    }
}

/// Which side of the arena a boundary walls off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryOrientation {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

/// An infinite axis-aligned wall bounding the arena on one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub orientation: BoundaryOrientation,
    /// Wall coordinate on the boundary's axis
    pub value: f64,
    pub elasticity: f64,
    /// Disabled boundaries are skipped entirely during resolution
    pub enabled: bool,
}

impl Boundary {
    pub fn new(orientation: BoundaryOrientation, value: f64) -> Self {
        Self {
            orientation,
            value,
            elasticity: BOUNDARY_ELASTICITY,
            enabled: true,
        }
    }
}

/// A static line segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsLine {
    pub id: u32,
    pub start: DVec2,
    pub end: DVec2,
    pub elasticity: f64,
}

impl PhysicsLine {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            id: 0,
            start,
            end,
            elasticity: LINE_ELASTICITY,
        }
    }

    #[inline]
    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.start, self.end)
    }
}

/// A static circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsCircle {
    pub id: u32,
    pub position: DVec2,
    pub radius: f64,
    pub elasticity: f64,
}

impl PhysicsCircle {
    pub fn new(position: DVec2, radius: f64) -> Self {
        Self {
            id: 0,
            position,
            radius,
            elasticity: CIRCLE_ELASTICITY,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

/// A static chain of line segments through an ordered point sequence
///
/// Points are private so the cached bounding box can never go stale: every
/// mutator invalidates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsPolyline {
    pub id: u32,
    points: Vec<DVec2>,
    #[serde(skip)]
    bounds: Option<Bounds>,
}

impl PhysicsPolyline {
    /// Chains need at least two points to collide with anything; shorter
    /// sequences are inert but allowed while a host tool is mid-edit.
    pub fn new(points: Vec<DVec2>) -> Self {
        Self {
            id: 0,
            points,
            bounds: None,
        }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn set_points(&mut self, points: Vec<DVec2>) {
        self.points = points;
        self.bounds = None;
    }

    pub fn set_point(&mut self, index: usize, point: DVec2) {
        self.points[index] = point;
        self.bounds = None;
    }

    pub fn insert_point(&mut self, index: usize, point: DVec2) {
        self.points.insert(index, point);
        self.bounds = None;
    }

    pub fn push_point(&mut self, point: DVec2) {
        self.points.push(point);
        self.bounds = None;
    }

    pub fn remove_point(&mut self, index: usize) -> DVec2 {
        self.bounds = None;
        self.points.remove(index)
    }

    /// Cached bounding box of the point sequence, recomputed after mutation.
    pub fn bounds(&mut self) -> Bounds {
        *self
            .bounds
            .get_or_insert_with(|| Bounds::from_points(self.points.iter().copied()))
    }

    /// The implicit segments between consecutive points.
    pub fn segments(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.points
            .windows(2)
            .map(|pair| LineSegment::new(pair[0], pair[1]))
    }
}

/// The entity store: every object in the sandbox plus global knobs.
///
/// Single writer, single thread: the host mutates between steps, `step`
/// mutates during one, renderers read in between. Serializing this struct
/// IS the scene snapshot; the serde field names are the format contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Acceleration along +Y, applied to every physics-affected ball
    pub gravity: f64,
    pub enable_ball_collisions: bool,
    pub balls: Vec<Ball>,
    pub boundaries: Vec<Boundary>,
    pub lines: Vec<PhysicsLine>,
    pub circles: Vec<PhysicsCircle>,
    pub polylines: Vec<PhysicsPolyline>,
    #[serde(default)]
    next_entity_id: u32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            gravity: 0.0,
            enable_ball_collisions: false,
            balls: Vec::new(),
            boundaries: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            polylines: Vec::new(),
            next_entity_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    // --- Balls ---

    /// Add a ball and return its id.
    pub fn add_ball(&mut self, mut ball: Ball) -> u32 {
        ball.id = self.next_entity_id();
        let id = ball.id;
        self.balls.push(ball);
        id
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: u32) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn remove_ball(&mut self, id: u32) {
        self.balls.retain(|b| b.id != id);
    }

    pub fn remove_all_balls(&mut self) {
        self.balls.clear();
    }

    // --- Boundaries ---

    pub fn add_boundary(&mut self, boundary: Boundary) {
        self.boundaries.push(boundary);
    }

    /// First boundary with the given orientation, for host edits.
    pub fn boundary_mut(&mut self, orientation: BoundaryOrientation) -> Option<&mut Boundary> {
        self.boundaries
            .iter_mut()
            .find(|b| b.orientation == orientation)
    }

    // --- Lines ---

    pub fn add_line(&mut self, mut line: PhysicsLine) -> u32 {
        line.id = self.next_entity_id();
        let id = line.id;
        self.lines.push(line);
        id
    }

    pub fn line_mut(&mut self, id: u32) -> Option<&mut PhysicsLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    pub fn remove_line(&mut self, id: u32) {
        self.lines.retain(|l| l.id != id);
    }

    pub fn remove_all_lines(&mut self) {
        self.lines.clear();
    }

    // --- Circles ---

    pub fn add_circle(&mut self, mut circle: PhysicsCircle) -> u32 {
        circle.id = self.next_entity_id();
        let id = circle.id;
        self.circles.push(circle);
        id
    }

    pub fn circle_mut(&mut self, id: u32) -> Option<&mut PhysicsCircle> {
        self.circles.iter_mut().find(|c| c.id == id)
    }

    pub fn remove_circle(&mut self, id: u32) {
        self.circles.retain(|c| c.id != id);
    }

    pub fn remove_all_circles(&mut self) {
        self.circles.clear();
    }

    // --- Polylines ---

    pub fn add_polyline(&mut self, mut polyline: PhysicsPolyline) -> u32 {
        polyline.id = self.next_entity_id();
        let id = polyline.id;
        self.polylines.push(polyline);
        id
    }

    pub fn polyline_mut(&mut self, id: u32) -> Option<&mut PhysicsPolyline> {
        self.polylines.iter_mut().find(|p| p.id == id)
    }

    pub fn remove_polyline(&mut self, id: u32) {
        self.polylines.retain(|p| p.id != id);
    }

    pub fn remove_all_polylines(&mut self) {
        self.polylines.clear();
    }

    /// Restore id-counter headroom after deserializing a scene whose
    /// envelope predates the counter field; fresh ids must never collide
    /// with loaded entities.
    pub fn refresh_entity_id_counter(&mut self) {
        let max_id = self
            .balls
            .iter()
            .map(|b| b.id)
            .chain(self.lines.iter().map(|l| l.id))
            .chain(self.circles.iter().map(|c| c.id))
            .chain(self.polylines.iter().map(|p| p.id))
            .max()
            .unwrap_or(0);
        self.next_entity_id = self.next_entity_id.max(max_id + 1);
    }

    /// Remove every placed entity. The arena boundaries survive a clear.
    pub fn clear_all(&mut self) {
        self.balls.clear();
        self.lines.clear();
        self.circles.clear();
        self.polylines.clear();
    }
}
