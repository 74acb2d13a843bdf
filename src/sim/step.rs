//! Per-step integration and collision ordering
//!
//! `Simulation::step` advances each physics-affected ball in store order:
//! integrate, then resolve against boundaries, static lines, static circles,
//! polylines and finally later balls - sequentially, one pass, no global
//! solver. A ball corrected by one resolver is re-swept from its previous
//! position for the next, so multi-collision steps stay deterministic even
//! when the artifacts are visibly approximate.

use glam::DVec2;

use super::collision::{self, Deflection};
use super::geometry::{Bounds, LineSegment};
use super::state::{BoundaryOrientation, Simulation};

impl Simulation {
    /// Advance the simulation by `dt` seconds.
    ///
    /// Sweep tests need a previous position, so a ball's very first step
    /// integrates and clamps to boundaries only; line/circle/polyline
    /// resolution starts on its second step.
    pub fn step(&mut self, dt: f64) {
        // Count captured at entry; index access means no iterator to
        // invalidate even if a host callback someday mutates mid-step.
        let ball_count = self.balls.len();
        for i in 0..ball_count {
            if !self.balls[i].affected_by_physics {
                continue;
            }

            let swept_from = self.balls[i].previous_position;
            self.integrate(i, dt);
            self.resolve_boundaries(i);
            if let Some(prev) = swept_from {
                self.resolve_lines(i, prev);
                self.resolve_circles(i, prev);
                self.resolve_polylines(i, prev);
            }
            if self.enable_ball_collisions {
                self.resolve_ball_pairs(i);
            }

            let ball = &mut self.balls[i];
            ball.previous_position = Some(ball.position);
        }
    }

    fn integrate(&mut self, i: usize, dt: f64) {
        let gravity = self.gravity;
        let ball = &mut self.balls[i];
        ball.velocity.y += gravity * dt;
        ball.position += ball.velocity * dt;
    }

    /// Clamp against every enabled wall and reflect the perpendicular
    /// velocity component. Min walls reflect outward-positive, max walls
    /// outward-negative; restitution is the product of both elasticities.
    fn resolve_boundaries(&mut self, i: usize) {
        let Self {
            balls, boundaries, ..
        } = self;
        let ball = &mut balls[i];

        for boundary in boundaries.iter() {
            if !boundary.enabled {
                continue;
            }
            let elasticity = boundary.elasticity * ball.elasticity;
            match boundary.orientation {
                BoundaryOrientation::MinX => {
                    if ball.min_x() < boundary.value {
                        ball.position.x = boundary.value + ball.radius;
                        ball.velocity.x = ball.velocity.x.abs() * elasticity;
                    }
                }
                BoundaryOrientation::MaxX => {
                    if ball.max_x() > boundary.value {
                        ball.position.x = boundary.value - ball.radius;
                        ball.velocity.x = -ball.velocity.x.abs() * elasticity;
                    }
                }
                BoundaryOrientation::MinY => {
                    if ball.min_y() < boundary.value {
                        ball.position.y = boundary.value + ball.radius;
                        ball.velocity.y = ball.velocity.y.abs() * elasticity;
                    }
                }
                BoundaryOrientation::MaxY => {
                    if ball.max_y() > boundary.value {
                        ball.position.y = boundary.value - ball.radius;
                        ball.velocity.y = -ball.velocity.y.abs() * elasticity;
                    }
                }
            }
        }
    }

    fn resolve_lines(&mut self, i: usize, prev: DVec2) {
        for line_index in 0..self.lines.len() {
            let surface = self.lines[line_index].segment();
            self.deflect_off_segment(i, prev, surface);
        }
    }

    fn resolve_circles(&mut self, i: usize, prev: DVec2) {
        for circle_index in 0..self.circles.len() {
            let (center, radius) = {
                let circle = &self.circles[circle_index];
                (circle.position, circle.radius)
            };
            let hit = {
                let ball = &self.balls[i];
                if ball.position == prev {
                    return;
                }
                let sweep = LineSegment::new(prev, ball.position);
                collision::sweep_circle(ball, &sweep, center, radius)
            };
            if let Some(deflection) = hit {
                self.apply_deflection(i, deflection);
            }
        }
    }

    fn resolve_polylines(&mut self, i: usize, prev: DVec2) {
        for polyline_index in 0..self.polylines.len() {
            let radius = self.balls[i].radius;
            let sweep_bounds = Bounds::from_points([prev, self.balls[i].position]);
            let chain_bounds = self.polylines[polyline_index].bounds().inflate(radius);
            if !chain_bounds.overlaps(&sweep_bounds) {
                continue;
            }

            let segments: Vec<LineSegment> = self.polylines[polyline_index].segments().collect();
            for surface in segments {
                self.deflect_off_segment(i, prev, surface);
            }
        }
    }

    /// Step-order band-then-caps resolution shared by lines and polyline
    /// segments. The sweep is recomputed before each test because an earlier
    /// hit moves the ball; a sweep collapsed to zero length ends resolution.
    fn deflect_off_segment(&mut self, i: usize, prev: DVec2, surface: LineSegment) {
        let band_hit = {
            let ball = &self.balls[i];
            if ball.position == prev {
                return;
            }
            let sweep = LineSegment::new(prev, ball.position);
            collision::sweep_segment(ball, &sweep, &surface)
        };
        if let Some(deflection) = band_hit {
            self.apply_deflection(i, deflection);
        }

        for cap in [surface.start, surface.end] {
            let cap_hit = {
                let ball = &self.balls[i];
                if ball.position == prev {
                    return;
                }
                let sweep = LineSegment::new(prev, ball.position);
                collision::sweep_circle(ball, &sweep, cap, 0.0)
            };
            if let Some(deflection) = cap_hit {
                self.apply_deflection(i, deflection);
            }
        }
    }

    fn apply_deflection(&mut self, i: usize, deflection: Deflection) {
        let ball = &mut self.balls[i];
        ball.position = deflection.position;
        ball.velocity = deflection.velocity;
    }

    /// Resolve ball `i` against every later physics-affected ball, so each
    /// unordered pair runs exactly once per step.
    fn resolve_ball_pairs(&mut self, i: usize) {
        let (head, tail) = self.balls.split_at_mut(i + 1);
        let ball = &mut head[i];
        for other in tail.iter_mut() {
            if !other.affected_by_physics {
                continue;
            }
            collision::resolve_ball_pair(ball, other);
        }
    }
}
