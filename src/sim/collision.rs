//! Sweep-based collision resolution
//!
//! Balls can cross a thin line in a single step, so every static-shape test
//! sweeps the segment from the ball's previous position to its current one
//! instead of overlap-testing the final position. A hit produces a
//! [`Deflection`]: the corrected position past the contact point and the
//! reflected, restitution-scaled velocity.
//!
//! Any candidate that comes out non-finite is dropped as a miss; NaN must
//! never reach stored ball state.

use glam::DVec2;

use super::geometry::{
    Circle, LineSegment, segment_circle_intersection, segment_segment_intersection,
};
use super::state::Ball;

/// Outcome of a resolved sweep collision
#[derive(Debug, Clone, Copy)]
pub struct Deflection {
    /// Where the ball ends up: contact point plus the reflected overshoot
    pub position: DVec2,
    /// Reflected velocity, rescaled by the ball's elasticity
    pub velocity: DVec2,
}

/// Mirror a direction about a surface normal: `d - 2n(d·n)`
#[inline]
pub fn reflect(direction: DVec2, normal: DVec2) -> DVec2 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Shared bounce response: reflect the sweep about the contact normal,
/// rescale to the distance the ball overshot past the contact point, and
/// scale speed by the ball's elasticity.
fn bounce(ball: &Ball, sweep: &LineSegment, contact: DVec2, normal: DVec2) -> Option<Deflection> {
    let reflected = reflect(sweep.delta(), normal);
    let len = reflected.length();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    let direction = reflected / len;

    let overshoot = contact.distance(sweep.end);
    let position = contact + direction * overshoot;
    let velocity = direction * (ball.velocity.length() * ball.elasticity);
    if !position.is_finite() || !velocity.is_finite() {
        return None;
    }
    Some(Deflection { position, velocity })
}

/// Sweep the ball's motion against a static segment.
///
/// The segment is thickened into a band: offset by the ball radius along
/// whichever normal faces the incoming sweep (negative dot with the sweep
/// direction). Endpoint rounding is NOT handled here - callers resolve each
/// endpoint separately as a zero-radius [`sweep_circle`] cap.
pub fn sweep_segment(
    ball: &Ball,
    sweep: &LineSegment,
    surface: &LineSegment,
) -> Option<Deflection> {
    let along = surface.delta();
    let len = along.length();
    if len == 0.0 {
        // Degenerate line; its caps still resolve as points
        return None;
    }

    let mut normal = DVec2::new(-along.y, along.x) / len;
    if normal.dot(sweep.delta()) > 0.0 {
        normal = -normal;
    }

    let offset = normal * ball.radius;
    let band = LineSegment::new(surface.start + offset, surface.end + offset);
    let contact = segment_segment_intersection(sweep, &band)?;
    bounce(ball, sweep, contact, normal)
}

/// Sweep the ball's motion against a static circle of the given radius.
///
/// The test uses an effective radius of `radius + ball.radius`, so passing
/// `radius = 0.0` turns a point (a line endpoint) into a ball-radius cap.
pub fn sweep_circle(
    ball: &Ball,
    sweep: &LineSegment,
    center: DVec2,
    radius: f64,
) -> Option<Deflection> {
    let effective = Circle::new(center, radius + ball.radius);
    if !sweep.bounds().overlaps(&effective.bounds()) {
        return None;
    }

    let contact = segment_circle_intersection(sweep, &effective)?;
    let to_contact = contact - center;
    let len = to_contact.length();
    if len == 0.0 {
        return None;
    }
    bounce(ball, sweep, contact, to_contact / len)
}

/// Resolve one unordered ball pair.
///
/// When the centers are within the radius sum the balls are separated
/// symmetrically along the contact normal to exact touch, then the normal
/// velocity components are exchanged with the 1D elastic-collision formula
/// using each ball's derived mass. Tangential components pass through
/// unchanged, and no restitution scalar applies - the exchange is perfectly
/// elastic by contract.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball) {
    let delta = b.position - a.position;
    let distance = delta.length();
    if distance > a.radius + b.radius {
        return;
    }
    if distance == 0.0 || !distance.is_finite() {
        // Coincident centers have no usable normal
        return;
    }
    let normal = delta / distance;

    let overlap = (a.radius + b.radius) - distance;
    a.position -= normal * (overlap * 0.5);
    b.position += normal * (overlap * 0.5);

    let (m1, m2) = (a.mass(), b.mass());
    let v1n = a.velocity.dot(normal);
    let v2n = b.velocity.dot(normal);
    let v1t = a.velocity - normal * v1n;
    let v2t = b.velocity - normal * v2n;

    let total = m1 + m2;
    let new_v1n = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / total;
    let new_v2n = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / total;

    a.velocity = v1t + normal * new_v1n;
    b.velocity = v2t + normal * new_v2n;
}
