//! Geometry primitives and intersection tests
//!
//! Pure math shared by collision resolution and by host editing tools that
//! hit-test placed shapes. Degenerate inputs (zero-length segments, parallel
//! lines) resolve to `None` or a clamped distance - nothing here panics on
//! runtime data.

use glam::DVec2;
use std::ops::RangeInclusive;

/// An infinite line in slope/intercept form: `y = slope * x + intercept`.
///
/// Vertical lines carry an infinite slope; callers must branch on
/// [`Line::has_infinite_slope`] before evaluating `y_at`.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Line through two points. A vertical pair yields an infinite slope.
    pub fn through(p1: DVec2, p2: DVec2) -> Self {
        let slope = (p2.y - p1.y) / (p2.x - p1.x);
        Self {
            slope,
            intercept: p1.y - p1.x * slope,
        }
    }

    #[inline]
    pub fn has_infinite_slope(&self) -> bool {
        self.slope.is_infinite()
    }

    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// A finite segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: DVec2,
    pub end: DVec2,
}

impl LineSegment {
    #[inline]
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.delta().length()
    }

    pub fn x_range(&self) -> RangeInclusive<f64> {
        self.start.x.min(self.end.x)..=self.start.x.max(self.end.x)
    }

    pub fn y_range(&self) -> RangeInclusive<f64> {
        self.start.y.min(self.end.y)..=self.start.y.max(self.end.y)
    }

    /// Bounding-range membership. NaN coordinates always fail.
    pub fn contains_point(&self, p: DVec2) -> bool {
        self.x_range().contains(&p.x) && self.y_range().contains(&p.y)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points([self.start, self.end])
    }
}

/// A circle described by center and radius.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn x_range(&self) -> RangeInclusive<f64> {
        (self.center.x - self.radius)..=(self.center.x + self.radius)
    }

    pub fn y_range(&self) -> RangeInclusive<f64> {
        (self.center.y - self.radius)..=(self.center.y + self.radius)
    }

    pub fn bounds(&self) -> Bounds {
        let r = DVec2::splat(self.radius);
        Bounds {
            min: self.center - r,
            max: self.center + r,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Smallest box containing every point. Empty input yields a degenerate
    /// box at the origin.
    pub fn from_points<I: IntoIterator<Item = DVec2>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        bounds
    }

    #[inline]
    pub fn inflate(&self, r: f64) -> Self {
        let e = DVec2::splat(r);
        Self {
            min: self.min - e,
            max: self.max + e,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Distance from `p` to the segment `a`-`b`.
///
/// Projects `p` onto the infinite line through the segment, clamps the
/// projection parameter to `[0, 1]`, then measures to the clamped point.
/// A degenerate segment (`a == b`) measures straight to `a`.
pub fn distance_from_point_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }

    let t = (p - a).dot(ab) / len_sq;
    let closest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        a + ab * t
    };
    p.distance(closest)
}

/// Intersection point of two segments, or `None` when the underlying lines
/// are parallel or the crossing falls outside either segment's bounds.
pub fn segment_segment_intersection(a: &LineSegment, b: &LineSegment) -> Option<DVec2> {
    let line_a = Line::through(a.start, a.end);
    let line_b = Line::through(b.start, b.end);

    let point = if line_a.has_infinite_slope() && line_b.has_infinite_slope() {
        return None;
    } else if line_a.has_infinite_slope() {
        DVec2::new(a.start.x, line_b.y_at(a.start.x))
    } else if line_b.has_infinite_slope() {
        DVec2::new(b.start.x, line_a.y_at(b.start.x))
    } else {
        line_line_intersection(&line_a, &line_b)?
    };

    (a.contains_point(point) && b.contains_point(point)).then_some(point)
}

/// Intersection of two infinite lines. Equal slopes never intersect.
fn line_line_intersection(l1: &Line, l2: &Line) -> Option<DVec2> {
    if l1.slope == l2.slope {
        return None;
    }
    let x = (l2.intercept - l1.intercept) / (l1.slope - l2.slope);
    Some(DVec2::new(x, l1.y_at(x)))
}

/// First crossing of a swept segment into a circle, nearest the sweep start
/// along the direction of travel.
///
/// Finds the chord midpoint by projecting the to-center vector onto the
/// sweep direction, rejects when the midpoint sits outside the radius, then
/// walks back half the chord length. The entry point must lie within the
/// sweep segment's bounds.
pub fn segment_circle_intersection(sweep: &LineSegment, circle: &Circle) -> Option<DVec2> {
    let delta = sweep.delta();
    let len = delta.length();
    if len == 0.0 {
        return None;
    }
    let dir = delta / len;

    let to_center = circle.center - sweep.start;
    let midpoint = sweep.start + dir * to_center.dot(dir);

    let offset_sq = circle.center.distance_squared(midpoint);
    let radius_sq = circle.radius * circle.radius;
    if offset_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - offset_sq).sqrt();
    let entry = midpoint - dir * half_chord;
    sweep.contains_point(entry).then_some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_on_segment_distance_zero() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 10.0);
        let on = DVec2::new(5.0, 5.0);
        assert!(distance_from_point_to_segment(on, a, b) < 1e-12);
    }

    #[test]
    fn test_point_beyond_endpoint_clamps() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        // Past the far end: distance is to the endpoint, not the line
        let p = DVec2::new(13.0, 4.0);
        assert!((distance_from_point_to_segment(p, a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment_is_a_point() {
        let a = DVec2::new(3.0, 4.0);
        let d = distance_from_point_to_segment(DVec2::ZERO, a, a);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_crossing_diagonals_intersect_at_center() {
        let a = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let b = LineSegment::new(DVec2::new(0.0, 10.0), DVec2::new(10.0, 0.0));
        let p = segment_segment_intersection(&a, &b).expect("diagonals cross");
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_segments_do_not_intersect() {
        let a = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0));
        let b = LineSegment::new(DVec2::new(0.0, 1.0), DVec2::new(10.0, 1.0));
        assert!(segment_segment_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_lines_cross_outside_segment_bounds() {
        let a = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0));
        let b = LineSegment::new(DVec2::new(10.0, 0.0), DVec2::new(11.0, -1.0));
        assert!(segment_segment_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_vertical_segment_intersection() {
        let vertical = LineSegment::new(DVec2::new(5.0, -10.0), DVec2::new(5.0, 10.0));
        let flat = LineSegment::new(DVec2::new(0.0, 2.0), DVec2::new(10.0, 2.0));
        let p = segment_segment_intersection(&vertical, &flat).expect("crosses");
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);

        let other_vertical = LineSegment::new(DVec2::new(7.0, -10.0), DVec2::new(7.0, 10.0));
        assert!(segment_segment_intersection(&vertical, &other_vertical).is_none());
    }

    #[test]
    fn test_zero_length_segment_never_intersects() {
        let point = LineSegment::new(DVec2::new(5.0, 5.0), DVec2::new(5.0, 5.0));
        let diag = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        assert!(segment_segment_intersection(&point, &diag).is_none());
    }

    #[test]
    fn test_sweep_enters_circle_at_near_edge() {
        // Sweep along +x into a circle centered at (10, 0) radius 2
        let sweep = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(20.0, 0.0));
        let circle = Circle::new(DVec2::new(10.0, 0.0), 2.0);
        let entry = segment_circle_intersection(&sweep, &circle).expect("hits");
        assert!((entry.x - 8.0).abs() < 1e-12);
        assert!(entry.y.abs() < 1e-12);
    }

    #[test]
    fn test_sweep_misses_circle() {
        let sweep = LineSegment::new(DVec2::new(0.0, 5.0), DVec2::new(20.0, 5.0));
        let circle = Circle::new(DVec2::new(10.0, 0.0), 2.0);
        assert!(segment_circle_intersection(&sweep, &circle).is_none());
    }

    #[test]
    fn test_sweep_stops_short_of_circle() {
        // Circle is on the line but past the end of the sweep
        let sweep = LineSegment::new(DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0));
        let circle = Circle::new(DVec2::new(10.0, 0.0), 2.0);
        assert!(segment_circle_intersection(&sweep, &circle).is_none());
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::from_points([DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0)]);
        let b = Bounds::from_points([DVec2::new(5.0, 5.0), DVec2::new(15.0, 15.0)]);
        let c = Bounds::from_points([DVec2::new(20.0, 20.0), DVec2::new(30.0, 30.0)]);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Inflating closes the gap
        assert!(a.inflate(10.0).overlaps(&c));
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric_under_endpoint_swap(
            px in -100.0_f64..100.0, py in -100.0_f64..100.0,
            ax in -100.0_f64..100.0, ay in -100.0_f64..100.0,
            bx in -100.0_f64..100.0, by in -100.0_f64..100.0,
        ) {
            let p = DVec2::new(px, py);
            let a = DVec2::new(ax, ay);
            let b = DVec2::new(bx, by);
            let d1 = distance_from_point_to_segment(p, a, b);
            let d2 = distance_from_point_to_segment(p, b, a);
            prop_assert!((d1 - d2).abs() < 1e-9);
        }

        #[test]
        fn prop_distance_never_exceeds_endpoint_distance(
            px in -100.0_f64..100.0, py in -100.0_f64..100.0,
            ax in -100.0_f64..100.0, ay in -100.0_f64..100.0,
            bx in -100.0_f64..100.0, by in -100.0_f64..100.0,
        ) {
            let p = DVec2::new(px, py);
            let a = DVec2::new(ax, ay);
            let b = DVec2::new(bx, by);
            let d = distance_from_point_to_segment(p, a, b);
            prop_assert!(d <= p.distance(a) + 1e-9);
            prop_assert!(d <= p.distance(b) + 1e-9);
        }

        #[test]
        fn prop_intersection_lies_on_both_segments(
            ax in -50.0_f64..50.0, ay in -50.0_f64..50.0,
            bx in -50.0_f64..50.0, by in -50.0_f64..50.0,
            cx in -50.0_f64..50.0, cy in -50.0_f64..50.0,
            dx in -50.0_f64..50.0, dy in -50.0_f64..50.0,
        ) {
            let s1 = LineSegment::new(DVec2::new(ax, ay), DVec2::new(bx, by));
            let s2 = LineSegment::new(DVec2::new(cx, cy), DVec2::new(dx, dy));
            if let Some(p) = segment_segment_intersection(&s1, &s2) {
                prop_assert!(s1.contains_point(p));
                prop_assert!(s2.contains_point(p));
            }
        }
    }
}
