// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-standing intersection building blocks.
//!
//! Every function here returns `None` (or `false`) for degenerate input such as
//! parallel lines or zero-length segments; degeneracies happen routinely during
//! ordinary hand motion and are never errors.

use glam::DVec3;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

/// Cross products with a magnitude below this are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// Intersect the infinite line through `l0` and `l1` with a plane.
///
/// Returns `None` when the line is parallel to the plane, and also when `l0`
/// lies exactly in the plane (the line either touches at its start or lies
/// entirely in the plane; neither counts as a crossing).
pub fn line_plane_intersect(
    l0: DVec3,
    l1: DVec3,
    plane_point: DVec3,
    plane_normal: DVec3,
) -> Option<DVec3> {
    let direction = l1 - l0;
    let numerator = (plane_point - l0).dot(plane_normal);
    let denominator = direction.dot(plane_normal);
    if numerator == 0.0 || denominator == 0.0 {
        return None;
    }
    Some(l0 + direction * (numerator / denominator))
}

/// Whether `point`, assumed to lie on the line through `l0` and `l1`, lies
/// within the segment `[l0, l1]` (endpoints included).
pub fn on_segment(l0: DVec3, l1: DVec3, point: DVec3) -> bool {
    let direction = l1 - l0;
    let projection = direction.dot(point - l0);
    projection >= 0.0 && projection <= direction.length_squared()
}

/// Strict containment of a local-space point in a rectangle centered on the origin.
///
/// Only X and Y are considered. Points on an edge are outside.
pub fn point_in_rect_local(point: DVec3, half_width: f64, half_height: f64) -> Option<DVec3> {
    let inside = -half_width < point.x
        && point.x < half_width
        && -half_height < point.y
        && point.y < half_height;
    inside.then_some(point)
}

/// Strict containment of a point, relative to a sphere's center, in that sphere.
pub fn point_in_sphere_local(point: DVec3, radius: f64) -> Option<DVec3> {
    (point.length() < radius).then_some(point)
}

/// Crossing point of two 2D segments.
///
/// Uses the parametric cross-product form `a.p0 + t (a.p1 - a.p0)`. Returns
/// `None` for (near-)parallel segments or when either parameter falls outside
/// `[0, 1]`.
pub fn segment_2d_intersect(a: Line, b: Line) -> Option<Point> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let rxs = r.cross(s);
    if rxs.abs() < PARALLEL_EPSILON {
        return None;
    }
    let diff = b.p0 - a.p0;
    let t = diff.cross(s) / rxs;
    let u = diff.cross(r) / rxs;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(a.p0 + r * t)
}

/// Find where a point travelling from `prev` to `curr` crossed a rectangle's edges.
///
/// `corners` are the rectangle's corners in order around the perimeter (the
/// last corner connects back to the first). When the travel crosses more than one
/// edge, the crossing nearest to `prev` wins.
pub fn edge_recovery(prev: Point, curr: Point, corners: &[Point; 4]) -> Option<Point> {
    let travel = Line::new(prev, curr);
    let mut best: Option<(f64, Point)> = None;
    for i in 0..corners.len() {
        let edge = Line::new(corners[i], corners[(i + 1) % corners.len()]);
        let Some(crossing) = segment_2d_intersect(edge, travel) else {
            continue;
        };
        let dist_sq = (crossing - prev).hypot2();
        if best.is_none_or(|(d, _)| dist_sq < d) {
            best = Some((dist_sq, crossing));
        }
    }
    best.map(|(_, p)| p)
}
