// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DAffine3, DVec3};
use kurbo::Point;

use crate::segment::{
    edge_recovery, line_plane_intersect, on_segment, point_in_rect_local, point_in_sphere_local,
};
use crate::{ShapeKind, SurfaceShape, SurfaceTransform};

/// Result of testing a segment against a rectangular surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SegmentHit {
    /// Where the segment crosses the surface's plane, whether or not that point
    /// is inside the rectangle. `None` when the segment does not reach the plane.
    pub possible: Option<DVec3>,
    /// The crossing point when it also lies strictly inside the rectangle.
    pub hit: Option<DVec3>,
}

/// An explicit description of an interactive surface: what it is and where it is.
///
/// The world transform is `parent * transform`. Shape extents are unscaled; the
/// transform's scale stretches them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    /// Local shape.
    pub shape: SurfaceShape,
    /// Transform relative to `parent`.
    pub transform: SurfaceTransform,
    /// World transform of the parent space.
    pub parent: DAffine3,
}

impl SurfaceGeometry {
    /// A parentless surface.
    pub fn new(shape: SurfaceShape, transform: SurfaceTransform) -> Self {
        Self {
            shape,
            transform,
            parent: DAffine3::IDENTITY,
        }
    }

    /// Builder-style parent setter.
    pub fn with_parent(mut self, parent: DAffine3) -> Self {
        self.parent = parent;
        self
    }

    /// Shape kind shortcut.
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Local-to-world transform.
    pub fn world_affine(&self) -> DAffine3 {
        self.parent * self.transform.to_affine()
    }

    /// World-space origin of the surface.
    pub fn world_position(&self) -> DVec3 {
        self.world_affine().translation
    }

    /// World-space facing direction (local +Z), normalized.
    pub fn world_normal(&self) -> DVec3 {
        self.world_affine().matrix3.z_axis.normalize_or_zero()
    }

    /// Map a world-space point into the surface's local space.
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.world_affine().inverse().transform_point3(world)
    }

    /// Map a local-space point into world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.world_affine().transform_point3(local)
    }

    /// World-space corners of a rectangle, clockwise from the top left.
    pub fn world_corners(&self) -> Option<[DVec3; 4]> {
        let affine = self.world_affine();
        let corners = self.shape.local_corners()?;
        Some(corners.map(|c| affine.transform_point3(DVec3::new(c.x, c.y, 0.0))))
    }

    /// Test the segment `[l0, l1]` against a rectangular surface.
    ///
    /// `possible` is filled whenever the segment crosses the infinite plane;
    /// `hit` only when the crossing is also strictly inside the rectangle. For
    /// spheres both are `None`.
    pub fn intersect_segment(&self, l0: DVec3, l1: DVec3) -> SegmentHit {
        let SurfaceShape::Rect {
            half_width,
            half_height,
        } = self.shape
        else {
            return SegmentHit::default();
        };
        let affine = self.world_affine();
        let normal = affine.matrix3.z_axis.normalize_or_zero();
        let Some(point) = line_plane_intersect(l0, l1, affine.translation, normal) else {
            return SegmentHit::default();
        };
        if !on_segment(l0, l1, point) {
            return SegmentHit::default();
        }
        let local = affine.inverse().transform_point3(point);
        SegmentHit {
            possible: Some(point),
            hit: point_in_rect_local(local, half_width, half_height).map(|_| point),
        }
    }

    /// Test a world-space point against a spherical surface.
    ///
    /// Returns the displacement from the sphere's center to the point when it is
    /// strictly inside. Distances are measured in world units and ignore the
    /// surface's scale, so handles keep their reach while their owner is resized.
    pub fn contains_point(&self, point: DVec3) -> Option<DVec3> {
        let SurfaceShape::Sphere { radius } = self.shape else {
            return None;
        };
        point_in_sphere_local(point - self.world_position(), radius)
    }

    /// Signed local-Z position of a world point that lies over a rectangle.
    ///
    /// Returns `None` when the point's projection falls outside the rectangle or
    /// when the point is exactly on the plane.
    pub fn overlap(&self, point: DVec3) -> Option<f64> {
        let SurfaceShape::Rect {
            half_width,
            half_height,
        } = self.shape
        else {
            return None;
        };
        let local = self.to_local(point);
        point_in_rect_local(local, half_width, half_height)
            .map(|p| p.z)
            .filter(|z| *z != 0.0)
    }

    /// Recover the edge crossing of a point that moved on the plane from `prev`
    /// to `curr` (both world-space points on the surface's plane).
    ///
    /// The search runs in the surface's local 2D frame; the recovered crossing is
    /// returned in world space.
    pub fn recover_edge_crossing(&self, prev: DVec3, curr: DVec3) -> Option<DVec3> {
        let corners = self.shape.local_corners()?;
        let inverse = self.world_affine().inverse();
        let prev = inverse.transform_point3(prev);
        let curr = inverse.transform_point3(curr);
        let crossing = edge_recovery(
            Point::new(prev.x, prev.y),
            Point::new(curr.x, curr.y),
            &corners,
        )?;
        Some(self.to_world(DVec3::new(crossing.x, crossing.y, 0.0)))
    }
}
