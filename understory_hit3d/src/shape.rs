// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface shapes in local (unscaled) coordinates.

use core::f64::consts::PI;

use kurbo::{Point, Rect};

use crate::GeometryError;

/// Coarse classification of a [`SurfaceShape`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    /// A flat rectangle in the local XY plane, facing local +Z.
    Rect,
    /// A sphere centered on the local origin.
    Sphere,
}

/// The geometry of an interactive surface, centered on its local origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceShape {
    /// Axis-aligned rectangle in the local XY plane.
    Rect {
        /// Half of the rectangle's width (local X).
        half_width: f64,
        /// Half of the rectangle's height (local Y).
        half_height: f64,
    },
    /// Sphere around the local origin.
    Sphere {
        /// Sphere radius.
        radius: f64,
    },
}

/// One of the four corners of a rectangle.
///
/// Corners are ordered clockwise starting at the top left, matching
/// [`SurfaceShape::local_corners`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Corner {
    /// `(-w, +h)`
    TopLeft,
    /// `(+w, +h)`
    TopRight,
    /// `(+w, -h)`
    BottomRight,
    /// `(-w, -h)`
    BottomLeft,
}

impl Corner {
    /// All corners in clockwise order from the top left.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Index of this corner in [`Corner::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The diagonally opposite corner.
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }
}

fn checked_extent(what: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidExtent { what, value })
    }
}

impl SurfaceShape {
    /// A rectangle of the given full width and height.
    pub fn rect(width: f64, height: f64) -> Result<Self, GeometryError> {
        Ok(Self::Rect {
            half_width: checked_extent("width", width)? / 2.0,
            half_height: checked_extent("height", height)? / 2.0,
        })
    }

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Result<Self, GeometryError> {
        Ok(Self::Sphere {
            radius: checked_extent("radius", radius)?,
        })
    }

    /// The kind of this shape.
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    /// Area used for mass computation.
    ///
    /// Spheres are treated as their flat cross-section (`π r²`), which is how
    /// round buttons and handles are weighed.
    pub fn area(&self) -> f64 {
        match *self {
            Self::Rect {
                half_width,
                half_height,
            } => 4.0 * half_width * half_height,
            Self::Sphere { radius } => PI * radius * radius,
        }
    }

    /// Local bounds of a rectangle; `None` for spheres.
    pub fn local_bounds(&self) -> Option<Rect> {
        match *self {
            Self::Rect {
                half_width,
                half_height,
            } => Some(Rect::new(-half_width, -half_height, half_width, half_height)),
            Self::Sphere { .. } => None,
        }
    }

    /// Corners of a rectangle in local space, clockwise from the top left.
    pub fn local_corners(&self) -> Option<[Point; 4]> {
        let r = self.local_bounds()?;
        Some([
            Point::new(r.x0, r.y1),
            Point::new(r.x1, r.y1),
            Point::new(r.x1, r.y0),
            Point::new(r.x0, r.y0),
        ])
    }

    /// A single rectangle corner in local space.
    pub fn corner(&self, corner: Corner) -> Option<Point> {
        self.local_corners().map(|c| c[corner.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_extents() {
        assert!(SurfaceShape::rect(0.0, 1.0).is_err());
        assert!(SurfaceShape::rect(1.0, -1.0).is_err());
        assert!(SurfaceShape::sphere(f64::NAN).is_err());
        assert_eq!(
            SurfaceShape::sphere(0.0),
            Err(GeometryError::InvalidExtent {
                what: "radius",
                value: 0.0
            })
        );
    }

    #[test]
    fn corners_are_clockwise_from_top_left() {
        let shape = SurfaceShape::rect(2.0, 4.0).unwrap();
        let corners = shape.local_corners().unwrap();
        assert_eq!(corners[0], Point::new(-1.0, 2.0));
        assert_eq!(corners[1], Point::new(1.0, 2.0));
        assert_eq!(corners[2], Point::new(1.0, -2.0));
        assert_eq!(corners[3], Point::new(-1.0, -2.0));
        assert_eq!(
            shape.corner(Corner::BottomLeft.opposite()),
            Some(Point::new(1.0, 2.0))
        );
    }

    #[test]
    fn area_by_kind() {
        assert!((SurfaceShape::rect(0.1, 0.2).unwrap().area() - 0.02).abs() < 1e-12);
        let sphere = SurfaceShape::sphere(2.0).unwrap();
        assert!((sphere.area() - 4.0 * PI).abs() < 1e-12);
        assert!(sphere.local_corners().is_none());
    }
}
