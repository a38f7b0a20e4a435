// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_hit3d::{GeometryError, ShapeKind};
use understory_proximity::ProximityError;

/// Errors raised while configuring an interactive surface.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface geometry is invalid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A tracker cannot watch this surface.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
    /// Density must be finite and strictly positive.
    #[error("density must be finite and strictly positive, got {0}")]
    InvalidDensity(f64),
    /// The derived mass is not strictly positive.
    #[error("surface mass must be strictly positive, got {0}")]
    NonPositiveMass(f64),
    /// Damping must lie in `[0, 1]`.
    #[error("damping must lie in [0, 1], got {0}")]
    InvalidDamping(f64),
    /// Corner resize only applies to rectangles.
    #[error("corner resize requires a rectangle, got {0:?}")]
    ResizeRequiresRect(ShapeKind),
}
