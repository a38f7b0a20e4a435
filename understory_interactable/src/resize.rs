// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner-handle resize.
//!
//! A [`CornerResize`] places a spherical grab handle on each corner of a
//! rectangular surface and watches each hand's palm against them. A pinch that
//! starts inside a handle grabs that corner; while the pinch is held the corner
//! follows the palm and the diagonally opposite corner stays where it was.
//!
//! Two solvers are available:
//!
//! - [`solve_non_uniform`] scales width and height independently. Each frame it
//!   moves halfway toward the exact fit, which smooths tracking noise.
//! - [`solve_uniform`] keeps the aspect ratio. The new center is the point on
//!   the surface's diagonal that is equidistant from the fixed corner and the
//!   target, and the new scale is that distance over the unscaled half
//!   diagonal.

use alloc::vec::Vec;

use glam::DVec3;
use understory_hit3d::{Corner, SurfaceGeometry, SurfaceShape, SurfaceTransform};
use understory_proximity::{
    ContactKey, Hand, HandId, ProximityEvent, ProximityTracker, cursor_points,
};

use crate::error::SurfaceError;
use crate::surface::Surface;

/// Below this the uniform solve has no stable answer.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// The four corner grab handles of one rectangular surface.
#[derive(Clone, Debug)]
pub struct CornerResize {
    handles: [SurfaceGeometry; 4],
    trackers: [ProximityTracker; 4],
    preserve_aspect: bool,
    scratch: Vec<ProximityEvent>,
}

impl CornerResize {
    /// Handles of `radius` on each corner of `surface`.
    pub fn new(surface: &Surface, radius: f64, preserve_aspect: bool) -> Result<Self, SurfaceError> {
        let geometry = surface.geometry();
        let corners = geometry
            .world_corners()
            .ok_or(SurfaceError::ResizeRequiresRect(geometry.kind()))?;
        let shape = SurfaceShape::sphere(radius)?;
        let handles =
            corners.map(|corner| SurfaceGeometry::new(shape, SurfaceTransform::from_position(corner)));
        let tracker = ProximityTracker::points(&handles[0], cursor_points)?;
        Ok(Self {
            handles,
            trackers: [tracker.clone(), tracker.clone(), tracker.clone(), tracker],
            preserve_aspect,
            scratch: Vec::new(),
        })
    }

    /// Whether resizing keeps the aspect ratio.
    pub fn preserve_aspect(&self) -> bool {
        self.preserve_aspect
    }

    /// World-space center of a handle.
    pub fn handle_position(&self, corner: Corner) -> DVec3 {
        self.handles[corner.index()].transform.position
    }

    /// Move every handle onto the current corners of `geometry`.
    pub fn sync(&mut self, geometry: &SurfaceGeometry) {
        if let Some(corners) = geometry.world_corners() {
            for (handle, corner) in self.handles.iter_mut().zip(corners) {
                handle.transform.position = corner;
            }
        }
    }

    /// Test one hand's palm against every handle.
    pub fn check(&mut self, hand: &Hand) {
        self.scratch.clear();
        for (corner, (tracker, handle)) in Corner::ALL
            .into_iter()
            .zip(self.trackers.iter_mut().zip(&self.handles))
        {
            tracker.check(handle, hand, &mut self.scratch);
            for event in self.scratch.drain(..) {
                match event {
                    ProximityEvent::In { .. } => tracing::trace!(?corner, hand = hand.id, "handle in"),
                    ProximityEvent::Out { .. } => tracing::trace!(?corner, hand = hand.id, "handle out"),
                }
            }
        }
    }

    /// The first handle, in [`Corner::ALL`] order, that `hand`'s palm is in.
    pub fn hovered_corner(&self, hand: HandId) -> Option<Corner> {
        let key = ContactKey::new(hand, 0);
        Corner::ALL
            .into_iter()
            .find(|corner| self.trackers[corner.index()].is_in(key))
    }

    /// Forget a lost hand.
    pub fn clear(&mut self, hand: HandId) {
        self.scratch.clear();
        for tracker in &mut self.trackers {
            tracker.clear(hand, &mut self.scratch);
        }
        self.scratch.clear();
    }

    /// Drag `corner` of `surface` toward the world-space `target`.
    ///
    /// Returns whether the surface changed. The resized surface keeps no
    /// velocity so it does not drift once the handle is released.
    pub fn drag_corner(&self, surface: &mut Surface, corner: Corner, target: DVec3) -> bool {
        let geometry = surface.geometry();
        let Some(local) = geometry.shape.corner(corner) else {
            return false;
        };
        let local = DVec3::new(local.x, local.y, 0.0);
        let target = geometry.parent.inverse().transform_point3(target);
        let transform = surface.transform();
        let solved = if self.preserve_aspect {
            solve_uniform(&transform, local, target)
        } else {
            solve_non_uniform(&transform, local, target)
        };
        let Some(next) = solved else {
            tracing::trace!(?corner, "degenerate corner drag skipped");
            return false;
        };
        surface.set_transform(next);
        surface.set_last_position(next.position);
        true
    }
}

/// Scale width and height independently so `corner` approaches `target`.
///
/// `corner` is the unscaled local corner with zero Z; `target` is in parent
/// space. The new scale is the mean of the old scale and the exact fit, and the
/// position is chosen so the opposite corner does not move. Depth and Z scale
/// are kept.
pub fn solve_non_uniform(
    transform: &SurfaceTransform,
    corner: DVec3,
    target: DVec3,
) -> Option<SurfaceTransform> {
    if corner.x == 0.0 || corner.y == 0.0 {
        return None;
    }
    let reach = transform.rotation.inverse() * (target - transform.position);
    let scale = DVec3::new(
        (transform.scale.x + reach.x / corner.x) / 2.0,
        (transform.scale.y + reach.y / corner.y) / 2.0,
        transform.scale.z,
    );
    let shift = DVec3::new(
        reach.x - scale.x * corner.x,
        reach.y - scale.y * corner.y,
        0.0,
    );
    Some(SurfaceTransform {
        position: transform.position + transform.rotation * shift,
        rotation: transform.rotation,
        scale,
    })
}

/// Uniformly scale so `corner` reaches `target` with the opposite corner fixed.
///
/// The result always has a uniform scale, so a surface that started out
/// stretched snaps back to its shape's own aspect ratio on the first drag.
///
/// Returns `None` when the target leaves no stable solution: the drag is
/// perpendicular to the diagonal, or the target lies behind the fixed corner.
pub fn solve_uniform(
    transform: &SurfaceTransform,
    corner: DVec3,
    target: DVec3,
) -> Option<SurfaceTransform> {
    let diagonal = transform.rotation * corner;
    if diagonal == DVec3::ZERO {
        return None;
    }
    let fixed = transform.position - transform.rotation * (transform.scale * corner);
    let reach = target - fixed;
    let denominator = 2.0 * diagonal.dot(reach);
    if denominator.is_nan() || denominator < DEGENERATE_EPSILON {
        return None;
    }
    // Distance along the diagonal, in half diagonals, of the point
    // equidistant from `fixed` and `target`.
    let scale = reach.length_squared() / denominator;
    Some(SurfaceTransform {
        position: fixed + diagonal * scale,
        rotation: transform.rotation,
        scale: DVec3::splat(scale),
    })
}
