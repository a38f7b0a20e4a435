// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The physical body behind an interactive surface.
//!
//! A [`Surface`] pairs [`SurfaceGeometry`] with the state the per-frame
//! integrator needs: mass, the previous position (velocity is implicit in the
//! difference), a rest position for the return spring, auxiliary anchor springs
//! and a force accumulator.
//!
//! Positions are expressed in the surface's parent space.

use alloc::vec::Vec;

use glam::{DAffine3, DVec3};
use understory_hit3d::{SurfaceGeometry, SurfaceTransform};

use crate::error::SurfaceError;

/// Handle to an auxiliary spring, returned by [`Surface::add_spring`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringId(u32);

/// A Hooke spring pulling the surface toward a parent-space anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorSpring {
    /// Rest position of the surface origin.
    pub anchor: DVec3,
    /// Spring constant.
    pub stiffness: f64,
}

impl AnchorSpring {
    /// Force this spring applies to a surface at `position`.
    pub fn force_at(&self, position: DVec3) -> DVec3 {
        (self.anchor - position) * self.stiffness
    }
}

/// Geometry plus integrator state for one surface.
#[derive(Clone, Debug)]
pub struct Surface {
    geometry: SurfaceGeometry,
    mass: f64,
    // Pushthrough spring constant; equals the mass.
    stiffness: f64,
    return_spring: Option<f64>,
    springs: Vec<(SpringId, AnchorSpring)>,
    next_spring: u32,
    force: DVec3,
    last_position: DVec3,
    original_position: DVec3,
}

impl Surface {
    /// Wrap `geometry`, deriving mass from its area and `density`.
    pub fn new(geometry: SurfaceGeometry, density: f64) -> Result<Self, SurfaceError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SurfaceError::InvalidDensity(density));
        }
        let mass = geometry.shape.area() * density;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SurfaceError::NonPositiveMass(mass));
        }
        let position = geometry.transform.position;
        Ok(Self {
            geometry,
            mass,
            stiffness: mass,
            return_spring: None,
            springs: Vec::new(),
            next_spring: 0,
            force: DVec3::ZERO,
            last_position: position,
            original_position: position,
        })
    }

    /// Current geometry.
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Current transform relative to the parent.
    pub fn transform(&self) -> SurfaceTransform {
        self.geometry.transform
    }

    /// Replace the transform wholesale. Velocity and rest position are kept.
    pub fn set_transform(&mut self, transform: SurfaceTransform) {
        self.geometry.transform = transform;
    }

    /// Parent-space position.
    pub fn position(&self) -> DVec3 {
        self.geometry.transform.position
    }

    /// Move the surface without touching its previous position, which gives it
    /// the implied velocity.
    pub fn set_position(&mut self, position: DVec3) {
        self.geometry.transform.position = position;
    }

    /// Position before the last update.
    pub fn last_position(&self) -> DVec3 {
        self.last_position
    }

    /// Rest position of the return spring.
    pub fn original_position(&self) -> DVec3 {
        self.original_position
    }

    /// Displacement since the last update.
    pub fn velocity(&self) -> DVec3 {
        self.position() - self.last_position
    }

    /// Area times density.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Spring constant applied to pushthrough depth.
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Take the current position as both the rest position and the previous
    /// position, cancelling any velocity.
    pub fn reset_position(&mut self) {
        let position = self.position();
        self.last_position = position;
        self.original_position = position;
    }

    /// Move the surface under a new parent while keeping its world transform.
    ///
    /// Velocity is cancelled and the new position becomes the rest position.
    pub fn change_parent(&mut self, parent: DAffine3) {
        let world = self.geometry.world_affine();
        self.geometry.parent = parent;
        self.geometry.transform = SurfaceTransform::from_affine(parent.inverse() * world);
        self.reset_position();
    }

    /// Spring constant of the return spring, if one is attached.
    pub fn return_spring(&self) -> Option<f64> {
        self.return_spring
    }

    /// Attach (or with `None`, detach) a spring pulling back to the rest
    /// position. Push along Z only acts on surfaces that have one.
    pub fn set_return_spring(&mut self, stiffness: Option<f64>) {
        self.return_spring = stiffness;
    }

    /// Attach an auxiliary spring.
    pub fn add_spring(&mut self, anchor: DVec3, stiffness: f64) -> SpringId {
        let id = SpringId(self.next_spring);
        self.next_spring = self.next_spring.wrapping_add(1);
        self.springs.push((id, AnchorSpring { anchor, stiffness }));
        id
    }

    /// Detach an auxiliary spring. Returns whether it was attached.
    pub fn remove_spring(&mut self, id: SpringId) -> bool {
        let before = self.springs.len();
        self.springs.retain(|(s, _)| *s != id);
        self.springs.len() != before
    }

    /// Attached auxiliary springs in insertion order.
    pub fn springs(&self) -> impl Iterator<Item = &AnchorSpring> + '_ {
        self.springs.iter().map(|(_, s)| s)
    }

    /// Add a force for the next integration step.
    pub fn apply_force(&mut self, force: DVec3) {
        self.force += force;
    }

    /// Force accumulated since the last step.
    pub fn force(&self) -> DVec3 {
        self.force
    }

    /// Drop any accumulated force.
    pub fn clear_force(&mut self) {
        self.force = DVec3::ZERO;
    }

    /// Accumulate the return spring and every auxiliary spring at the current
    /// position.
    pub fn apply_spring_forces(&mut self) {
        let position = self.position();
        if let Some(k) = self.return_spring {
            self.force += (self.original_position - position) * k;
        }
        for (_, spring) in &self.springs {
            self.force += spring.force_at(position);
        }
    }

    /// Integrate one frame and return the proposed next position.
    ///
    /// The velocity is the frame-to-frame displacement plus `force / mass`,
    /// reduced by `damping`. The accumulator is consumed. The surface itself is
    /// not moved.
    pub fn step(&mut self, damping: f64) -> DVec3 {
        let position = self.position();
        let mut velocity = position - self.last_position;
        velocity += self.force / self.mass;
        velocity *= 1.0 - damping;
        self.force = DVec3::ZERO;
        position + velocity
    }

    pub(crate) fn set_last_position(&mut self, position: DVec3) {
        self.last_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_hit3d::SurfaceShape;

    fn panel() -> Surface {
        let geometry = SurfaceGeometry::new(
            SurfaceShape::rect(2.0, 1.0).unwrap(),
            SurfaceTransform::from_position(DVec3::new(0.0, 0.0, -0.5)),
        );
        Surface::new(geometry, 3.0).unwrap()
    }

    #[test]
    fn mass_is_area_times_density() {
        let surface = panel();
        assert_eq!(surface.mass(), 6.0);
        assert_eq!(surface.stiffness(), 6.0);
    }

    #[test]
    fn invalid_density_is_rejected() {
        let geometry = SurfaceGeometry::new(
            SurfaceShape::rect(1.0, 1.0).unwrap(),
            SurfaceTransform::default(),
        );
        assert_eq!(
            Surface::new(geometry, 0.0).unwrap_err(),
            SurfaceError::InvalidDensity(0.0)
        );
        assert!(Surface::new(geometry, f64::NAN).is_err());
    }

    #[test]
    fn step_applies_inertia_force_and_damping() {
        let mut surface = panel();
        surface.set_position(DVec3::new(0.1, 0.0, -0.5));
        surface.apply_force(DVec3::new(0.0, 6.0, 0.0));
        let next = surface.step(0.5);
        // v = (0.1, 0, 0) + (0, 1, 0), halved.
        assert!(next.abs_diff_eq(DVec3::new(0.15, 0.5, -0.5), 1e-12));
        assert_eq!(surface.force(), DVec3::ZERO);
    }

    #[test]
    fn springs_pull_toward_their_anchors() {
        let mut surface = panel();
        surface.set_return_spring(Some(2.0));
        surface.set_position(DVec3::new(0.0, 0.0, -0.7));
        let id = surface.add_spring(DVec3::new(1.0, 0.0, -0.7), 0.5);
        surface.apply_spring_forces();
        assert!(surface.force().abs_diff_eq(DVec3::new(0.5, 0.0, 0.4), 1e-12));

        assert!(surface.remove_spring(id));
        assert!(!surface.remove_spring(id));
        assert_eq!(surface.springs().count(), 0);
    }

    #[test]
    fn reset_position_cancels_velocity() {
        let mut surface = panel();
        surface.set_position(DVec3::new(0.3, 0.0, -0.5));
        assert_ne!(surface.velocity(), DVec3::ZERO);
        surface.reset_position();
        assert_eq!(surface.velocity(), DVec3::ZERO);
        assert_eq!(surface.original_position(), DVec3::new(0.3, 0.0, -0.5));
    }

    #[test]
    fn change_parent_keeps_world_position() {
        let mut surface = panel();
        let world_before = surface.geometry().world_position();
        surface.change_parent(DAffine3::from_translation(DVec3::new(1.0, 2.0, 3.0)));
        assert!(surface.geometry().world_position().abs_diff_eq(world_before, 1e-12));
        assert!(surface.position().abs_diff_eq(DVec3::new(-1.0, -2.0, -3.5), 1e-12));
        assert_eq!(surface.velocity(), DVec3::ZERO);
        assert_eq!(surface.original_position(), surface.position());
    }
}
