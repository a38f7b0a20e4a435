// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use glam::{DAffine3, DQuat, DVec3};

/// Position, rotation and scale of a surface relative to its parent space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceTransform {
    /// Translation in parent space.
    pub position: DVec3,
    /// Orientation in parent space.
    pub rotation: DQuat,
    /// Per-axis scale applied before rotation.
    pub scale: DVec3,
}

impl Default for SurfaceTransform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl SurfaceTransform {
    /// An unrotated, unscaled transform at `position`.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder-style rotation setter.
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder-style scale setter.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// The local-to-parent affine transform.
    pub fn to_affine(&self) -> DAffine3 {
        DAffine3::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine transform.
    ///
    /// Shear is not representable and is discarded.
    pub fn from_affine(affine: DAffine3) -> Self {
        let (scale, rotation, position) = affine.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}
