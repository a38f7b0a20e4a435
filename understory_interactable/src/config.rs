// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface interaction settings.

use understory_proximity::DEFAULT_TIP_EXTENSION;

bitflags::bitflags! {
    /// Axes along which a surface may move, in its parent's space.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveAxes: u8 {
        /// Parent-space X (drag).
        const X = 0b0000_0001;
        /// Parent-space Y (drag).
        const Y = 0b0000_0010;
        /// Parent-space Z (push along the normal).
        const Z = 0b0000_0100;
    }
}

impl Default for MoveAxes {
    fn default() -> Self {
        Self::X | Self::Y
    }
}

/// One coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X.
    X,
    /// Y.
    Y,
    /// Z.
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index (`0` for X).
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The movement flag for this axis.
    pub const fn flag(self) -> MoveAxes {
        match self {
            Self::X => MoveAxes::X,
            Self::Y => MoveAxes::Y,
            Self::Z => MoveAxes::Z,
        }
    }
}

/// Open interval of signed overlap values that count as hovering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverBand {
    /// Exclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl HoverBand {
    /// Whether `overlap` lies strictly inside the band.
    pub fn contains(&self, overlap: f64) -> bool {
        overlap > self.min && overlap < self.max
    }
}

impl Default for HoverBand {
    fn default() -> Self {
        Self { min: 0.0, max: 0.32 }
    }
}

/// Settings for one interactive surface.
///
/// The defaults describe a draggable panel: moves in X and Y with one finger,
/// highlights while touched. The hover band only reports on surfaces that
/// move along Z and have a return spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Axes the surface may move along.
    pub axes: MoveAxes,
    /// Enable corner-handle resize. Requires a rectangle.
    pub resize: bool,
    /// Report highlight while touched.
    pub highlight: bool,
    /// Per-frame velocity loss, in `[0, 1]`.
    pub damping: f64,
    /// Minimum number of bone contacts before a drag moves the surface.
    pub fingers_required_for_move: usize,
    /// Hover reporting band. `None` disables hover. Joint depths are only
    /// measured for Z movement with a return spring, so other surfaces never
    /// hover.
    pub hover_bounds: Option<HoverBand>,
    /// Mass per unit of surface area.
    pub density: f64,
    /// Radius of each corner grab handle.
    pub corner_radius: f64,
    /// Resize with a single uniform scale, keeping the opposite corner fixed.
    pub preserve_aspect: bool,
    /// How far the fingertip probe reaches past the distal bone.
    pub tip_extension: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            axes: MoveAxes::default(),
            resize: false,
            highlight: true,
            damping: 0.12,
            fingers_required_for_move: 1,
            hover_bounds: Some(HoverBand::default()),
            density: 1.0,
            corner_radius: 0.02,
            preserve_aspect: false,
            tip_extension: DEFAULT_TIP_EXTENSION,
        }
    }
}

impl SurfaceConfig {
    /// A push button: moves only along Z and never hovers.
    pub fn button() -> Self {
        Self {
            axes: MoveAxes::Z,
            hover_bounds: None,
            ..Self::default()
        }
    }

    /// Builder-style axes setter.
    pub fn with_axes(mut self, axes: MoveAxes) -> Self {
        self.axes = axes;
        self
    }

    /// Builder-style resize toggle.
    pub fn with_resize(mut self, resize: bool, preserve_aspect: bool) -> Self {
        self.resize = resize;
        self.preserve_aspect = preserve_aspect;
        self
    }
}
