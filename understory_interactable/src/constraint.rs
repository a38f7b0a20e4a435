// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis movement constraints.
//!
//! A constraint sees the coordinate the update wants to move to and the axis's
//! rest coordinate, and returns the coordinate to use instead. Closures of the
//! form `FnMut(target, rest) -> f64` are constraints.

/// Filter for one coordinate of a surface's proposed position.
pub trait MovementConstraint {
    /// Return the coordinate to apply given the proposed `target` and the
    /// surface's `rest` coordinate on this axis.
    fn constrain(&mut self, target: f64, rest: f64) -> f64;
}

impl<F> MovementConstraint for F
where
    F: FnMut(f64, f64) -> f64,
{
    fn constrain(&mut self, target: f64, rest: f64) -> f64 {
        self(target, rest)
    }
}

/// Keep the coordinate within `[rest + min, rest + max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    /// Lowest offset from rest.
    pub min: f64,
    /// Highest offset from rest.
    pub max: f64,
}

impl AxisRange {
    /// A range of offsets from rest.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl MovementConstraint for AxisRange {
    fn constrain(&mut self, target: f64, rest: f64) -> f64 {
        target.max(rest + self.min).min(rest + self.max)
    }
}
