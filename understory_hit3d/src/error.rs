// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors raised when constructing surface geometry.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A width, height or radius was zero, negative, or not finite.
    #[error("{what} must be finite and strictly positive, got {value}")]
    InvalidExtent {
        /// Which extent was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
}
