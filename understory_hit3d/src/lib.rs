// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry-level intersection primitives for interactive 3D surfaces.
//!
//! This crate answers the narrow-phase questions an XR interaction layer asks every
//! frame: does this bone segment pass through that panel, is this palm inside that
//! handle, and where did a fast-moving finger cross a panel's edge between two
//! samples. It is intentionally decoupled from any scene graph: surfaces are plain
//! values ([`SurfaceGeometry`]) made of a shape, a local transform and a parent
//! transform.
//!
//! # Key types
//!
//! - [`SurfaceShape`] – a rectangle (by half extents) or a sphere (by radius).
//! - [`SurfaceTransform`] – position, rotation and scale relative to a parent space.
//! - [`SurfaceGeometry`] – shape + transform + parent; answers world-space queries
//!   such as [`SurfaceGeometry::intersect_segment`] and
//!   [`SurfaceGeometry::contains_point`].
//! - [`SegmentHit`] – the bounded hit of a segment test, plus the unbounded plane
//!   point that edge recovery needs on the next frame.
//!
//! The free functions in [`segment`] are the building blocks and can be used on
//! their own.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use understory_hit3d::{SurfaceGeometry, SurfaceShape, SurfaceTransform};
//!
//! let panel = SurfaceGeometry::new(
//!     SurfaceShape::rect(0.1, 0.1).unwrap(),
//!     SurfaceTransform::default(),
//! );
//!
//! // A bone sweeping through the panel.
//! let hit = panel.intersect_segment(DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, -0.05));
//! assert!(hit.hit.is_some());
//!
//! // Parallel to the panel: no result, not an error.
//! let miss = panel.intersect_segment(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
//! assert!(miss.hit.is_none() && miss.possible.is_none());
//! ```
//!
//! ## Boundaries
//!
//! Rectangle and sphere containment are strict: a point exactly on an edge or on the
//! sphere's surface is outside.
//!
//! This crate is `no_std`.

#![no_std]

mod error;
mod shape;
mod surface;
mod transform;

pub mod segment;

pub use error::GeometryError;
pub use shape::{Corner, ShapeKind, SurfaceShape};
pub use surface::{SegmentHit, SurfaceGeometry};
pub use transform::SurfaceTransform;
