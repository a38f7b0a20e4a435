// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Proximity: in/out tracking of hand contact points against surfaces.
//!
//! ## Overview
//!
//! Hand-tracking devices deliver a [`Frame`] of [`Hand`]s many times a second. This
//! crate turns those samples into discrete transitions: a contact point (one bone
//! or joint of one hand, identified by a [`ContactKey`]) is either in a surface or
//! out of it, and a [`ProximityTracker`] reports exactly one
//! [`ProximityEvent`] each time that changes.
//!
//! Geometry comes from [`understory_hit3d`]; what a transition *means* (drag, press,
//! grab) is left to higher layers such as `understory_interactable`.
//!
//! ## Example
//!
//! ```
//! use glam::DVec3;
//! use understory_hit3d::{SurfaceGeometry, SurfaceShape, SurfaceTransform};
//! use understory_proximity::{
//!     ContactKey, Finger, Hand, ProximityEvent, ProximityTracker, interactive_end_bones,
//! };
//!
//! let panel = SurfaceGeometry::new(
//!     SurfaceShape::rect(0.1, 0.1).unwrap(),
//!     SurfaceTransform::default(),
//! );
//! let mut tracker = ProximityTracker::lines(&panel, interactive_end_bones).unwrap();
//!
//! // A hand whose index fingertip pokes through the panel center.
//! let away = DVec3::new(1.0, 1.0, 1.0);
//! let idle = Finger::from_joints(away, away + DVec3::X, away + 2.0 * DVec3::X, away + 3.0 * DVec3::X);
//! let mut fingers = [idle; 5];
//! fingers[1] = Finger::from_joints(
//!     DVec3::new(0.0, 0.0, 0.12),
//!     DVec3::new(0.0, 0.0, 0.08),
//!     DVec3::new(0.0, 0.0, 0.04),
//!     DVec3::new(0.0, 0.0, -0.01),
//! );
//! let hand = Hand::new(1, DVec3::new(0.0, 0.0, 0.2), fingers);
//!
//! let mut events = Vec::new();
//! tracker.check(&panel, &hand, &mut events);
//! // Index finger bones are points 2, 3 and 4; only the distal bone crosses.
//! assert!(matches!(events[..], [ProximityEvent::In { key, .. }] if key == ContactKey::new(1, 4)));
//!
//! // Unchanged input is silent.
//! tracker.check(&panel, &hand, &mut events);
//! assert_eq!(events.len(), 1);
//! ```
//!
//! ## Hand loss
//!
//! Call [`ProximityTracker::clear`] on every tracker, synchronously, when the device
//! reports a hand as lost. Contacts of that hand that were in produce `Out` events
//! and no cached entry for the hand survives.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod hand;
mod key;
pub mod tracker;

pub use hand::{
    Bone, DEFAULT_TIP_EXTENSION, Finger, Frame, Hand, HandId, HandPoints, HandSegments,
    cursor_points, interactive_end_bones, interactive_joints,
};
pub use key::ContactKey;
pub use tracker::{
    PointSupplier, ProximityError, ProximityEvent, ProximityState, ProximityTracker, TrackingMode,
};
