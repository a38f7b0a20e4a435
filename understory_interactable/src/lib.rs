// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Interactable: hand-driven surfaces for XR.
//!
//! This crate turns tracked hands into direct manipulation of flat panels and
//! buttons. It sits on top of [`understory_proximity`], which decides which bones
//! are in which surface, and [`understory_hit3d`], which does the geometry.
//!
//! ## Concepts
//!
//! - [`Surface`] – a shape with mass, a rest position, springs and velocity.
//! - [`SurfaceInteraction`] – one surface plus the rules that move it: finger
//!   drag in X and Y, pushing along Z, inertia with damping, per-axis
//!   [`MovementConstraint`]s and hover reporting.
//! - [`CornerResize`] – grab handles on a rectangle's corners, driven by pinch.
//! - [`InteractionSession`] – owns every surface, orders the work inside a
//!   frame and flushes lost hands.
//!
//! Everything a surface reports arrives as an [`InteractionEvent`] in the
//! caller's buffer, within the call that caused it.
//!
//! ## Example
//!
//! ```
//! use glam::DVec3;
//! use understory_hit3d::{SurfaceGeometry, SurfaceShape, SurfaceTransform};
//! use understory_interactable::{InteractionEvent, InteractionSession, SurfaceConfig};
//! use understory_proximity::{Finger, Frame, Hand};
//!
//! let mut session = InteractionSession::new();
//! let panel = session
//!     .add_surface(
//!         SurfaceGeometry::new(SurfaceShape::rect(0.3, 0.2).unwrap(), SurfaceTransform::default()),
//!         SurfaceConfig::default(),
//!     )
//!     .unwrap();
//!
//! // A hand whose index finger pokes through the panel at `at`.
//! let poke = |at: DVec3| {
//!     let away = DVec3::new(1.0, 1.0, 1.0);
//!     let idle = Finger::from_joints(away, away + DVec3::X, away + 2.0 * DVec3::X, away + 3.0 * DVec3::X);
//!     let mut fingers = [idle; 5];
//!     fingers[1] = Finger::from_joints(
//!         at + DVec3::new(0.0, 0.0, 0.12),
//!         at + DVec3::new(0.0, 0.0, 0.08),
//!         at + DVec3::new(0.0, 0.0, 0.04),
//!         at + DVec3::new(0.0, 0.0, -0.01),
//!     );
//!     Hand::new(1, at + DVec3::new(0.0, 0.0, 0.2), fingers)
//! };
//!
//! let mut events = Vec::new();
//! session.hand_appeared(1);
//! session.frame(&Frame::new(vec![poke(DVec3::ZERO)]), &mut events);
//! assert!(events.iter().any(|e| e.surface == panel && e.event == InteractionEvent::Touch));
//!
//! // Sliding the finger drags the panel along.
//! session.frame(&Frame::new(vec![poke(DVec3::new(0.05, 0.0, 0.0))]), &mut events);
//! let x = session.surface(panel).unwrap().surface().position().x;
//! assert!((x - 0.05).abs() < 1e-9);
//!
//! events.clear();
//! session.hand_lost(1, &mut events);
//! assert!(events.iter().any(|e| e.event == InteractionEvent::Release));
//! ```
//!
//! ## Physics
//!
//! When no finger is driving the surface, each frame integrates
//! `v = (position − last) + force / mass` and scales it by `1 − damping`. Mass
//! is the surface's area times its configured density, and the pushthrough
//! stiffness equals the mass. Pushing along Z only applies to surfaces with a
//! return spring ([`Surface::set_return_spring`]).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod constraint;
mod error;
mod interaction;
mod resize;
mod session;
mod surface;

pub use config::{Axis, HoverBand, MoveAxes, SurfaceConfig};
pub use constraint::{AxisRange, MovementConstraint};
pub use error::SurfaceError;
pub use interaction::{InteractionEvent, SurfaceInteraction};
pub use resize::{CornerResize, DEGENERATE_EPSILON, solve_non_uniform, solve_uniform};
pub use session::{HandScratch, InteractionSession, ResizeHandle, SessionEvent, SurfaceId};
pub use surface::{AnchorSpring, SpringId, Surface};
