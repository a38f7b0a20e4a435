// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The proximity state machine.
//!
//! A [`ProximityTracker`] watches one surface. Each call to
//! [`ProximityTracker::check`] evaluates every point a hand supplies and emits a
//! [`ProximityEvent`] only for points whose state changed, so re-checking
//! unchanged geometry is silent.
//!
//! ## Modes
//!
//! The supplier decides the mode, and the mode decides which surfaces are valid:
//!
//! - [`PointSupplier::Lines`] tests bone segments against a rectangle. When a
//!   contact that was in last frame now misses the rectangle but its segment still
//!   crosses the plane, the travel of the plane crossing point is tested against
//!   the rectangle's edges so fast motions out of the surface do not produce a
//!   false miss.
//! - [`PointSupplier::Points`] tests single points against a sphere and reports
//!   the displacement from the sphere's center.

use alloc::vec::Vec;
use core::fmt;

use glam::DVec3;
use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_hit3d::{ShapeKind, SurfaceGeometry};

use crate::hand::{Hand, HandId, HandPoints, HandSegments};
use crate::key::ContactKey;

/// Per-contact state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProximityState {
    /// Not in the surface. Untracked keys are out.
    Out,
    /// In the surface.
    In,
}

/// A state transition of one contact point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProximityEvent {
    /// The contact entered the surface.
    In {
        /// Which contact.
        key: ContactKey,
        /// World-space intersection point (line mode) or displacement from the
        /// sphere's center (point mode).
        point: DVec3,
    },
    /// The contact left the surface, or its hand was lost.
    Out {
        /// Which contact.
        key: ContactKey,
    },
}

impl ProximityEvent {
    /// The contact this event is about.
    pub fn key(&self) -> ContactKey {
        match *self {
            Self::In { key, .. } | Self::Out { key } => key,
        }
    }
}

/// How a tracker tests hand points.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TrackingMode {
    /// Bone segments against a rectangle.
    Lines,
    /// Single points against a sphere.
    Points,
}

impl TrackingMode {
    /// The surface kind this mode can test against.
    pub const fn required_shape(self) -> ShapeKind {
        match self {
            Self::Lines => ShapeKind::Rect,
            Self::Points => ShapeKind::Sphere,
        }
    }
}

/// Extracts the points to test from a hand.
#[derive(Clone, Copy)]
pub enum PointSupplier {
    /// Segments tested against a rectangle.
    Lines(fn(&Hand) -> HandSegments),
    /// Points tested against a sphere.
    Points(fn(&Hand) -> HandPoints),
}

impl PointSupplier {
    /// The tracking mode this supplier selects.
    pub const fn mode(&self) -> TrackingMode {
        match self {
            Self::Lines(_) => TrackingMode::Lines,
            Self::Points(_) => TrackingMode::Points,
        }
    }
}

impl fmt::Debug for PointSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointSupplier").field(&self.mode()).finish()
    }
}

/// Errors raised when constructing a tracker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ProximityError {
    /// The supplier's mode cannot test the given surface.
    #[error("{mode:?} tracking requires a {expected:?} surface, got {actual:?}")]
    ShapeMismatch {
        /// Mode selected by the supplier.
        mode: TrackingMode,
        /// Surface kind the mode needs.
        expected: ShapeKind,
        /// Surface kind that was given.
        actual: ShapeKind,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Contact {
    point: DVec3,
    // Unbounded plane crossing from the same check; line mode only.
    possible: Option<DVec3>,
}

/// In/out state machine for the contact points of every hand against one surface.
///
/// The tracker does not own the surface; the caller passes the current
/// [`SurfaceGeometry`] to every [`check`](Self::check) so the test always runs
/// against this frame's transform.
#[derive(Clone, Debug)]
pub struct ProximityTracker {
    supplier: PointSupplier,
    kind: ShapeKind,
    // Only contacts that are currently in.
    contacts: HashMap<ContactKey, Contact>,
    point_counts: HashMap<HandId, usize>,
}

impl ProximityTracker {
    /// Create a tracker for `surface`, rejecting suppliers whose mode cannot
    /// test that kind of surface.
    pub fn new(surface: &SurfaceGeometry, supplier: PointSupplier) -> Result<Self, ProximityError> {
        let mode = supplier.mode();
        let expected = mode.required_shape();
        let actual = surface.kind();
        if expected != actual {
            return Err(ProximityError::ShapeMismatch {
                mode,
                expected,
                actual,
            });
        }
        Ok(Self {
            supplier,
            kind: actual,
            contacts: HashMap::new(),
            point_counts: HashMap::new(),
        })
    }

    /// Line-mode tracker over a rectangle.
    pub fn lines(
        surface: &SurfaceGeometry,
        supplier: fn(&Hand) -> HandSegments,
    ) -> Result<Self, ProximityError> {
        Self::new(surface, PointSupplier::Lines(supplier))
    }

    /// Point-mode tracker over a sphere.
    pub fn points(
        surface: &SurfaceGeometry,
        supplier: fn(&Hand) -> HandPoints,
    ) -> Result<Self, ProximityError> {
        Self::new(surface, PointSupplier::Points(supplier))
    }

    /// The tracking mode.
    pub fn mode(&self) -> TrackingMode {
        self.supplier.mode()
    }

    /// Evaluate every point of `hand` against `surface` and append an event for
    /// each contact whose state changed.
    pub fn check(
        &mut self,
        surface: &SurfaceGeometry,
        hand: &Hand,
        events: &mut Vec<ProximityEvent>,
    ) {
        debug_assert_eq!(surface.kind(), self.kind, "surface kind changed under tracker");
        match self.supplier {
            PointSupplier::Lines(supplier) => {
                let segments = supplier(hand);
                self.register_point_count(hand.id, segments.len(), events);
                for (index, [l0, l1]) in segments.into_iter().enumerate() {
                    let key = ContactKey::new(hand.id, index);
                    let next = self.test_segment(surface, key, l0, l1);
                    self.transition(key, next, events);
                }
            }
            PointSupplier::Points(supplier) => {
                let points = supplier(hand);
                self.register_point_count(hand.id, points.len(), events);
                for (index, point) in points.into_iter().enumerate() {
                    let key = ContactKey::new(hand.id, index);
                    let next = surface.contains_point(point).map(|displacement| Contact {
                        point: displacement,
                        possible: None,
                    });
                    self.transition(key, next, events);
                }
            }
        }
    }

    fn test_segment(
        &self,
        surface: &SurfaceGeometry,
        key: ContactKey,
        l0: DVec3,
        l1: DVec3,
    ) -> Option<Contact> {
        let hit = surface.intersect_segment(l0, l1);
        let point = hit.hit.or_else(|| {
            let prev = self.contacts.get(&key)?.possible?;
            let curr = hit.possible?;
            surface.recover_edge_crossing(prev, curr)
        })?;
        Some(Contact {
            point,
            possible: hit.possible,
        })
    }

    fn transition(
        &mut self,
        key: ContactKey,
        next: Option<Contact>,
        events: &mut Vec<ProximityEvent>,
    ) {
        match next {
            Some(contact) => {
                if self.contacts.insert(key, contact).is_none() {
                    tracing::trace!(?key, point = ?contact.point, "contact in");
                    events.push(ProximityEvent::In {
                        key,
                        point: contact.point,
                    });
                }
            }
            None => {
                if self.contacts.remove(&key).is_some() {
                    tracing::trace!(?key, "contact out");
                    events.push(ProximityEvent::Out { key });
                }
            }
        }
    }

    fn register_point_count(
        &mut self,
        hand: HandId,
        count: usize,
        events: &mut Vec<ProximityEvent>,
    ) {
        match self.point_counts.insert(hand, count) {
            Some(previous) if previous != count => {
                tracing::warn!(
                    hand,
                    previous,
                    count,
                    "point count changed while tracked; contact indices are not stable"
                );
                self.flush_hand(hand, events);
            }
            _ => {}
        }
    }

    fn flush_hand(&mut self, hand: HandId, events: &mut Vec<ProximityEvent>) {
        let mut keys: SmallVec<[ContactKey; 16]> = self
            .contacts
            .keys()
            .filter(|k| k.hand == hand)
            .copied()
            .collect();
        keys.sort_unstable();
        for key in keys {
            self.contacts.remove(&key);
            events.push(ProximityEvent::Out { key });
        }
    }

    /// Forget `hand`: emit `Out` for each of its contacts that is in, in index
    /// order, and drop every cached entry for it.
    pub fn clear(&mut self, hand: HandId, events: &mut Vec<ProximityEvent>) {
        self.flush_hand(hand, events);
        self.point_counts.remove(&hand);
    }

    /// Number of contacts currently in.
    pub fn intersection_count(&self) -> usize {
        self.contacts.len()
    }

    /// State of a contact.
    pub fn state(&self, key: ContactKey) -> ProximityState {
        if self.contacts.contains_key(&key) {
            ProximityState::In
        } else {
            ProximityState::Out
        }
    }

    /// Whether a contact is in.
    pub fn is_in(&self, key: ContactKey) -> bool {
        self.contacts.contains_key(&key)
    }

    /// Live intersection point (line mode) or displacement (point mode) of a
    /// contact that is in.
    pub fn intersection_point(&self, key: ContactKey) -> Option<DVec3> {
        self.contacts.get(&key).map(|c| c.point)
    }

    /// Iterate over every contact that is in, with its live point.
    pub fn contacts(&self) -> impl Iterator<Item = (ContactKey, DVec3)> + '_ {
        self.contacts.iter().map(|(k, c)| (*k, c.point))
    }

    /// Whether any cached entry refers to `hand`.
    pub fn tracks_hand(&self, hand: HandId) -> bool {
        self.point_counts.contains_key(&hand) || self.contacts.keys().any(|k| k.hand == hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Finger, cursor_points};
    use smallvec::smallvec;
    use understory_hit3d::{SurfaceShape, SurfaceTransform};

    fn panel() -> SurfaceGeometry {
        SurfaceGeometry::new(
            SurfaceShape::rect(0.1, 0.1).unwrap(),
            SurfaceTransform::default(),
        )
    }

    // A hand whose index distal bone runs from `from` to `to`; other fingers are far away.
    fn hand_with_index(id: HandId, from: DVec3, to: DVec3) -> Hand {
        let far = DVec3::new(5.0, 5.0, 5.0);
        let idle = Finger::from_joints(far, far + DVec3::X, far + 2.0 * DVec3::X, far + 3.0 * DVec3::X);
        let mut fingers = [idle; 5];
        fingers[1] = Finger::from_joints(from + DVec3::Z, from + 0.5 * DVec3::Z, from, to);
        Hand::new(id, from + DVec3::Z, fingers)
    }

    fn index_distal(hand: &Hand) -> HandSegments {
        smallvec![[hand.fingers[1].distal.prev_joint, hand.fingers[1].distal.next_joint]]
    }

    #[test]
    fn sweep_through_panel_emits_single_in() {
        let surface = panel();
        let mut tracker = ProximityTracker::lines(&surface, index_distal).unwrap();
        let hand = hand_with_index(1, DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, -0.05));
        let mut events = Vec::new();
        tracker.check(&surface, &hand, &mut events);
        assert_eq!(events.len(), 1);
        let ProximityEvent::In { key, point } = events[0] else {
            panic!("expected an in event, got {:?}", events[0]);
        };
        assert_eq!(key, ContactKey::new(1, 0));
        assert!(point.abs_diff_eq(DVec3::ZERO, 1e-12));
        assert_eq!(tracker.intersection_count(), 1);
    }

    #[test]
    fn repeated_check_is_silent() {
        let surface = panel();
        let mut tracker = ProximityTracker::lines(&surface, index_distal).unwrap();
        let hand = hand_with_index(1, DVec3::new(0.01, 0.0, 0.05), DVec3::new(0.01, 0.0, -0.05));
        let mut events = Vec::new();
        tracker.check(&surface, &hand, &mut events);
        tracker.check(&surface, &hand, &mut events);
        assert_eq!(events.len(), 1, "second identical check must not emit");

        // Never-in contacts never produce an initial out.
        let away = hand_with_index(2, DVec3::new(1.0, 0.0, 0.05), DVec3::new(1.0, 0.0, 0.04));
        tracker.check(&surface, &away, &mut events);
        tracker.check(&surface, &away, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn leaving_emits_out() {
        let surface = panel();
        let mut tracker = ProximityTracker::lines(&surface, index_distal).unwrap();
        let mut events = Vec::new();
        let through = hand_with_index(1, DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, -0.05));
        tracker.check(&surface, &through, &mut events);
        let above = hand_with_index(1, DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, 0.02));
        tracker.check(&surface, &above, &mut events);
        assert_eq!(
            events[1],
            ProximityEvent::Out {
                key: ContactKey::new(1, 0)
            }
        );
        assert_eq!(tracker.state(ContactKey::new(1, 0)), ProximityState::Out);
    }

    #[test]
    fn fast_lateral_exit_is_recovered_at_the_edge() {
        let surface = panel();
        let mut tracker = ProximityTracker::lines(&surface, index_distal).unwrap();
        let mut events = Vec::new();
        let inside = hand_with_index(1, DVec3::new(0.03, 0.0, 0.05), DVec3::new(0.03, 0.0, -0.05));
        tracker.check(&surface, &inside, &mut events);
        // One sample later the bone still crosses the plane, but beyond the right edge.
        let beyond = hand_with_index(1, DVec3::new(0.2, 0.0, 0.05), DVec3::new(0.2, 0.0, -0.05));
        tracker.check(&surface, &beyond, &mut events);
        assert_eq!(events.len(), 1, "recovered contact stays in");
        let point = tracker.intersection_point(ContactKey::new(1, 0)).unwrap();
        assert!(point.abs_diff_eq(DVec3::new(0.05, 0.0, 0.0), 1e-9));

        // The next sample starts outside, so there is nothing to recover.
        let further = hand_with_index(1, DVec3::new(0.3, 0.0, 0.05), DVec3::new(0.3, 0.0, -0.05));
        tracker.check(&surface, &further, &mut events);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], ProximityEvent::Out { .. }));
    }

    #[test]
    fn clear_flushes_only_in_contacts_of_that_hand() {
        let surface = panel();
        let mut a = ProximityTracker::lines(&surface, index_distal).unwrap();
        let mut b = ProximityTracker::lines(&surface, index_distal).unwrap();
        let mut events = Vec::new();
        let touching = hand_with_index(3, DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, -0.05));
        let other = hand_with_index(4, DVec3::new(0.0, 0.01, 0.05), DVec3::new(0.0, 0.01, -0.05));
        a.check(&surface, &touching, &mut events);
        a.check(&surface, &other, &mut events);
        let away = hand_with_index(3, DVec3::new(1.0, 0.0, 0.05), DVec3::new(1.0, 0.0, 0.04));
        b.check(&surface, &away, &mut events);
        events.clear();

        a.clear(3, &mut events);
        b.clear(3, &mut events);
        assert_eq!(
            events,
            alloc::vec![ProximityEvent::Out {
                key: ContactKey::new(3, 0)
            }]
        );
        assert!(!a.tracks_hand(3));
        assert!(!b.tracks_hand(3));
        assert!(a.is_in(ContactKey::new(4, 0)), "other hands are untouched");
    }

    #[test]
    fn rejects_mode_shape_mismatch() {
        let err = ProximityTracker::points(&panel(), cursor_points).unwrap_err();
        assert_eq!(
            err,
            ProximityError::ShapeMismatch {
                mode: TrackingMode::Points,
                expected: ShapeKind::Sphere,
                actual: ShapeKind::Rect,
            }
        );
        let sphere = SurfaceGeometry::new(
            SurfaceShape::sphere(0.02).unwrap(),
            SurfaceTransform::default(),
        );
        assert!(ProximityTracker::lines(&sphere, index_distal).is_err());
    }

    #[test]
    fn point_mode_reports_displacement() {
        let sphere = SurfaceGeometry::new(
            SurfaceShape::sphere(0.05).unwrap(),
            SurfaceTransform::from_position(DVec3::new(0.0, 0.0, 1.0)),
        );
        let mut tracker = ProximityTracker::points(&sphere, cursor_points).unwrap();
        let mut hand = hand_with_index(1, DVec3::ZERO, DVec3::X);
        hand.palm_position = DVec3::new(0.01, 0.0, 1.0);
        let mut events = Vec::new();
        tracker.check(&sphere, &hand, &mut events);
        let ProximityEvent::In { point, .. } = events[0] else {
            panic!("palm inside the sphere should be in");
        };
        assert!(point.abs_diff_eq(DVec3::new(0.01, 0.0, 0.0), 1e-12));

        hand.palm_position = DVec3::new(0.2, 0.0, 1.0);
        tracker.check(&sphere, &hand, &mut events);
        assert!(matches!(events[1], ProximityEvent::Out { .. }));
    }

    #[test]
    fn changing_point_count_flushes_the_hand() {
        fn two_bones(hand: &Hand) -> HandSegments {
            let bone = [hand.fingers[1].distal.prev_joint, hand.fingers[1].distal.next_joint];
            smallvec![bone, bone]
        }
        let surface = panel();
        let mut tracker = ProximityTracker::lines(&surface, two_bones).unwrap();
        let hand = hand_with_index(1, DVec3::new(0.0, 0.0, 0.05), DVec3::new(0.0, 0.0, -0.05));
        let mut events = Vec::new();
        tracker.check(&surface, &hand, &mut events);
        assert_eq!(tracker.intersection_count(), 2);

        tracker.supplier = PointSupplier::Lines(index_distal);
        events.clear();
        tracker.check(&surface, &hand, &mut events);
        // Both stale keys go out, then index 0 comes back in under the new layout.
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], ProximityEvent::In { .. }));
        assert_eq!(tracker.intersection_count(), 1);
    }
}
