// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked hand data and the point suppliers that feed proximity trackers.
//!
//! A [`Frame`] is one sample of every tracked [`Hand`]. Hands carry a stable
//! [`HandId`] for as long as the device keeps tracking them continuously.
//!
//! Bones follow the usual hand-tracking convention: a bone's local −Z axis
//! points from its `prev_joint` (toward the wrist) to its `next_joint` (toward
//! the fingertip).

use alloc::vec::Vec;

use glam::{DQuat, DVec3};
use smallvec::SmallVec;

/// Identifier of a tracked hand, valid while the hand is continuously tracked.
pub type HandId = u32;

/// Line segments produced for one hand, as `[start, end]` pairs.
pub type HandSegments = SmallVec<[[DVec3; 2]; 16]>;

/// Points produced for one hand.
pub type HandPoints = SmallVec<[DVec3; 20]>;

/// Default distance a fingertip probe extends past the end of the distal bone.
pub const DEFAULT_TIP_EXTENSION: f64 = 0.02;

/// One finger bone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    /// World position of the joint nearer the wrist.
    pub prev_joint: DVec3,
    /// World position of the joint nearer the fingertip.
    pub next_joint: DVec3,
    /// Orientation of the bone; local −Z points along the bone.
    pub rotation: DQuat,
}

impl Bone {
    /// A bone between two joints, oriented along the segment.
    pub fn between(prev_joint: DVec3, next_joint: DVec3) -> Self {
        let direction = (next_joint - prev_joint).normalize_or_zero();
        let rotation = if direction == DVec3::ZERO {
            DQuat::IDENTITY
        } else {
            DQuat::from_rotation_arc(DVec3::NEG_Z, direction)
        };
        Self {
            prev_joint,
            next_joint,
            rotation,
        }
    }

    /// The bone as a `[next_joint, prev_joint]` segment.
    pub fn segment(&self) -> [DVec3; 2] {
        [self.next_joint, self.prev_joint]
    }

    /// World direction of a bone-local vector.
    pub fn transform_vector(&self, local: DVec3) -> DVec3 {
        self.rotation * local
    }
}

/// One finger: three bones and the three named joints used for depth queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finger {
    /// Metacarpal-side bone.
    pub proximal: Bone,
    /// Middle bone.
    pub medial: Bone,
    /// Fingertip bone.
    pub distal: Bone,
    /// Knuckle joint.
    pub mcp_position: DVec3,
    /// Middle joint.
    pub pip_position: DVec3,
    /// Last joint before the tip.
    pub dip_position: DVec3,
}

impl Finger {
    /// Build a finger from its four joint positions, knuckle to tip.
    pub fn from_joints(mcp: DVec3, pip: DVec3, dip: DVec3, tip: DVec3) -> Self {
        Self {
            proximal: Bone::between(mcp, pip),
            medial: Bone::between(pip, dip),
            distal: Bone::between(dip, tip),
            mcp_position: mcp,
            pip_position: pip,
            dip_position: dip,
        }
    }

    /// World position of the fingertip.
    pub fn tip_position(&self) -> DVec3 {
        self.distal.next_joint
    }
}

/// A tracked hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    /// Stable id while tracked.
    pub id: HandId,
    /// Thumb, index, middle, ring, pinky.
    pub fingers: [Finger; 5],
    /// World position of the palm center.
    pub palm_position: DVec3,
}

impl Hand {
    /// Assemble a hand.
    pub fn new(id: HandId, palm_position: DVec3, fingers: [Finger; 5]) -> Self {
        Self {
            id,
            fingers,
            palm_position,
        }
    }
}

/// One sample of every tracked hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Hands in device order.
    pub hands: Vec<Hand>,
}

impl Frame {
    /// A frame holding `hands`.
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// Look up a hand by id.
    pub fn hand(&self, id: HandId) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }
}

/// The bones that can drag a surface: the proximal bone of every finger but the
/// thumb, then the medial and distal bones of every finger.
///
/// Order is stable (finger by finger), so point indices identify the same bone
/// for the hand's whole tracked lifetime.
pub fn interactive_end_bones(hand: &Hand) -> HandSegments {
    let mut out = HandSegments::new();
    for (i, finger) in hand.fingers.iter().enumerate() {
        if i > 0 {
            out.push(finger.proximal.segment());
        }
        out.push(finger.medial.segment());
        out.push(finger.distal.segment());
    }
    out
}

/// The joints that can push a surface along its normal: the knuckle of every
/// finger but the thumb, then for every finger the PIP and DIP joints and a
/// probe `tip_extension` past the fingertip along the distal bone.
pub fn interactive_joints(hand: &Hand, tip_extension: f64) -> HandPoints {
    let mut out = HandPoints::new();
    for (i, finger) in hand.fingers.iter().enumerate() {
        if i > 0 {
            out.push(finger.mcp_position);
        }
        let probe = finger.tip_position()
            + finger
                .distal
                .transform_vector(DVec3::new(0.0, 0.0, -tip_extension));
        out.push(finger.pip_position);
        out.push(finger.dip_position);
        out.push(probe);
    }
    out
}

/// The single cursor point of a hand (its palm), used by grab handles.
pub fn cursor_points(hand: &Hand) -> HandPoints {
    let mut out = HandPoints::new();
    out.push(hand.palm_position);
    out
}
