// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface interaction: touch, drag, push, physics and hover.
//!
//! ## Frame protocol
//!
//! A [`SurfaceInteraction`] is driven in two phases per frame:
//!
//! 1. [`check_proximity`](SurfaceInteraction::check_proximity) once per hand.
//!    Bone contacts entering or leaving the surface produce `Touch` and
//!    `Release` as the contact count moves between zero and positive.
//! 2. [`update`](SurfaceInteraction::update) once with every hand. This
//!    resolves the next position:
//!    - Drag: the average over live contacts of the contact point minus its
//!      offset at touch, once enough contacts are in.
//!    - Push: joints whose signed depth over the face flipped sign since they
//!      were last seen on one side. The surface moves to the deepest of them.
//!    - Otherwise inertia, springs and damping integrate the previous motion.
//!
//!    Each enabled axis then passes through its [`MovementConstraint`], and a
//!    `Travel` event reports any change.
//!
//! Every proximity check for a frame must complete before any update of that
//! frame; [`InteractionSession`](crate::InteractionSession) enforces this.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use glam::{DAffine3, DVec3};
use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_hit3d::{ShapeKind, SurfaceGeometry, SurfaceTransform};
use understory_proximity::{
    ContactKey, Hand, HandId, ProximityEvent, ProximityTracker, interactive_end_bones,
    interactive_joints,
};

use crate::config::{Axis, HoverBand, MoveAxes, SurfaceConfig};
use crate::constraint::MovementConstraint;
use crate::error::SurfaceError;
use crate::surface::Surface;

/// Notification produced by a surface during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    /// The first bone contact entered the surface.
    Touch,
    /// The last bone contact left the surface.
    Release,
    /// The surface moved; carries the new transform.
    Travel(SurfaceTransform),
    /// A joint entered the hover band.
    Hover(SurfaceTransform),
    /// No joint remains in the hover band.
    HoverOut(SurfaceTransform),
}

/// Joints that crossed the surface this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Pushthrough {
    sum: f64,
    count: usize,
    min: Option<f64>,
}

impl Pushthrough {
    fn record(&mut self, overlap: f64) {
        self.sum += overlap;
        self.count += 1;
        self.min = Some(self.min.map_or(overlap, |m| m.min(overlap)));
    }
}

/// One interactive surface and everything that moves it.
pub struct SurfaceInteraction {
    surface: Surface,
    config: SurfaceConfig,
    // Bone tracker; present when X or Y movement is enabled.
    drag: Option<ProximityTracker>,
    // Parent-space offset from the surface origin to each contact at touch.
    offsets: HashMap<ContactKey, DVec3>,
    // Last same-side depth of each joint; `None` once it left the face.
    previous_overlap: HashMap<ContactKey, Option<f64>>,
    constraints: [Option<Box<dyn MovementConstraint>>; 3],
    touched: bool,
    hovered: bool,
    highlighted: bool,
    interactable: bool,
    pending_interactable: Option<bool>,
    scratch: Vec<ProximityEvent>,
}

impl fmt::Debug for SurfaceInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceInteraction")
            .field("surface", &self.surface)
            .field("config", &self.config)
            .field("drag", &self.drag)
            .field("offsets", &self.offsets.len())
            .field("touched", &self.touched)
            .field("hovered", &self.hovered)
            .field("highlighted", &self.highlighted)
            .field("interactable", &self.interactable)
            .field("pending_interactable", &self.pending_interactable)
            .finish_non_exhaustive()
    }
}

impl SurfaceInteraction {
    /// Make `geometry` interactive.
    ///
    /// Fails when the configuration cannot apply to the shape: X/Y drag and
    /// resize need a rectangle, damping must lie in `[0, 1]` and density must
    /// be positive.
    pub fn new(geometry: SurfaceGeometry, config: SurfaceConfig) -> Result<Self, SurfaceError> {
        if !(0.0..=1.0).contains(&config.damping) {
            return Err(SurfaceError::InvalidDamping(config.damping));
        }
        if config.resize && geometry.kind() != ShapeKind::Rect {
            return Err(SurfaceError::ResizeRequiresRect(geometry.kind()));
        }
        let drag = if config.axes.intersects(MoveAxes::X | MoveAxes::Y) {
            Some(ProximityTracker::lines(&geometry, interactive_end_bones)?)
        } else {
            None
        };
        let surface = Surface::new(geometry, config.density)?;
        Ok(Self {
            surface,
            config,
            drag,
            offsets: HashMap::new(),
            previous_overlap: HashMap::new(),
            constraints: [None, None, None],
            touched: false,
            hovered: false,
            highlighted: false,
            interactable: true,
            pending_interactable: None,
            scratch: Vec::new(),
        })
    }

    /// The physical surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access to the physical surface, for springs and placement.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Settings this surface was built with.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The bone tracker used for touch and drag, if X or Y movement is enabled.
    pub fn drag_tracker(&self) -> Option<&ProximityTracker> {
        self.drag.as_ref()
    }

    /// Whether any bone contact is registered.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether a joint is inside the hover band.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the surface should render highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Whether per-frame updates run.
    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    /// A change of the interactable flag waiting for the current touch to end.
    pub fn pending_interactable(&self) -> Option<bool> {
        self.pending_interactable
    }

    /// Enable or disable per-frame updates.
    ///
    /// While touched the change waits for the release, so the surface does not
    /// freeze or jump under the user's fingers.
    pub fn set_interactable(&mut self, interactable: bool) {
        if !self.touched {
            self.interactable = interactable;
            self.pending_interactable = None;
        } else if interactable != self.interactable {
            self.pending_interactable = Some(interactable);
        } else {
            self.pending_interactable = None;
        }
    }

    /// Install a constraint on one axis, replacing any previous one.
    pub fn constrain_movement(&mut self, axis: Axis, constraint: impl MovementConstraint + 'static) {
        self.constraints[axis.index()] = Some(Box::new(constraint));
    }

    /// Remove the constraint on one axis.
    pub fn clear_movement_constraint(&mut self, axis: Axis) {
        self.constraints[axis.index()] = None;
    }

    /// Last same-side signed depth recorded for a joint.
    pub fn previous_overlap(&self, key: ContactKey) -> Option<f64> {
        self.previous_overlap.get(&key).copied().flatten()
    }

    /// Move the surface under a new parent, keeping its world transform.
    ///
    /// Touch offsets are dropped so a drag in progress does not jump; it
    /// resumes once contacts re-enter.
    pub fn change_parent(&mut self, parent: DAffine3) {
        self.offsets.clear();
        self.surface.change_parent(parent);
    }

    /// Run the bone tracker for one hand and translate its transitions.
    ///
    /// While `resizing` is set, entering contacts are ignored so a hand that
    /// holds a corner handle cannot also start a drag.
    pub fn check_proximity(
        &mut self,
        hand: &Hand,
        resizing: bool,
        events: &mut Vec<InteractionEvent>,
    ) {
        let Some(tracker) = self.drag.as_mut() else {
            return;
        };
        let mut scratch = mem::take(&mut self.scratch);
        scratch.clear();
        tracker.check(self.surface.geometry(), hand, &mut scratch);
        for event in scratch.drain(..) {
            self.apply_proximity(event, resizing, events);
        }
        self.scratch = scratch;
    }

    /// Forget a lost hand: its contacts leave (possibly releasing the surface)
    /// and every cached value keyed by it is dropped.
    pub fn hand_lost(&mut self, hand: HandId, events: &mut Vec<InteractionEvent>) {
        if let Some(tracker) = self.drag.as_mut() {
            let mut scratch = mem::take(&mut self.scratch);
            scratch.clear();
            tracker.clear(hand, &mut scratch);
            for event in scratch.drain(..) {
                self.apply_proximity(event, false, events);
            }
            self.scratch = scratch;
        }
        self.offsets.retain(|key, _| key.hand != hand);
        self.previous_overlap.retain(|key, _| key.hand != hand);
    }

    fn apply_proximity(
        &mut self,
        event: ProximityEvent,
        resizing: bool,
        events: &mut Vec<InteractionEvent>,
    ) {
        match event {
            ProximityEvent::In { key, point } => {
                if resizing {
                    return;
                }
                let local = self.surface.geometry().parent.inverse().transform_point3(point);
                self.offsets.insert(key, local - self.surface.position());
                if !self.touched {
                    self.touched = true;
                    self.highlighted = self.config.highlight && self.interactable;
                    tracing::debug!(?key, "surface touched");
                    events.push(InteractionEvent::Touch);
                }
            }
            ProximityEvent::Out { key } => {
                self.offsets.remove(&key);
                let remaining = self.drag.as_ref().map_or(0, |t| t.intersection_count());
                if remaining == 0 && self.touched {
                    self.release(events);
                }
            }
        }
    }

    fn release(&mut self, events: &mut Vec<InteractionEvent>) {
        self.touched = false;
        self.highlighted = false;
        tracing::debug!("surface released");
        events.push(InteractionEvent::Release);
        if let Some(interactable) = self.pending_interactable.take() {
            self.interactable = interactable;
            tracing::debug!(interactable, "applied deferred interactable change");
        }
    }

    /// Resolve and apply this frame's position.
    pub fn update(&mut self, hands: &[Hand], events: &mut Vec<InteractionEvent>) {
        if !self.interactable {
            return;
        }
        self.surface.clear_force();

        let axes = self.config.axes;
        let position = self.surface.position();
        let original = self.surface.original_position();
        let push_active = axes.contains(MoveAxes::Z) && self.surface.return_spring().is_some();

        let mut candidate = if axes.intersects(MoveAxes::X | MoveAxes::Y) {
            self.drag_target().unwrap_or(position)
        } else {
            position
        };

        let pushthrough = if push_active {
            self.track_overlaps(hands)
        } else {
            Pushthrough::default()
        };
        if push_active && let Some(min) = pushthrough.min {
            candidate.z = original.z + (min + (position.z - original.z));
        }

        if candidate == position {
            if push_active {
                if pushthrough.count > 0 {
                    let stiffness = self.surface.stiffness();
                    self.surface
                        .apply_force(DVec3::new(0.0, 0.0, stiffness * pushthrough.sum));
                }
                self.surface.apply_spring_forces();
            }
            candidate = self.surface.step(self.config.damping);
        }
        self.surface.set_last_position(position);

        let mut next = position;
        let mut moved = false;
        for axis in Axis::ALL {
            if !axes.contains(axis.flag()) {
                continue;
            }
            let i = axis.index();
            let mut value = candidate[i];
            if let Some(constraint) = self.constraints[i].as_mut() {
                value = constraint.constrain(value, original[i]);
            }
            if value != next[i] {
                next[i] = value;
                moved = true;
            }
        }
        if moved {
            self.surface.set_position(next);
            events.push(InteractionEvent::Travel(self.surface.transform()));
        }

        if let Some(band) = self.config.hover_bounds {
            self.update_hover(band, events);
        }
    }

    fn drag_target(&self) -> Option<DVec3> {
        let tracker = self.drag.as_ref()?;
        let to_parent = self.surface.geometry().parent.inverse();
        let mut targets: SmallVec<[(ContactKey, DVec3); 16]> = self
            .offsets
            .iter()
            .filter_map(|(key, offset)| {
                let point = tracker.intersection_point(*key)?;
                Some((*key, to_parent.transform_point3(point) - *offset))
            })
            .collect();
        if targets.is_empty() || targets.len() < self.config.fingers_required_for_move {
            return None;
        }
        // Fixed summation order keeps the result independent of map iteration.
        targets.sort_unstable_by_key(|(key, _)| *key);
        let sum = targets.iter().fold(DVec3::ZERO, |acc, (_, t)| acc + *t);
        Some(sum / targets.len() as f64)
    }

    /// Measure every joint's signed depth over the face and collect the ones
    /// that crossed it.
    ///
    /// A crossing joint keeps its recorded depth from the side it came from;
    /// any other depth replaces the record, and leaving the face clears it.
    fn track_overlaps(&mut self, hands: &[Hand]) -> Pushthrough {
        let geometry = self.surface.geometry();
        let mut pushthrough = Pushthrough::default();
        for hand in hands {
            let joints = interactive_joints(hand, self.config.tip_extension);
            for (index, joint) in joints.into_iter().enumerate() {
                let key = ContactKey::new(hand.id, index);
                let overlap = geometry.overlap(joint);
                match (overlap, self.previous_overlap.get(&key).copied()) {
                    (Some(depth), Some(Some(previous))) if depth * previous < 0.0 => {
                        pushthrough.record(depth);
                    }
                    (Some(depth), _) => {
                        self.previous_overlap.insert(key, Some(depth));
                    }
                    (None, Some(_)) => {
                        self.previous_overlap.insert(key, None);
                    }
                    (None, None) => {}
                }
            }
        }
        pushthrough
    }

    fn update_hover(&mut self, band: HoverBand, events: &mut Vec<InteractionEvent>) {
        let hovered = self
            .previous_overlap
            .values()
            .flatten()
            .any(|overlap| band.contains(*overlap));
        if hovered && !self.hovered {
            self.hovered = true;
            tracing::debug!("hover");
            events.push(InteractionEvent::Hover(self.surface.transform()));
        } else if !hovered && self.hovered {
            self.hovered = false;
            tracing::debug!("hover out");
            events.push(InteractionEvent::HoverOut(self.surface.transform()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::AxisRange;
    use understory_hit3d::SurfaceShape;
    use understory_proximity::Finger;

    const FAR: DVec3 = DVec3::new(5.0, 5.0, 1.0);

    fn far_finger() -> Finger {
        Finger::from_joints(FAR, FAR + DVec3::X, FAR + 2.0 * DVec3::X, FAR + 3.0 * DVec3::X)
    }

    /// A hand whose only joint near the origin is the index fingertip.
    fn probing_hand(id: HandId, tip: DVec3) -> Hand {
        let mut fingers = [far_finger(); 5];
        fingers[1] = Finger::from_joints(FAR, FAR, FAR, tip);
        Hand::new(id, FAR, fingers)
    }

    /// A hand whose index finger points straight down -Z through `at`.
    fn pointing_hand(id: HandId, at: DVec3) -> Hand {
        let mut fingers = [far_finger(); 5];
        fingers[1] = Finger::from_joints(
            at + DVec3::new(0.0, 0.0, 0.12),
            at + DVec3::new(0.0, 0.0, 0.08),
            at + DVec3::new(0.0, 0.0, 0.04),
            at + DVec3::new(0.0, 0.0, -0.01),
        );
        Hand::new(id, at + DVec3::new(0.0, 0.0, 0.2), fingers)
    }

    // Index fingertip probe: thumb contributes three joints, then index mcp,
    // pip, dip and probe.
    const INDEX_PROBE: usize = 6;

    fn interaction(width: f64, config: SurfaceConfig) -> SurfaceInteraction {
        let geometry = SurfaceGeometry::new(
            SurfaceShape::rect(width, width).unwrap(),
            SurfaceTransform::default(),
        );
        SurfaceInteraction::new(
            geometry,
            SurfaceConfig {
                tip_extension: 0.0,
                ..config
            },
        )
        .unwrap()
    }

    #[test]
    fn sign_flip_counts_as_pushthrough() {
        let mut button = interaction(10.0, SurfaceConfig::button());
        let key = ContactKey::new(1, INDEX_PROBE);

        let first = button.track_overlaps(&[probing_hand(1, DVec3::new(0.0, 0.0, -2.0))]);
        assert_eq!(first.count, 0);
        assert_eq!(button.previous_overlap(key), Some(-2.0));

        let second = button.track_overlaps(&[probing_hand(1, DVec3::new(0.0, 0.0, 3.0))]);
        assert_eq!(second.count, 1);
        assert_eq!(second.sum, 3.0);
        assert_eq!(second.min, Some(3.0));
        // The side the joint came from is remembered.
        assert_eq!(button.previous_overlap(key), Some(-2.0));
    }

    #[test]
    fn same_side_depth_updates_without_pushing() {
        let mut button = interaction(10.0, SurfaceConfig::button());
        let key = ContactKey::new(1, INDEX_PROBE);

        button.track_overlaps(&[probing_hand(1, DVec3::new(0.0, 0.0, 1.0))]);
        let second = button.track_overlaps(&[probing_hand(1, DVec3::new(0.0, 0.0, 3.0))]);
        assert_eq!(second.count, 0);
        assert_eq!(button.previous_overlap(key), Some(3.0));

        // Leaving the face clears the record.
        button.track_overlaps(&[probing_hand(1, DVec3::new(20.0, 0.0, 3.0))]);
        assert_eq!(button.previous_overlap(key), None);
    }

    #[test]
    fn push_moves_the_button_to_the_deepest_joint() {
        let mut button = interaction(1.0, SurfaceConfig::button());
        button.surface_mut().set_return_spring(Some(1.0));
        let mut events = Vec::new();

        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.05))], &mut events);
        assert!(events.is_empty());

        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, -0.01))], &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InteractionEvent::Travel(_)));
        assert!((button.surface().position().z + 0.01).abs() < 1e-12);
    }

    #[test]
    fn constraints_filter_the_applied_coordinate() {
        let mut button = interaction(1.0, SurfaceConfig::button());
        button.surface_mut().set_return_spring(Some(1.0));
        button.constrain_movement(Axis::Z, AxisRange::new(-0.005, 0.0));
        let mut events = Vec::new();

        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.05))], &mut events);
        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, -0.01))], &mut events);
        assert_eq!(button.surface().position().z, -0.005);
    }

    #[test]
    fn push_needs_a_return_spring() {
        let mut button = interaction(1.0, SurfaceConfig::button());
        let mut events = Vec::new();
        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.05))], &mut events);
        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, -0.01))], &mut events);
        assert!(events.is_empty());
        assert_eq!(button.surface().position(), DVec3::ZERO);
    }

    #[test]
    fn released_surface_decays_by_damping() {
        let mut panel = interaction(1.0, SurfaceConfig::default());
        panel.surface_mut().set_position(DVec3::new(0.1, 0.0, 0.0));
        let mut events = Vec::new();

        panel.update(&[], &mut events);
        let v1 = panel.surface().velocity().x;
        panel.update(&[], &mut events);
        let v2 = panel.surface().velocity().x;

        assert!((v1 - 0.1 * 0.88).abs() < 1e-12);
        assert!((v2 / v1 - 0.88).abs() < 1e-9);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn touch_then_drag_then_release() {
        let mut panel = interaction(
            0.2,
            SurfaceConfig {
                hover_bounds: None,
                ..SurfaceConfig::default()
            },
        );
        let mut events = Vec::new();

        let hand = pointing_hand(1, DVec3::ZERO);
        panel.check_proximity(&hand, false, &mut events);
        assert_eq!(events, [InteractionEvent::Touch]);
        assert!(panel.is_touched());
        assert!(panel.is_highlighted());

        events.clear();
        let moved = pointing_hand(1, DVec3::new(0.03, 0.0, 0.0));
        panel.check_proximity(&moved, false, &mut events);
        assert!(events.is_empty());
        panel.update(&[moved], &mut events);
        assert!(matches!(events[..], [InteractionEvent::Travel(_)]));
        assert!(
            panel
                .surface()
                .position()
                .abs_diff_eq(DVec3::new(0.03, 0.0, 0.0), 1e-9)
        );

        events.clear();
        panel.hand_lost(1, &mut events);
        assert_eq!(events, [InteractionEvent::Release]);
        assert!(!panel.is_touched());
        assert!(!panel.is_highlighted());
    }

    #[test]
    fn move_threshold_holds_the_surface() {
        let mut panel = interaction(
            0.2,
            SurfaceConfig {
                fingers_required_for_move: 2,
                hover_bounds: None,
                ..SurfaceConfig::default()
            },
        );
        let mut events = Vec::new();
        panel.check_proximity(&pointing_hand(1, DVec3::ZERO), false, &mut events);
        let moved = pointing_hand(1, DVec3::new(0.03, 0.0, 0.0));
        panel.check_proximity(&moved, false, &mut events);
        events.clear();
        panel.update(&[moved], &mut events);
        assert!(events.is_empty());
        assert_eq!(panel.surface().position(), DVec3::ZERO);
    }

    #[test]
    fn resizing_hands_do_not_touch() {
        let mut panel = interaction(0.2, SurfaceConfig::default());
        let mut events = Vec::new();
        panel.check_proximity(&pointing_hand(1, DVec3::ZERO), true, &mut events);
        assert!(events.is_empty());
        assert!(!panel.is_touched());
        assert_eq!(panel.drag_tracker().map(|t| t.intersection_count()), Some(1));
    }

    #[test]
    fn disabling_while_touched_waits_for_release() {
        let mut panel = interaction(0.2, SurfaceConfig::default());
        let mut events = Vec::new();
        panel.check_proximity(&pointing_hand(1, DVec3::ZERO), false, &mut events);

        panel.set_interactable(false);
        assert!(panel.is_interactable());
        assert_eq!(panel.pending_interactable(), Some(false));

        panel.hand_lost(1, &mut events);
        assert!(!panel.is_interactable());
        assert_eq!(panel.pending_interactable(), None);

        events.clear();
        panel.surface_mut().set_position(DVec3::new(0.1, 0.0, 0.0));
        panel.update(&[], &mut events);
        assert!(events.is_empty());
    }

    fn hovering_button() -> SurfaceInteraction {
        let mut button = interaction(
            1.0,
            SurfaceConfig {
                hover_bounds: Some(HoverBand::default()),
                ..SurfaceConfig::button()
            },
        );
        button.surface_mut().set_return_spring(Some(0.5));
        button
    }

    #[test]
    fn hover_band_reports_enter_and_leave() {
        let mut button = hovering_button();
        let mut events = Vec::new();

        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.1))], &mut events);
        assert!(matches!(events[..], [InteractionEvent::Hover(_)]));
        assert!(button.is_hovered());

        events.clear();
        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.2))], &mut events);
        assert!(events.is_empty());

        button.update(&[probing_hand(1, DVec3::new(2.0, 0.1, 0.2))], &mut events);
        assert!(matches!(events[..], [InteractionEvent::HoverOut(_)]));
        assert!(!button.is_hovered());
    }

    #[test]
    fn drag_panels_never_hover() {
        let mut panel = interaction(1.0, SurfaceConfig::default());
        let mut events = Vec::new();
        panel.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.1))], &mut events);
        assert!(events.is_empty());
        assert!(!panel.is_hovered());
        assert_eq!(panel.previous_overlap(ContactKey::new(1, INDEX_PROBE)), None);
    }

    #[test]
    fn hand_loss_drops_cached_overlaps() {
        let mut button = hovering_button();
        let mut events = Vec::new();
        button.update(&[probing_hand(1, DVec3::new(0.1, 0.1, 0.1))], &mut events);
        button.update(&[probing_hand(2, DVec3::new(0.1, 0.1, 0.1))], &mut events);
        button.hand_lost(1, &mut events);
        assert_eq!(button.previous_overlap(ContactKey::new(1, INDEX_PROBE)), None);
        assert_eq!(button.previous_overlap(ContactKey::new(2, INDEX_PROBE)), Some(0.1));
    }

    /// A 1x1 button at rest 0.1 below its original position.
    fn displaced_button(return_spring: Option<f64>) -> SurfaceInteraction {
        let mut button = interaction(1.0, SurfaceConfig::button());
        button.surface_mut().set_return_spring(return_spring);
        let displaced = DVec3::new(0.0, 0.0, -0.1);
        button.surface_mut().set_position(displaced);
        button.surface_mut().set_last_position(displaced);
        button
    }

    #[test]
    fn return_spring_pulls_a_released_button_back() {
        let mut button = displaced_button(Some(0.5));
        let mut events = Vec::new();
        button.update(&[], &mut events);
        // Force 0.05 on unit mass, damped by 0.88.
        assert!(matches!(events[..], [InteractionEvent::Travel(_)]));
        assert!((button.surface().position().z + 0.056).abs() < 1e-12);
    }

    #[test]
    fn anchor_springs_join_the_return_spring() {
        let mut button = displaced_button(Some(0.5));
        button.surface_mut().add_spring(DVec3::new(0.0, 0.0, 0.1), 0.5);
        let mut events = Vec::new();
        button.update(&[], &mut events);
        // 0.05 from the return spring plus 0.1 from the anchor.
        assert!((button.surface().position().z - 0.032).abs() < 1e-12);
    }

    #[test]
    fn springs_need_a_return_spring() {
        let mut button = displaced_button(None);
        button.surface_mut().add_spring(DVec3::new(0.0, 0.0, 0.1), 0.5);
        let mut events = Vec::new();
        button.update(&[], &mut events);
        assert!(events.is_empty());
        assert_eq!(button.surface().position(), DVec3::new(0.0, 0.0, -0.1));
    }

    #[test]
    fn drag_on_a_sphere_is_rejected() {
        let geometry = SurfaceGeometry::new(
            SurfaceShape::sphere(0.1).unwrap(),
            SurfaceTransform::default(),
        );
        assert!(matches!(
            SurfaceInteraction::new(geometry, SurfaceConfig::default()),
            Err(SurfaceError::Proximity(_))
        ));
        assert_eq!(
            SurfaceInteraction::new(geometry, SurfaceConfig::button().with_resize(true, false))
                .unwrap_err(),
            SurfaceError::ResizeRequiresRect(ShapeKind::Sphere)
        );
    }
}
