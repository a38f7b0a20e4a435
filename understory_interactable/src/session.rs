// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame driver.
//!
//! An [`InteractionSession`] owns every interactive surface and is the only
//! thing the input device talks to. It turns device callbacks into an ordered
//! list of [`SessionEvent`]s:
//!
//! - [`frame`](InteractionSession::frame) runs three phases. First every
//!   tracker is checked against every hand (touch and release come out here),
//!   then every surface resolves its position, then held corner handles
//!   resize their surfaces.
//! - [`hand_lost`](InteractionSession::hand_lost) flushes the hand from every
//!   tracker and cache before it returns.
//! - [`pinch_start`](InteractionSession::pinch_start) and
//!   [`pinch_end`](InteractionSession::pinch_end) grab and release corner
//!   handles; [`set_pinching`](InteractionSession::set_pinching) reports the
//!   sustained pinch state between them.
//!
//! Surfaces are visited in registration order, so when two surfaces could
//! claim the same gesture the earlier one wins.

use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_hit3d::{Corner, SurfaceGeometry};
use understory_proximity::{Frame, Hand, HandId};

use crate::config::SurfaceConfig;
use crate::error::SurfaceError;
use crate::interaction::{InteractionEvent, SurfaceInteraction};
use crate::resize::CornerResize;

/// Identifier of a surface within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u32);

/// An [`InteractionEvent`] tagged with the surface that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionEvent {
    /// Emitting surface.
    pub surface: SurfaceId,
    /// What happened.
    pub event: InteractionEvent,
}

/// The corner handle a hand is holding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeHandle {
    /// Surface being resized.
    pub surface: SurfaceId,
    /// Corner being dragged.
    pub corner: Corner,
}

/// Per-hand gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandScratch {
    /// Held corner handle, if any.
    pub resizing: Option<ResizeHandle>,
    /// Whether the device currently reports a pinch.
    pub pinching: bool,
}

#[derive(Debug)]
struct Entry {
    id: SurfaceId,
    interaction: SurfaceInteraction,
    resize: Option<CornerResize>,
}

/// Every interactive surface and the per-hand state that spans them.
#[derive(Debug, Default)]
pub struct InteractionSession {
    entries: Vec<Entry>,
    hands: HashMap<HandId, HandScratch>,
    next_id: u32,
    scratch: Vec<InteractionEvent>,
}

impl InteractionSession {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `geometry` interactive. Corner handles are created when the
    /// configuration asks for resize.
    pub fn add_surface(
        &mut self,
        geometry: SurfaceGeometry,
        config: SurfaceConfig,
    ) -> Result<SurfaceId, SurfaceError> {
        let interaction = SurfaceInteraction::new(geometry, config)?;
        let resize = if config.resize {
            Some(CornerResize::new(
                interaction.surface(),
                config.corner_radius,
                config.preserve_aspect,
            )?)
        } else {
            None
        };
        let id = SurfaceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            interaction,
            resize,
        });
        tracing::debug!(?id, kind = ?geometry.kind(), resize = config.resize, "surface added");
        Ok(id)
    }

    /// Drop a surface. Hands holding one of its handles let go.
    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<SurfaceInteraction> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        for scratch in self.hands.values_mut() {
            if scratch.resizing.is_some_and(|h| h.surface == id) {
                scratch.resizing = None;
            }
        }
        tracing::debug!(?id, "surface removed");
        Some(self.entries.remove(index).interaction)
    }

    /// Look up a surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceInteraction> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.interaction)
    }

    /// Look up a surface for modification.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut SurfaceInteraction> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.interaction)
    }

    /// Corner handles of a surface, if it is resizable.
    pub fn resize_handles(&self, id: SurfaceId) -> Option<&CornerResize> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.resize.as_ref())
    }

    /// Surfaces in registration order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceInteraction)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.interaction))
    }

    /// Gesture state of a hand.
    pub fn hand(&self, id: HandId) -> Option<&HandScratch> {
        self.hands.get(&id)
    }

    /// A hand started being tracked.
    pub fn hand_appeared(&mut self, hand: HandId) {
        self.hands.insert(hand, HandScratch::default());
        tracing::debug!(hand, "hand appeared");
    }

    /// A hand stopped being tracked.
    ///
    /// Every tracker emits `Out` for the hand's contacts, surfaces release as
    /// needed, and no cached entry for the hand survives this call.
    pub fn hand_lost(&mut self, hand: HandId, events: &mut Vec<SessionEvent>) {
        tracing::debug!(hand, "hand lost");
        for entry in &mut self.entries {
            entry.interaction.hand_lost(hand, &mut self.scratch);
            flush(entry.id, &mut self.scratch, events);
            if let Some(resize) = entry.resize.as_mut() {
                resize.clear(hand);
            }
        }
        self.hands.remove(&hand);
    }

    /// A pinch began: grab the first corner handle the palm is in, if the hand
    /// is not already holding one.
    pub fn pinch_start(&mut self, hand: &Hand) {
        let scratch = self.hands.entry(hand.id).or_default();
        scratch.pinching = true;
        if scratch.resizing.is_some() {
            return;
        }
        let grabbed = self.entries.iter().find_map(|entry| {
            let corner = entry.resize.as_ref()?.hovered_corner(hand.id)?;
            Some(ResizeHandle {
                surface: entry.id,
                corner,
            })
        });
        if let Some(handle) = grabbed {
            tracing::debug!(hand = hand.id, ?handle, "corner grabbed");
            scratch.resizing = Some(handle);
        }
    }

    /// A pinch ended: release any held handle.
    pub fn pinch_end(&mut self, hand: HandId) {
        if let Some(scratch) = self.hands.get_mut(&hand) {
            scratch.pinching = false;
            if let Some(handle) = scratch.resizing.take() {
                tracing::debug!(hand, ?handle, "corner released");
            }
        }
    }

    /// Report the sustained pinch state. A held handle is released as soon as
    /// the pinch drops, without waiting for [`pinch_end`](Self::pinch_end).
    pub fn set_pinching(&mut self, hand: HandId, pinching: bool) {
        self.hands.entry(hand).or_default().pinching = pinching;
    }

    /// Process one device frame.
    pub fn frame(&mut self, frame: &Frame, events: &mut Vec<SessionEvent>) {
        // Proximity: every tracker sees every hand before any surface moves.
        for entry in &mut self.entries {
            if let Some(resize) = entry.resize.as_mut() {
                resize.sync(entry.interaction.surface().geometry());
            }
        }
        for hand in &frame.hands {
            let resizing = self.hands.get(&hand.id).is_some_and(|h| h.resizing.is_some());
            for entry in &mut self.entries {
                entry
                    .interaction
                    .check_proximity(hand, resizing, &mut self.scratch);
                flush(entry.id, &mut self.scratch, events);
                if let Some(resize) = entry.resize.as_mut() {
                    resize.check(hand);
                }
            }
        }

        // Position.
        for entry in &mut self.entries {
            entry.interaction.update(&frame.hands, &mut self.scratch);
            flush(entry.id, &mut self.scratch, events);
        }

        // Resize.
        for hand in &frame.hands {
            let Some(scratch) = self.hands.get_mut(&hand.id) else {
                continue;
            };
            let Some(handle) = scratch.resizing else {
                continue;
            };
            if !scratch.pinching {
                tracing::debug!(hand = hand.id, ?handle, "pinch dropped; corner released");
                scratch.resizing = None;
                continue;
            }
            let Some(entry) = self.entries.iter_mut().find(|e| e.id == handle.surface) else {
                scratch.resizing = None;
                continue;
            };
            let Some(resize) = entry.resize.as_ref() else {
                continue;
            };
            let surface = entry.interaction.surface_mut();
            if resize.drag_corner(surface, handle.corner, hand.palm_position) {
                events.push(SessionEvent {
                    surface: entry.id,
                    event: InteractionEvent::Travel(surface.transform()),
                });
            }
        }
    }
}

fn flush(surface: SurfaceId, scratch: &mut Vec<InteractionEvent>, events: &mut Vec<SessionEvent>) {
    events.extend(
        scratch
            .drain(..)
            .map(|event| SessionEvent { surface, event }),
    );
}
