// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hand::HandId;

/// Identity of one contact point: a point index on a tracked hand.
///
/// Keys are only meaningful while their hand is continuously tracked; a hand
/// that is lost and found again may reuse ids for unrelated points.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ContactKey {
    /// Owning hand.
    pub hand: HandId,
    /// Index into the hand's point supplier output.
    pub index: usize,
}

impl ContactKey {
    /// Create a key.
    pub const fn new(hand: HandId, index: usize) -> Self {
        Self { hand, index }
    }
}
