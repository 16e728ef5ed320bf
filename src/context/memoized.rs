// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable constraint data (Tier 1: MEMO).

use crate::model::{ParticipantId, ReceiverSet};

/// Immutable constraint data for one draw (Tier 1: MEMO).
///
/// Computed once from the validated roster and forbidden pairs, then shared
/// by reference across every attempt of the draw. Holds the allowed relation
/// in both directions so that forward checking can look at givers and
/// receivers without recomputing anything.
///
/// The self-draw exclusion is always applied here, whether or not the caller
/// listed `(p, p)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintModel {
    /// `allowed_receivers[g]` = participants giver g may draw
    allowed_receivers: Vec<ReceiverSet>,

    /// `allowed_givers[r]` = participants allowed to draw receiver r
    allowed_givers: Vec<ReceiverSet>,
}

impl ConstraintModel {
    /// Build the allowed relation for `n` participants.
    ///
    /// `forbidden` holds `(blocker, blocked)` index pairs. Duplicates and
    /// explicit self-pairs are tolerated here; the roster rejects duplicates
    /// before this point.
    ///
    /// # Panics
    ///
    /// Panics if a pair references an index `>= n`.
    pub fn new(n: usize, forbidden: &[(ParticipantId, ParticipantId)]) -> Self {
        let mut allowed_receivers = vec![ReceiverSet::full(n); n];
        let mut allowed_givers = vec![ReceiverSet::full(n); n];

        for p in 0..n {
            allowed_receivers[p].remove(p);
            allowed_givers[p].remove(p);
        }

        for &(blocker, blocked) in forbidden {
            allowed_receivers[blocker].remove(blocked);
            allowed_givers[blocked].remove(blocker);
        }

        Self {
            allowed_receivers,
            allowed_givers,
        }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.allowed_receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_receivers.is_empty()
    }

    /// Receivers giver `giver` may draw.
    pub fn allowed_receivers(&self, giver: ParticipantId) -> &ReceiverSet {
        &self.allowed_receivers[giver]
    }

    /// Givers allowed to draw `receiver`.
    pub fn allowed_givers(&self, receiver: ParticipantId) -> &ReceiverSet {
        &self.allowed_givers[receiver]
    }

    /// True if `giver -> receiver` is a permitted pairing.
    pub fn is_allowed(&self, giver: ParticipantId, receiver: ParticipantId) -> bool {
        self.allowed_receivers[giver].contains(receiver)
    }
}
