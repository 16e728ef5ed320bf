// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable search state (Tier 2: DYNAMIC).

use crate::model::{ParticipantId, ReceiverSet};
use crate::trail::{Trail, TrailRestore};

/// Trail encoding of "no partner yet".
const UNASSIGNED: u64 = u64::MAX;

/// Mutable search state (Tier 2: DYNAMIC).
///
/// This data changes during search and every change goes through the trail,
/// so one `rewind_to` puts the whole state back as it was at a checkpoint.
///
/// # Trail slots
///
/// For `n` participants, slot ids are laid out as:
/// - `0..n`: `receiver_of[giver]`
/// - `n..2n`: `giver_of[receiver]`
///
/// The two bitsets are derived from those slots and kept in step on every
/// set and restore.
#[derive(Debug, Clone)]
pub struct DynamicState {
    receiver_of: Vec<Option<ParticipantId>>,
    giver_of: Vec<Option<ParticipantId>>,

    /// Givers with no receiver yet.
    open_givers: ReceiverSet,

    /// Receivers nobody has drawn yet.
    unclaimed: ReceiverSet,
}

impl DynamicState {
    /// Fresh state with nobody assigned.
    pub fn new(n: usize) -> Self {
        Self {
            receiver_of: vec![None; n],
            giver_of: vec![None; n],
            open_givers: ReceiverSet::full(n),
            unclaimed: ReceiverSet::full(n),
        }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.receiver_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver_of.is_empty()
    }

    /// Bind `giver -> receiver`, recording both sides on the trail.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if either side is already bound.
    pub fn assign(&mut self, trail: &mut Trail, giver: ParticipantId, receiver: ParticipantId) {
        debug_assert!(self.receiver_of[giver].is_none(), "giver {} already assigned", giver);
        debug_assert!(self.giver_of[receiver].is_none(), "receiver {} already claimed", receiver);

        let n = self.len();
        trail.record_change(giver, encode(self.receiver_of[giver]));
        self.set_slot(giver, Some(receiver));
        trail.record_change(n + receiver, encode(self.giver_of[receiver]));
        self.set_slot(n + receiver, Some(giver));
    }

    pub fn receiver_of(&self, giver: ParticipantId) -> Option<ParticipantId> {
        self.receiver_of[giver]
    }

    pub fn giver_of(&self, receiver: ParticipantId) -> Option<ParticipantId> {
        self.giver_of[receiver]
    }

    /// Givers still waiting for a receiver.
    pub fn open_givers(&self) -> &ReceiverSet {
        &self.open_givers
    }

    /// Receivers not drawn by anyone yet.
    pub fn unclaimed(&self) -> &ReceiverSet {
        &self.unclaimed
    }

    /// True once every giver holds a receiver.
    pub fn is_complete(&self) -> bool {
        self.open_givers.is_empty()
    }

    /// The full giver-indexed receiver list, if every giver is bound.
    pub fn receivers(&self) -> Option<Vec<ParticipantId>> {
        self.receiver_of.iter().copied().collect()
    }

    fn set_slot(&mut self, id: usize, value: Option<ParticipantId>) {
        let n = self.len();
        if id < n {
            self.receiver_of[id] = value;
            match value {
                Some(_) => self.open_givers.remove(id),
                None => self.open_givers.insert(id),
            }
        } else {
            let receiver = id - n;
            self.giver_of[receiver] = value;
            match value {
                Some(_) => self.unclaimed.remove(receiver),
                None => self.unclaimed.insert(receiver),
            }
        }
    }
}

impl TrailRestore for DynamicState {
    fn restore(&mut self, id: usize, old_value: u64) {
        self.set_slot(id, decode(old_value));
    }
}

fn encode(value: Option<ParticipantId>) -> u64 {
    value.map_or(UNASSIGNED, |id| id as u64)
}

fn decode(value: u64) -> Option<ParticipantId> {
    (value != UNASSIGNED).then_some(value as ParticipantId)
}
