// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bipartite matching between open givers and unclaimed receivers.
//!
//! A partial draw can be completed exactly when the allowed relation,
//! restricted to the givers still open and the receivers still unclaimed,
//! has a perfect matching. This module decides that with augmenting paths
//! (Kuhn's algorithm):
//!
//! - `Matching::complete` extends a matching until every open giver holds an
//!   allowed, unclaimed receiver, or reports a [`Deficiency`].
//! - The matching left over from the previous call is kept as a warm start.
//!   Pairs that no longer fit the current state are dropped first, so after
//!   one new binding usually a single augmenting path is needed.
//!
//! When no augmenting path exists from some giver, the givers explored from it
//! and the receivers they reached form a Hall violator: together those givers
//! are allowed strictly fewer receivers than there are givers.

use crate::context::ConstraintModel;
use crate::model::{ParticipantId, ReceiverSet};
use rand::seq::SliceRandom;
use rand::Rng;

/// Givers whose allowed receivers, taken together, are too few to go round.
///
/// `receivers` is everything `givers` may still draw, and always has exactly
/// one member fewer than `givers`. `unplaced` is the giver the failed search
/// started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deficiency {
    pub unplaced: ParticipantId,
    pub givers: Vec<ParticipantId>,
    pub receivers: Vec<ParticipantId>,
}

/// A partial giver <-> receiver matching.
#[derive(Debug, Clone, Default)]
pub struct Matching {
    receiver_of: Vec<Option<ParticipantId>>,
    giver_of: Vec<Option<ParticipantId>>,
}

impl Matching {
    /// An empty matching over `n` participants.
    pub fn new(n: usize) -> Self {
        Self {
            receiver_of: vec![None; n],
            giver_of: vec![None; n],
        }
    }

    /// Match every giver in `open_givers` to a distinct allowed receiver
    /// from `unclaimed`, keeping whatever of the current matching still fits.
    pub fn complete(
        &mut self,
        model: &ConstraintModel,
        open_givers: &ReceiverSet,
        unclaimed: &ReceiverSet,
    ) -> Result<(), Deficiency> {
        self.complete_ranked(model, open_givers, unclaimed, None)
    }

    /// Find a complete assignment for the whole roster from scratch, with
    /// givers and receivers considered in a random order. Returns the
    /// giver-indexed receivers.
    pub fn shuffled<R: Rng + ?Sized>(
        model: &ConstraintModel,
        rng: &mut R,
    ) -> Result<Vec<ParticipantId>, Deficiency> {
        let n = model.len();
        let mut rank: Vec<usize> = (0..n).collect();
        rank.shuffle(rng);

        let everyone = ReceiverSet::full(n);
        let mut matching = Self::new(n);
        matching.complete_ranked(model, &everyone, &everyone, Some(&rank))?;
        // Every giver is open, so every slot is filled.
        Ok(matching.receiver_of.into_iter().flatten().collect())
    }

    fn complete_ranked(
        &mut self,
        model: &ConstraintModel,
        open_givers: &ReceiverSet,
        unclaimed: &ReceiverSet,
        rank: Option<&[usize]>,
    ) -> Result<(), Deficiency> {
        let n = model.len();
        if self.receiver_of.len() != n {
            *self = Self::new(n);
        }
        self.drop_stale(model, open_givers, unclaimed);

        let mut free: Vec<ParticipantId> = open_givers
            .iter()
            .filter(|&giver| self.receiver_of[giver].is_none())
            .collect();
        if let Some(rank) = rank {
            free.sort_by_key(|&giver| rank[giver]);
        }

        for giver in free {
            let mut visited = ReceiverSet::empty(n);
            if !self.augment(model, unclaimed, rank, giver, &mut visited) {
                return Err(self.deficiency(giver, &visited));
            }
        }
        Ok(())
    }

    /// Forget pairs that involve a bound participant or a forbidden pairing.
    fn drop_stale(&mut self, model: &ConstraintModel, open_givers: &ReceiverSet, unclaimed: &ReceiverSet) {
        self.giver_of.iter_mut().for_each(|slot| *slot = None);
        for giver in 0..self.receiver_of.len() {
            match self.receiver_of[giver] {
                Some(receiver)
                    if open_givers.contains(giver)
                        && unclaimed.contains(receiver)
                        && model.is_allowed(giver, receiver)
                        && self.giver_of[receiver].is_none() =>
                {
                    self.giver_of[receiver] = Some(giver);
                }
                _ => self.receiver_of[giver] = None,
            }
        }
    }

    /// Look for an augmenting path from `giver`. Leaves the matching untouched on failure.
    fn augment(
        &mut self,
        model: &ConstraintModel,
        unclaimed: &ReceiverSet,
        rank: Option<&[usize]>,
        giver: ParticipantId,
        visited: &mut ReceiverSet,
    ) -> bool {
        let mut candidates: Vec<ParticipantId> = model
            .allowed_receivers(giver)
            .intersection(unclaimed)
            .iter()
            .collect();
        if let Some(rank) = rank {
            candidates.sort_by_key(|&receiver| rank[receiver]);
        }

        for receiver in candidates {
            // A deeper search may have reached it since the list was built
            if visited.contains(receiver) {
                continue;
            }
            visited.insert(receiver);

            let available = match self.giver_of[receiver] {
                None => true,
                Some(holder) => self.augment(model, unclaimed, rank, holder, visited),
            };
            if available {
                self.receiver_of[giver] = Some(receiver);
                self.giver_of[receiver] = Some(giver);
                return true;
            }
        }
        false
    }

    /// After a failed search from `root`, every visited receiver is matched
    /// and every receiver its holder may draw was visited.
    fn deficiency(&self, root: ParticipantId, visited: &ReceiverSet) -> Deficiency {
        let receivers: Vec<ParticipantId> = visited.iter().collect();
        let mut givers: Vec<ParticipantId> = receivers
            .iter()
            .filter_map(|&receiver| self.giver_of[receiver])
            .collect();
        givers.push(root);
        givers.sort_unstable();
        Deficiency {
            unplaced: root,
            givers,
            receivers,
        }
    }
}
