// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Giver orderings.
//!
//! The order in which givers are bound decides how early the search meets its
//! hardest sub-problems. Two strategies are used:
//!
//! - **Most-constrained-first**: givers with the fewest allowed receivers go
//!   first, ties broken by roster position. Deterministic, and usually the
//!   fastest way to hit (and back out of) a dead end.
//! - **Random**: a uniformly shuffled order, used for the retry attempts.
//!
//! Variety between draws does not come from here but from the receiver
//! shuffles in [`crate::predicates::AssignGiverPredicate`].

use crate::context::ConstraintModel;
use crate::model::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderingStrategy {
    MostConstrainedFirst,
    Random,
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingStrategy::MostConstrainedFirst => write!(f, "most-constrained-first"),
            OrderingStrategy::Random => write!(f, "random"),
        }
    }
}

/// A complete giver order: every participant exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiverOrdering {
    strategy: OrderingStrategy,
    order: Vec<ParticipantId>,
}

impl GiverOrdering {
    /// Ascending allowed-receiver count, ties by roster position.
    pub fn most_constrained_first(model: &ConstraintModel) -> Self {
        let mut order: Vec<ParticipantId> = (0..model.len()).collect();
        // Stable sort keeps roster order among equals.
        order.sort_by_key(|&giver| model.allowed_receivers(giver).len());
        Self {
            strategy: OrderingStrategy::MostConstrainedFirst,
            order,
        }
    }

    /// Uniformly random order.
    pub fn random<R: Rng + ?Sized>(model: &ConstraintModel, rng: &mut R) -> Self {
        let mut order: Vec<ParticipantId> = (0..model.len()).collect();
        order.shuffle(rng);
        Self {
            strategy: OrderingStrategy::Random,
            order,
        }
    }

    pub fn strategy(&self) -> OrderingStrategy {
        self.strategy
    }

    pub fn into_vec(self) -> Vec<ParticipantId> {
        self.order
    }
}
