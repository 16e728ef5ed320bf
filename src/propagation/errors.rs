// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for the draw search.

use crate::model::ParticipantId;
use strum_macros::{EnumCount as EnumCountMacro, EnumDiscriminants};
use thiserror::Error;

/// Reasons a branch of the search is abandoned.
///
/// These never reach the caller directly. They drive backtracking and are
/// counted in [`crate::state::Statistics`].
#[derive(Debug, Clone, PartialEq, Eq, Error, EnumCountMacro, EnumDiscriminants)]
#[strum_discriminants(name(FailureKind))]
pub enum PropagationFailure {
    /// An unassigned giver has no allowed receiver left unclaimed.
    #[error("giver {giver} has no unclaimed receiver left (depth {depth})")]
    NoRemainingReceivers { giver: ParticipantId, depth: usize },

    /// An unclaimed receiver has no allowed giver left unassigned.
    #[error("receiver {receiver} has no unassigned giver left (depth {depth})")]
    NoRemainingGivers { receiver: ParticipantId, depth: usize },

    /// The open givers and unclaimed receivers admit no perfect matching.
    /// `giver` is where the last augmenting-path search failed.
    #[error("no complete assignment extends this one, giver {giver} cannot be placed (depth {depth})")]
    NoCompleteMatching { giver: ParticipantId, depth: usize },

    /// The attempt used up its node budget.
    #[error("search budget of {budget} nodes exhausted")]
    BudgetExhausted { budget: u64 },
}

/// Infeasibility found before any search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecheckFailure {
    #[error("{count} participants is below the minimum of {min}", min = super::MIN_PARTICIPANTS)]
    TooFewParticipants { count: usize },

    #[error("participant {giver} is forbidden from every other participant")]
    NoAllowedReceivers { giver: ParticipantId },

    #[error("no participant is allowed to draw participant {receiver}")]
    NoAllowedGivers { receiver: ParticipantId },

    /// Hall's condition fails: `givers` may only draw from `receivers`,
    /// which has fewer members.
    #[error("participants {givers:?} may only draw from {receivers:?}")]
    Overconstrained {
        givers: Vec<ParticipantId>,
        receivers: Vec<ParticipantId>,
    },
}
