// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Draw outcomes.
//!
//! A draw ends in exactly one of two states: [`DrawResult::Success`] with a
//! complete [`Assignment`], or [`DrawResult::Failure`] with a [`DrawFailure`].
//! There is no partial draw. Malformed input never gets this far; it is a
//! [`ValidationError`] instead.

use crate::context::ConstraintModel;
use crate::model::{Participant, ParticipantId, Roster, ValidationError};
use crate::ordering::OrderingStrategy;
use crate::propagation::MIN_PARTICIPANTS;
use crate::state::DrawStatistics;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A complete giver -> receiver bijection.
///
/// Pairs are kept in roster order of the giver. Every participant appears
/// exactly once as giver and exactly once as receiver, nobody draws
/// themselves, and no forbidden pair is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment<P> {
    pairs: Vec<(P, P)>,
}

impl<P: Participant> Assignment<P> {
    /// Translate a giver-indexed receiver list back into identifiers.
    pub(crate) fn from_receivers(roster: &Roster<P>, receivers: &[ParticipantId]) -> Self {
        let pairs = receivers
            .iter()
            .enumerate()
            .map(|(giver, &receiver)| (roster.id(giver).clone(), roster.id(receiver).clone()))
            .collect();
        Self { pairs }
    }

    /// Who `giver` buys for.
    pub fn receiver_of(&self, giver: &P) -> Option<&P> {
        self.pairs.iter().find(|(g, _)| g == giver).map(|(_, r)| r)
    }

    /// Who buys for `receiver`.
    pub fn giver_of(&self, receiver: &P) -> Option<&P> {
        self.pairs.iter().find(|(_, r)| r == receiver).map(|(g, _)| g)
    }

    /// `(giver, receiver)` pairs in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &P)> {
        self.pairs.iter().map(|(g, r)| (g, r))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(P, P)> {
        self.pairs
    }

    pub fn into_map(self) -> HashMap<P, P> {
        self.pairs.into_iter().collect()
    }
}

/// True if `receivers` is a bijection that only uses allowed pairings.
pub(crate) fn is_valid_assignment(model: &ConstraintModel, receivers: &[ParticipantId]) -> bool {
    let n = model.len();
    if receivers.len() != n {
        return false;
    }
    let mut claimed = vec![false; n];
    receivers.iter().enumerate().all(|(giver, &receiver)| {
        receiver < n
            && model.is_allowed(giver, receiver)
            && !std::mem::replace(&mut claimed[receiver], true)
    })
}

/// Advisory detail on why a draw is impossible.
///
/// Never changes the verdict: any variant means `ImpossibleDraw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Infeasibility<P> {
    /// Found by the pre-check: this participant is blocked from everyone.
    NoAllowedReceivers { giver: P },

    /// Found by the pre-check: nobody is allowed to draw this participant.
    NoAllowedGivers { receiver: P },

    /// Found by the pre-check: these givers may, between them, only draw
    /// from `receivers`, which has one member too few.
    Overconstrained { givers: Vec<P>, receivers: Vec<P> },
}

impl<P: fmt::Debug> fmt::Display for Infeasibility<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::NoAllowedReceivers { giver } => {
                write!(f, "{:?} is forbidden from every other participant", giver)
            }
            Infeasibility::NoAllowedGivers { receiver } => {
                write!(f, "nobody is allowed to draw {:?}", receiver)
            }
            Infeasibility::Overconstrained { givers, receivers } => {
                write!(f, "{:?} may only draw from {:?}", givers, receivers)
            }
        }
    }
}

/// The two ways a valid draw request can fail.
///
/// Neither is transient: both are decided before any search, so drawing
/// again with the same input gives the same verdict whatever the seed,
/// retry count or node budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawFailure<P> {
    /// The roster is too small for a meaningful draw.
    #[error("a draw needs at least {min} participants, got {count}", min = MIN_PARTICIPANTS)]
    TooFewParticipants { count: usize },

    /// The restrictions leave no valid assignment for this roster.
    #[error("impossible draw: {hint}")]
    ImpossibleDraw { hint: Infeasibility<P> },
}

/// Outcome of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawResult<P> {
    Success(Assignment<P>),
    Failure(DrawFailure<P>),
}

impl<P> DrawResult<P> {
    pub fn is_success(&self) -> bool {
        matches!(self, DrawResult::Success(_))
    }

    pub fn assignment(&self) -> Option<&Assignment<P>> {
        match self {
            DrawResult::Success(assignment) => Some(assignment),
            DrawResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DrawFailure<P>> {
        match self {
            DrawResult::Success(_) => None,
            DrawResult::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<Assignment<P>, DrawFailure<P>> {
        match self {
            DrawResult::Success(assignment) => Ok(assignment),
            DrawResult::Failure(failure) => Err(failure),
        }
    }
}

/// Everything that can go wrong for a caller who just wants an assignment.
#[derive(Debug, Error)]
pub enum DrawError<P> {
    #[error(transparent)]
    Invalid(#[from] ValidationError<P>),

    #[error(transparent)]
    Failed(#[from] DrawFailure<P>),
}

/// A draw result together with the work it took.
#[derive(Debug, Clone)]
pub struct DrawReport<P> {
    pub result: DrawResult<P>,
    pub statistics: DrawStatistics,

    /// Index of the attempt that found the assignment (0 is the
    /// most-constrained-first attempt).
    pub winning_attempt: Option<usize>,

    pub winning_strategy: Option<OrderingStrategy>,
}

impl<P> DrawReport<P> {
    /// A draw decided before any search attempt.
    pub(crate) fn rejected(failure: DrawFailure<P>) -> Self {
        Self {
            result: DrawResult::Failure(failure),
            statistics: DrawStatistics::default(),
            winning_attempt: None,
            winning_strategy: None,
        }
    }
}
