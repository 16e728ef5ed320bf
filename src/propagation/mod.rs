// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint checking for the draw search.
//!
//! Two layers, both exact:
//!
//! 1. **Pre-check** ([`precheck`]), once per draw, before any search: the
//!    roster must have at least [`MIN_PARTICIPANTS`] members, every participant
//!    must have at least one allowed receiver, every participant must be an
//!    allowed receiver of somebody, and the allowed relation must have a
//!    perfect [`Matching`]. The first three give the most specific message for
//!    common mistakes; the last decides feasibility.
//!
//! 2. **Forward checking** ([`forward_check`]), after every tentative binding:
//!    every open giver must still have an allowed, unclaimed receiver, every
//!    unclaimed receiver must still have an allowed, open giver, and the
//!    remaining givers and receivers must still have a perfect matching. A
//!    branch that passes always extends to a complete assignment.

mod errors;
mod matching;

pub use errors::{FailureKind, PrecheckFailure, PropagationFailure};
pub use matching::{Deficiency, Matching};

use crate::context::{ConstraintModel, DynamicState};
use crate::model::{ParticipantId, ReceiverSet};
use tracing::trace;

/// Fewest participants a draw accepts.
///
/// With two people the only derangement is the mutual swap, which is not a
/// meaningful draw.
pub const MIN_PARTICIPANTS: usize = 3;

/// Allowed-receiver count per giver: `n - 1 - |distinct blocked others|`.
pub fn allowed_receiver_counts(model: &ConstraintModel) -> Vec<usize> {
    (0..model.len())
        .map(|giver| model.allowed_receivers(giver).len())
        .collect()
}

/// Reject impossible draws without searching.
pub fn precheck(model: &ConstraintModel) -> Result<(), PrecheckFailure> {
    let n = model.len();
    if n < MIN_PARTICIPANTS {
        return Err(PrecheckFailure::TooFewParticipants { count: n });
    }

    if let Some(giver) = allowed_receiver_counts(model)
        .iter()
        .position(|&count| count == 0)
    {
        return Err(PrecheckFailure::NoAllowedReceivers { giver });
    }

    if let Some(receiver) = (0..n).find(|&r| model.allowed_givers(r).is_empty()) {
        return Err(PrecheckFailure::NoAllowedGivers { receiver });
    }

    let everyone = ReceiverSet::full(n);
    Matching::new(n)
        .complete(model, &everyone, &everyone)
        .map_err(|Deficiency { givers, receivers, .. }| PrecheckFailure::Overconstrained { givers, receivers })
}

/// Verify that the current bindings can still be completed.
///
/// `matching` is a warm start carried between calls; its contents only affect
/// speed, never the verdict. `depth` is the number of bindings made so far,
/// carried into the failure for diagnostics.
pub fn forward_check(
    model: &ConstraintModel,
    state: &DynamicState,
    matching: &mut Matching,
    depth: usize,
) -> Result<(), PropagationFailure> {
    if let Some(giver) = first_stranded(state.open_givers().iter(), state.unclaimed(), |g| {
        model.allowed_receivers(g)
    }) {
        trace!(giver, depth, "forward check: giver stranded");
        return Err(PropagationFailure::NoRemainingReceivers { giver, depth });
    }

    if let Some(receiver) = first_stranded(state.unclaimed().iter(), state.open_givers(), |r| {
        model.allowed_givers(r)
    }) {
        trace!(receiver, depth, "forward check: receiver stranded");
        return Err(PropagationFailure::NoRemainingGivers { receiver, depth });
    }

    if let Err(deficiency) = matching.complete(model, state.open_givers(), state.unclaimed()) {
        let giver = deficiency.unplaced;
        trace!(giver, givers = ?deficiency.givers, depth, "forward check: no complete matching");
        return Err(PropagationFailure::NoCompleteMatching { giver, depth });
    }

    Ok(())
}

/// First participant whose allowed partners no longer meet `available`.
fn first_stranded<'a, I, F>(
    mut candidates: I,
    available: &ReceiverSet,
    allowed: F,
) -> Option<ParticipantId>
where
    I: Iterator<Item = ParticipantId>,
    F: Fn(ParticipantId) -> &'a ReceiverSet,
{
    candidates.find(|&p| !allowed(p).intersects(available))
}
