// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! AssignGiverPredicate - Binds every giver to a receiver.
//!
//! Round `k` binds the k-th giver of a fixed giver order. Its choices are the
//! receivers that giver may still draw, shuffled with the attempt's RNG, and
//! each choice is forward-checked before the engine moves on.

use crate::context::DrawContext;
use crate::engine::{Predicate, PredicateResult};
use crate::model::ParticipantId;
use crate::propagation;
use crate::state::Counters;
use rand::seq::SliceRandom;

/// AssignGiverPredicate finds a complete assignment for one giver order.
///
/// Runs for `order.len()` rounds, one per giver, then succeeds once more at
/// round `order.len()` when everybody is bound.
///
/// # Choices
///
/// At round k, with giver g = `order[k]`:
/// - candidates = allowed receivers of g that nobody has drawn yet
/// - the candidates are shuffled, so repeated draws vary
/// - choice i binds g to the i-th shuffled candidate
///
/// # Pruning
///
/// After each binding, [`propagation::forward_check`] rejects the choice
/// unless the givers still open can be matched to the receivers still
/// unclaimed. The rejected binding is undone by the trail when the engine
/// tries the next choice. Since the check is exact, the search only backs up
/// when the node budget runs out.
#[derive(Debug)]
pub struct AssignGiverPredicate {
    /// Givers in the order they are bound.
    order: Vec<ParticipantId>,

    /// Shuffled candidates offered at each round (indexed by round number).
    candidates: Vec<Vec<ParticipantId>>,
}

impl AssignGiverPredicate {
    /// `order` must list every participant exactly once.
    pub fn new(order: Vec<ParticipantId>) -> Self {
        let candidates = vec![Vec::new(); order.len()];
        Self { order, candidates }
    }
}

impl Predicate for AssignGiverPredicate {
    fn try_pred(&mut self, ctx: &mut DrawContext<'_>, round: usize) -> PredicateResult {
        if ctx.is_aborted() {
            return PredicateResult::Failure;
        }

        let Some(&giver) = self.order.get(round) else {
            debug_assert!(ctx.state.is_complete(), "all rounds bound but assignment incomplete");
            return PredicateResult::Success;
        };

        let options = &mut self.candidates[round];
        options.clear();
        let unclaimed = ctx.state.unclaimed();
        options.extend(
            ctx.model
                .allowed_receivers(giver)
                .iter()
                .filter(|&receiver| unclaimed.contains(receiver)),
        );
        options.shuffle(&mut ctx.rng);

        if options.is_empty() {
            PredicateResult::Failure
        } else {
            PredicateResult::Choices(options.len())
        }
    }

    fn retry_pred(
        &mut self,
        ctx: &mut DrawContext<'_>,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        if ctx.is_aborted() {
            return PredicateResult::Failure;
        }
        if choice > 0 {
            // The previous candidate at this round led nowhere.
            ctx.statistics.increment_counter(Counters::Backtracks);
        }
        if let Err(failure) = ctx.charge_node() {
            ctx.statistics.record_failure(&failure);
            return PredicateResult::Failure;
        }

        let giver = self.order[round];
        let receiver = self.candidates[round][choice];
        ctx.assign(giver, receiver);

        let model = ctx.model;
        match propagation::forward_check(model, &ctx.state, &mut ctx.matching, round + 1) {
            Ok(()) => PredicateResult::SuccessSamePredicate,
            Err(failure) => {
                ctx.statistics.record_failure(&failure);
                PredicateResult::Failure
            }
        }
    }

    fn name(&self) -> &str {
        "AssignGiver"
    }
}
