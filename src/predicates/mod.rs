// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! This module contains the predicates used in the draw search.
//! Each predicate represents a choice point in the search space.
//!
//! # Organization
//!
//! - `assign`: AssignGiverPredicate, one round per giver
//! - Built-in terminal predicates: `FailPredicate`, `SuspendPredicate`

pub mod assign;

pub use assign::AssignGiverPredicate;

use crate::context::DrawContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};

/// Built-in fail predicate (Prolog's `fail.`).
///
/// This predicate always fails, forcing backtracking. Ending a program with it
/// makes the engine enumerate every branch, which is handy for counting.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use santa_draw::context::{ConstraintModel, DrawContext};
/// use santa_draw::engine::EngineBuilder;
/// use santa_draw::predicates::{AssignGiverPredicate, FailPredicate};
/// use santa_draw::state::{Counters, Statistics};
///
/// let model = ConstraintModel::new(4, &[]);
/// let mut ctx = DrawContext::new(&model, StdRng::seed_from_u64(1));
/// let engine = EngineBuilder::new()
///     .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3])))
///     .add(Statistics::counting_predicate(Counters::Solutions, None))
///     .terminal(Box::new(FailPredicate))
///     .build();
///
/// assert!(engine.search(&mut ctx).is_none());
/// // Four people have nine derangements
/// assert_eq!(ctx.statistics.get(Counters::Solutions), 9);
/// ```
#[derive(Debug)]
pub struct FailPredicate;

impl Predicate for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut DrawContext<'_>, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    fn name(&self) -> &str {
        "Fail"
    }
}

impl TerminalPredicate for FailPredicate {}

/// Built-in suspend predicate: stop at the first complete solution.
#[derive(Debug)]
pub struct SuspendPredicate;

impl Predicate for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut DrawContext<'_>, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }

    fn name(&self) -> &str {
        "Suspend"
    }
}

impl TerminalPredicate for SuspendPredicate {}
