// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Statistics are stored in the context, and can be incremented by special predicates,
//! or by additional methods.

use crate::context::DrawContext;
use crate::engine::{Predicate, PredicateResult};
use crate::propagation::{FailureKind, PropagationFailure};
use serde::{Deserialize, Serialize};
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

#[derive(EnumCountMacro, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Tentative giver -> receiver bindings tried.
    Nodes,
    /// Bindings undone because they led nowhere.
    Backtracks,
    /// Complete assignments reached.
    Solutions,
}

const COUNT: usize = Counters::COUNT + PropagationFailure::COUNT;

#[derive(Debug, Clone, Default)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics { stats: [0; COUNT] }
    }

    /// A predicate that will increment the given counter, whenever a condition holds (or always).
    pub fn counting_predicate(
        counter: Counters,
        filter: Option<fn(&DrawContext<'_>) -> bool>,
    ) -> Box<dyn Predicate> {
        Box::new(CountingPredicate {
            filter: filter.unwrap_or(|_ctx| true),
            counter,
        })
    }

    /// Increment the specified counter by 1.
    pub fn increment_counter(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Count a pruned branch against its kind.
    pub fn record_failure(&mut self, failure: &PropagationFailure) {
        self.stats[Counters::COUNT + FailureKind::from(failure) as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// How many branches were pruned for the given reason.
    pub fn failures(&self, kind: FailureKind) -> u64 {
        self.stats[Counters::COUNT + kind as usize]
    }

    /// Fold another attempt's numbers into these.
    pub fn merge(&mut self, other: &Statistics) {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats.iter()) {
            *mine += theirs;
        }
    }
}

/// Caller-facing summary of the work one draw did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStatistics {
    pub attempts: u64,
    pub nodes: u64,
    pub backtracks: u64,
    pub receiver_prunes: u64,
    pub giver_prunes: u64,
    pub matching_prunes: u64,
    pub budget_exhaustions: u64,
    pub max_trail_len: usize,
    /// The assignment came from the shuffled matching after every attempt
    /// ran out of budget.
    pub matching_fallback: bool,
}

impl DrawStatistics {
    pub fn from_statistics(statistics: &Statistics, attempts: u64, max_trail_len: usize) -> Self {
        Self {
            attempts,
            nodes: statistics.get(Counters::Nodes),
            backtracks: statistics.get(Counters::Backtracks),
            receiver_prunes: statistics.failures(FailureKind::NoRemainingReceivers),
            giver_prunes: statistics.failures(FailureKind::NoRemainingGivers),
            matching_prunes: statistics.failures(FailureKind::NoCompleteMatching),
            budget_exhaustions: statistics.failures(FailureKind::BudgetExhausted),
            max_trail_len,
            matching_fallback: false,
        }
    }
}

#[derive(Debug)]
struct CountingPredicate {
    filter: fn(&DrawContext<'_>) -> bool,
    counter: Counters,
}

impl Predicate for CountingPredicate {
    fn try_pred(&mut self, ctx: &mut DrawContext<'_>, _round: usize) -> PredicateResult {
        if (self.filter)(ctx) {
            ctx.statistics.increment_counter(self.counter);
        }
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        "Counting"
    }
}
