// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! One search attempt: a giver order, a seeded RNG and a node budget.

use crate::context::{ConstraintModel, DrawContext};
use crate::engine::EngineBuilder;
use crate::model::ParticipantId;
use crate::ordering::{GiverOrdering, OrderingStrategy};
use crate::predicates::{AssignGiverPredicate, SuspendPredicate};
use crate::state::{Counters, Statistics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttemptOutcome {
    /// Giver-indexed receivers of a complete assignment.
    Found(Vec<ParticipantId>),
    /// The whole search space under this order was explored.
    Exhausted,
    /// The node budget ran out first.
    BudgetExhausted,
}

#[derive(Debug)]
pub(crate) struct AttemptReport {
    pub attempt: usize,
    pub strategy: OrderingStrategy,
    pub outcome: AttemptOutcome,
    pub statistics: Statistics,
    pub max_trail_len: usize,
}

impl AttemptReport {
    pub fn is_found(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Found(_))
    }
}

/// Per-attempt seeds of one draw.
///
/// Both keys come out of an RNG seeded with the draw's base seed, so draws
/// with neighbouring base seeds do not share attempt seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedSchedule {
    attempt_key: u64,
    fallback: u64,
}

impl SeedSchedule {
    pub fn new(base_seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(base_seed);
        Self {
            attempt_key: rng.gen(),
            fallback: rng.gen(),
        }
    }

    /// Seed for attempt number `attempt`.
    pub fn attempt(&self, attempt: usize) -> u64 {
        self.attempt_key.wrapping_add(attempt as u64)
    }

    /// Seed for the shuffled matching used when every attempt runs out of budget.
    pub fn fallback(&self) -> u64 {
        self.fallback
    }
}

/// Run attempt number `attempt`.
///
/// Attempt 0 binds givers most-constrained-first; every later attempt uses a
/// random order drawn from its own RNG.
pub(crate) fn run_attempt(
    model: &ConstraintModel,
    attempt: usize,
    seed: u64,
    node_budget: Option<u64>,
) -> AttemptReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let ordering = if attempt == 0 {
        GiverOrdering::most_constrained_first(model)
    } else {
        GiverOrdering::random(model, &mut rng)
    };
    let strategy = ordering.strategy();

    let mut ctx = DrawContext::new(model, rng).with_node_budget(node_budget);
    let engine = EngineBuilder::new()
        .add(Box::new(AssignGiverPredicate::new(ordering.into_vec())))
        .add(Statistics::counting_predicate(Counters::Solutions, None))
        .terminal(Box::new(SuspendPredicate))
        .build();

    let outcome = match engine.search(&mut ctx) {
        Some(_) => match ctx.receivers() {
            Some(receivers) => AttemptOutcome::Found(receivers),
            None => AttemptOutcome::Exhausted,
        },
        None if ctx.is_aborted() => AttemptOutcome::BudgetExhausted,
        None => AttemptOutcome::Exhausted,
    };

    debug!(
        attempt,
        seed,
        strategy = %strategy,
        nodes = ctx.statistics.get(Counters::Nodes),
        backtracks = ctx.statistics.get(Counters::Backtracks),
        found = matches!(outcome, AttemptOutcome::Found(_)),
        "draw attempt finished"
    );

    AttemptReport {
        attempt,
        strategy,
        outcome,
        statistics: ctx.statistics,
        max_trail_len: ctx.trail.max_len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::result::is_valid_assignment;

    #[test]
    fn test_first_attempt_is_most_constrained() {
        let model = ConstraintModel::new(4, &[]);
        let report = run_attempt(&model, 0, 1, None);
        assert_eq!(report.strategy, OrderingStrategy::MostConstrainedFirst);
        assert!(report.is_found());
        assert_eq!(report.statistics.get(Counters::Solutions), 1);

        let report = run_attempt(&model, 3, 1, None);
        assert_eq!(report.strategy, OrderingStrategy::Random);
    }

    #[test]
    fn test_found_assignment_is_valid() {
        let model = ConstraintModel::new(6, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
        let schedule = SeedSchedule::new(77);
        for attempt in 0..4 {
            let report = run_attempt(&model, attempt, schedule.attempt(attempt), None);
            match report.outcome {
                AttemptOutcome::Found(receivers) => assert!(is_valid_assignment(&model, &receivers)),
                other => panic!("expected a solution, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let model = ConstraintModel::new(8, &[(0, 1), (2, 3)]);
        let a = run_attempt(&model, 0, 1234, None);
        let b = run_attempt(&model, 0, 1234, None);
        assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn test_exhausted_vs_budget() {
        let model = ConstraintModel::new(
            5,
            &[(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
        );
        assert_eq!(run_attempt(&model, 0, 0, None).outcome, AttemptOutcome::Exhausted);
        assert_eq!(
            run_attempt(&model, 0, 0, Some(1)).outcome,
            AttemptOutcome::BudgetExhausted
        );
    }

    #[test]
    fn test_seed_schedule_is_stable() {
        assert_eq!(SeedSchedule::new(10), SeedSchedule::new(10));
        let schedule = SeedSchedule::new(10);
        assert_ne!(schedule.attempt(0), schedule.attempt(1));
        assert_eq!(schedule.attempt(usize::MAX), schedule.attempt(usize::MAX));
    }

    #[test]
    fn test_neighbouring_seeds_share_no_attempts() {
        for base in 0..100u64 {
            let here = SeedSchedule::new(base);
            let next = SeedSchedule::new(base + 1);
            let seeds: Vec<u64> = (0..6).map(|k| here.attempt(k)).collect();
            assert!((0..6).all(|k| !seeds.contains(&next.attempt(k))));
            assert!(!seeds.contains(&next.fallback()));
        }
    }
}
