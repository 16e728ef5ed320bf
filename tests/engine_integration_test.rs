// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the search engine.
//!
//! These tests validate that the engine correctly:
//! - Runs predicates in sequence
//! - Handles Choices and retry_pred correctly
//! - Backtracks on failure
//! - Restores state via trail
//! - Supports SuccessSamePredicate for multi-round predicates
//! - Suspends execution when requested

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_draw::context::{ConstraintModel, DrawContext};
use santa_draw::engine::EngineBuilder;
use santa_draw::predicates::{AssignGiverPredicate, FailPredicate, SuspendPredicate};
use santa_draw::state::{Counters, Statistics};
use santa_draw::{Predicate, PredicateResult};

/// Always fails, forcing the engine back into earlier choices.
#[derive(Debug)]
struct AlwaysFail;

impl Predicate for AlwaysFail {
    fn try_pred(&mut self, _ctx: &mut DrawContext<'_>, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }
}

/// Succeeds only if giver 0 was bound to `wanted`.
#[derive(Debug)]
struct ZeroDraws(usize);

impl Predicate for ZeroDraws {
    fn try_pred(&mut self, ctx: &mut DrawContext<'_>, _round: usize) -> PredicateResult {
        if ctx.state.receiver_of(0) == Some(self.0) {
            PredicateResult::Success
        } else {
            PredicateResult::Failure
        }
    }
}

fn zero_draws_one(ctx: &DrawContext<'_>) -> bool {
    ctx.state.receiver_of(0) == Some(1)
}

fn context(model: &ConstraintModel, seed: u64) -> DrawContext<'_> {
    DrawContext::new(model, StdRng::seed_from_u64(seed))
}

#[test]
fn test_single_draw_suspends_complete() {
    common::init_tracing();
    let model = ConstraintModel::new(5, &[(0, 1), (1, 0)]);
    let mut ctx = context(&model, 1);
    let engine = EngineBuilder::new()
        .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3, 4])))
        .add(Statistics::counting_predicate(Counters::Solutions, None))
        .terminal(Box::new(SuspendPredicate))
        .build();

    let engine = engine.search(&mut ctx).expect("should suspend");
    let (tries, retries) = engine.statistics();
    // 5 rounds + the completion round + Counting + Suspend
    assert!(tries >= 8);
    assert!(retries >= 5);

    assert_eq!(ctx.statistics.get(Counters::Solutions), 1);
    let receivers = ctx.receivers().expect("complete");
    assert_ne!(receivers[0], 1);
    assert_ne!(receivers[1], 0);
}

#[test]
fn test_fail_terminal_counts_every_derangement() {
    // Derangement numbers for n = 3..=6
    for (n, expected) in [(3, 2), (4, 9), (5, 44), (6, 265)] {
        let model = ConstraintModel::new(n, &[]);
        let mut ctx = context(&model, n as u64);
        let engine = EngineBuilder::new()
            .add(Box::new(AssignGiverPredicate::new((0..n).collect())))
            .add(Statistics::counting_predicate(Counters::Solutions, None))
            .terminal(Box::new(FailPredicate))
            .build();

        assert!(engine.search(&mut ctx).is_none());
        assert_eq!(ctx.statistics.get(Counters::Solutions), expected, "n = {}", n);
        // Exhaustion rewinds everything
        assert!(ctx.trail.is_empty());
        assert_eq!(ctx.state.open_givers().len(), n);
    }
}

#[test]
fn test_counting_respects_restrictions() {
    // Blocking one pairing of four people leaves the derangements that avoid it.
    let model = ConstraintModel::new(4, &[(0, 1)]);
    let mut ctx = context(&model, 0);
    let engine = EngineBuilder::new()
        .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3])))
        .add(Statistics::counting_predicate(Counters::Solutions, None))
        .terminal(Box::new(FailPredicate))
        .build();

    engine.search(&mut ctx);
    // 9 derangements, 3 of which send 0 to 1
    assert_eq!(ctx.statistics.get(Counters::Solutions), 6);
}

#[test]
fn test_filtered_counting() {
    let model = ConstraintModel::new(4, &[]);
    let mut ctx = context(&model, 0);
    let engine = EngineBuilder::new()
        .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3])))
        .add(Statistics::counting_predicate(
            Counters::Solutions,
            Some(zero_draws_one),
        ))
        .terminal(Box::new(FailPredicate))
        .build();

    engine.search(&mut ctx);
    assert_eq!(ctx.statistics.get(Counters::Solutions), 3);
}

#[test]
fn test_backtracking_into_assignment() {
    let model = ConstraintModel::new(4, &[]);
    for seed in 0..5 {
        let mut ctx = context(&model, seed);
        let engine = EngineBuilder::new()
            .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3])))
            .add(Box::new(ZeroDraws(3)))
            .terminal(Box::new(SuspendPredicate))
            .build();

        assert!(engine.search(&mut ctx).is_some());
        assert_eq!(ctx.state.receiver_of(0), Some(3));
    }
}

#[test]
fn test_backtracking_exhausts_options() {
    let model = ConstraintModel::new(4, &[]);
    let mut ctx = context(&model, 0);
    let engine = EngineBuilder::new()
        .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2, 3])))
        .add(Box::new(AlwaysFail))
        .terminal(Box::new(SuspendPredicate))
        .build();

    assert!(engine.search(&mut ctx).is_none());
    assert!(ctx.trail.is_empty());
    assert!(ctx.trail.max_len() > 0);
}

#[test]
fn test_empty_predicates() {
    let model = ConstraintModel::new(3, &[]);
    let mut ctx = context(&model, 0);
    let engine = EngineBuilder::new()
        .terminal(Box::new(SuspendPredicate))
        .build();

    let result = engine.search(&mut ctx);
    assert!(result.is_some()); // Actually suspends immediately with just terminal
}
