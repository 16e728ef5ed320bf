// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the trail-based backtracking system.
//!
//! These tests verify that the trail system works correctly when integrated
//! with DrawContext, demonstrating the core backtracking behavior that
//! the search engine depends on.

use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_draw::context::{ConstraintModel, DrawContext};

fn context(model: &ConstraintModel) -> DrawContext<'_> {
    DrawContext::new(model, StdRng::seed_from_u64(0))
}

#[test]
fn test_draw_context_simple_backtracking() {
    let model = ConstraintModel::new(4, &[]);
    let mut ctx = context(&model);

    assert_eq!(ctx.state.receiver_of(0), None);

    let checkpoint = ctx.trail.checkpoint();
    ctx.assign(0, 2);

    assert_eq!(ctx.state.receiver_of(0), Some(2));
    assert_eq!(ctx.state.giver_of(2), Some(0));
    // One entry per side of the binding
    assert_eq!(ctx.trail.len(), 2);

    ctx.rewind_to(checkpoint);
    assert_eq!(ctx.state.receiver_of(0), None);
    assert_eq!(ctx.state.giver_of(2), None);
    assert!(ctx.trail.is_empty());
}

#[test]
fn test_nested_checkpoints() {
    let model = ConstraintModel::new(4, &[]);
    let mut ctx = context(&model);

    let cp1 = ctx.trail.checkpoint();
    ctx.assign(0, 1);
    ctx.assign(1, 2);

    let cp2 = ctx.trail.checkpoint();
    assert_eq!(cp2, 4);
    ctx.assign(2, 3);
    assert_eq!(ctx.trail.len(), 6);
    assert!(ctx.state.unclaimed().contains(0));
    assert_eq!(ctx.state.unclaimed().len(), 1);

    ctx.rewind_to(cp2);
    assert_eq!(ctx.state.receiver_of(2), None);
    assert_eq!(ctx.state.receiver_of(1), Some(2));
    assert_eq!(ctx.state.unclaimed().len(), 2);

    ctx.rewind_to(cp1);
    assert_eq!(ctx.state.receiver_of(0), None);
    assert_eq!(ctx.state.open_givers().len(), 4);
    assert_eq!(ctx.state.unclaimed().len(), 4);
}

#[test]
fn test_complete_then_rewind() {
    let model = ConstraintModel::new(3, &[]);
    let mut ctx = context(&model);

    let checkpoint = ctx.trail.checkpoint();
    ctx.assign(0, 1);
    ctx.assign(1, 2);
    ctx.assign(2, 0);
    assert!(ctx.state.is_complete());
    assert_eq!(ctx.receivers(), Some(vec![1, 2, 0]));
    assert_eq!(ctx.trail.max_len(), 6);

    ctx.rewind_to(checkpoint);
    assert!(!ctx.state.is_complete());
    assert_eq!(ctx.receivers(), None);
    // The high-water mark survives rewinding
    assert_eq!(ctx.trail.max_len(), 6);
}

#[test]
fn test_independent_draw_contexts() {
    // Attempts share one model but never each other's state
    let model = ConstraintModel::new(3, &[]);
    let mut ctx1 = context(&model);
    let mut ctx2 = context(&model);

    let cp1 = ctx1.trail.checkpoint();
    ctx1.assign(0, 1);
    assert_eq!(ctx2.state.receiver_of(0), None);
    assert!(ctx2.trail.is_empty());

    ctx2.assign(0, 2);
    assert_eq!(ctx1.state.receiver_of(0), Some(1));
    assert_eq!(ctx2.state.receiver_of(0), Some(2));

    ctx1.rewind_to(cp1);
    assert_eq!(ctx1.state.receiver_of(0), None);
    assert_eq!(ctx2.state.receiver_of(0), Some(2));
    assert_eq!(ctx2.trail.len(), 2);
}

#[test]
fn test_trail_entries_record_old_values() {
    let model = ConstraintModel::new(3, &[]);
    let mut ctx = context(&model);

    let checkpoint = ctx.trail.checkpoint();
    ctx.assign(1, 0);
    let entries = ctx.trail.entries_since(checkpoint);
    // receiver_of[1] at slot 1, giver_of[0] at slot n + 0
    let ids: Vec<usize> = entries.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(entries.iter().all(|entry| entry.old_value == u64::MAX));
}
