// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use santa_draw::{Assignment, Participant};
use std::collections::HashSet;

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Check every draw invariant against the caller-facing identifiers.
pub fn assert_valid_assignment<P: Participant>(
    participants: &[P],
    forbidden: &[(P, P)],
    assignment: &Assignment<P>,
) {
    assert_eq!(assignment.len(), participants.len(), "one pair per participant");

    let givers: HashSet<&P> = assignment.iter().map(|(g, _)| g).collect();
    let receivers: HashSet<&P> = assignment.iter().map(|(_, r)| r).collect();
    let everyone: HashSet<&P> = participants.iter().collect();
    assert_eq!(givers, everyone, "everyone gives exactly once");
    assert_eq!(receivers, everyone, "everyone receives exactly once");

    for (giver, receiver) in assignment.iter() {
        assert_ne!(giver, receiver, "{:?} drew themselves", giver);
        assert!(
            !forbidden.iter().any(|(b, d)| b == giver && d == receiver),
            "forbidden pair {:?} -> {:?} used",
            giver,
            receiver
        );
    }
}
