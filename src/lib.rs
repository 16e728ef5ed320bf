// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constrained random assignment for Secret Santa draws.
//!
//! Given a roster of participants and a set of directional forbidden pairs,
//! produce a giver -> receiver assignment in which everybody gives exactly
//! once, everybody receives exactly once, nobody draws themselves and no
//! forbidden pair is used. If no such assignment exists, say so.
//!
//! ```
//! use santa_draw::{try_draw, DrawError, DrawFailure};
//!
//! let assignment = try_draw(
//!     ["ann", "bob", "cat", "dan"],
//!     [("ann", "bob"), ("bob", "ann")],
//! )
//! .unwrap();
//! assert_eq!(assignment.len(), 4);
//!
//! let too_small = try_draw(["ann", "bob"], Vec::<(&str, &str)>::new());
//! assert!(matches!(
//!     too_small,
//!     Err(DrawError::Failed(DrawFailure::TooFewParticipants { count: 2 }))
//! ));
//! ```
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Built once per draw and never changed by the search:
//! - [`context::ConstraintModel`]: allowed receivers per giver and allowed
//!   givers per receiver, as bitsets
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Search state that changes during search, tracked on the trail:
//! - [`Trail`]: records state changes for O(1) backtracking
//! - [`context::DynamicState`]: current giver -> receiver bindings
//!
//! # Search Algorithm
//!
//! A draw is a bounded sequence of attempts (see [`draw`](mod@draw)). Each
//! attempt runs the predicate engine over a fixed program:
//!
//! 1. **AssignGiverPredicate**: bind each giver, in the attempt's giver order,
//!    to a shuffled allowed receiver, forward-checking every binding
//! 2. **Counting**: record the solution
//! 3. **Suspend**: stop at the first complete assignment
//!
//! Attempt 0 binds givers most-constrained-first. Later attempts use random
//! giver orders and can optionally race each other on the rayon pool.
//!
//! Forward checking keeps a bipartite matching of the givers still open to the
//! receivers still unclaimed, so a binding survives only if it extends to a
//! complete assignment. Infeasible inputs are rejected by the same matching
//! before any attempt runs, and if every attempt runs out of node budget a
//! shuffled matching is returned instead.

pub mod context;
pub mod draw;
pub mod engine;
pub mod model;
pub mod ordering;
pub mod predicates;
pub mod propagation;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use context::{ConstraintModel, DrawContext};
pub use draw::{
    draw, try_draw, Assignment, DrawConfig, DrawError, DrawFailure, DrawReport, DrawResult, Drawer,
    Infeasibility,
};
pub use engine::{Predicate, PredicateResult, SearchEngine};
pub use model::{ForbiddenPair, Participant, ParticipantId, ValidationError};
pub use ordering::OrderingStrategy;
pub use state::DrawStatistics;
pub use trail::Trail;
