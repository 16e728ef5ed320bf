// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining MEMO and DYNAMIC state.
//!
//! The DrawContext is the core data structure that combines:
//! - Tier 1 (MEMO): the immutable [`ConstraintModel`], borrowed
//! - Tier 2 (DYNAMIC): the mutable [`DynamicState`] with trail-based backtracking
//!
//! Every attempt of a draw gets its own context over the same borrowed model,
//! so attempts can run on separate threads with nothing mutable shared.

mod dynamic;
mod memoized;

pub use dynamic::DynamicState;
pub use memoized::ConstraintModel;

use crate::model::ParticipantId;
use crate::propagation::{Matching, PropagationFailure};
use crate::state::{Counters, Statistics};
use crate::trail::Trail;
use rand::rngs::StdRng;

/// Search context for one attempt.
///
/// # Memory Model
///
/// ```text
/// DrawContext {
///     model: &ConstraintModel,   // Tier 1: Immutable, shared
///     trail: Trail,              // Tier 2: Mutable, owned
///     state: DynamicState,       // Tier 2: Mutable, owned
///     rng: StdRng,               // owned, seeded per attempt
///     matching: Matching,        // warm start for forward checks, never trailed
///     statistics: Statistics,    // never trailed
/// }
/// ```
#[derive(Debug)]
pub struct DrawContext<'m> {
    /// Immutable constraint data (Tier 1)
    pub model: &'m ConstraintModel,
    /// Trail for O(1) backtracking (Tier 2)
    pub trail: Trail,
    /// Mutable search state (Tier 2)
    pub state: DynamicState,
    /// Source of receiver shuffles for this attempt
    pub rng: StdRng,
    /// Last matching found by forward checking. Only a starting point for
    /// the next check, so it needs no undoing on backtrack.
    pub matching: Matching,
    pub statistics: Statistics,
    node_budget: Option<u64>,
    aborted: bool,
}

impl<'m> DrawContext<'m> {
    /// Create a context with nobody assigned and no node budget.
    pub fn new(model: &'m ConstraintModel, rng: StdRng) -> Self {
        let n = model.len();
        Self {
            model,
            // Two entries per binding, at most n bindings live at once.
            trail: Trail::with_capacity(2 * n),
            state: DynamicState::new(n),
            rng,
            matching: Matching::new(n),
            statistics: Statistics::new(),
            node_budget: None,
            aborted: false,
        }
    }

    /// Limit the number of bindings this attempt may try.
    pub fn with_node_budget(mut self, node_budget: Option<u64>) -> Self {
        self.node_budget = node_budget;
        self
    }

    /// Undo every binding made after `checkpoint`.
    pub fn rewind_to(&mut self, checkpoint: usize) {
        self.trail.rewind_to(checkpoint, &mut self.state);
    }

    /// Bind `giver -> receiver` on the trail.
    pub fn assign(&mut self, giver: ParticipantId, receiver: ParticipantId) {
        self.state.assign(&mut self.trail, giver, receiver);
    }

    /// Account for one more binding, failing once the budget is spent.
    ///
    /// After the first failure the context stays aborted, which tells every
    /// predicate to fail straight away so the engine unwinds quickly.
    pub fn charge_node(&mut self) -> Result<(), PropagationFailure> {
        if let Some(budget) = self.node_budget {
            if self.statistics.get(Counters::Nodes) >= budget {
                self.aborted = true;
                return Err(PropagationFailure::BudgetExhausted { budget });
            }
        }
        self.statistics.increment_counter(Counters::Nodes);
        Ok(())
    }

    /// True once the node budget has been exceeded.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Giver-indexed receivers, if the assignment is complete.
    pub fn receivers(&self) -> Option<Vec<ParticipantId>> {
        self.state.receivers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rewind_through_context() {
        let model = ConstraintModel::new(3, &[]);
        let mut ctx = DrawContext::new(&model, StdRng::seed_from_u64(1));

        let checkpoint = ctx.trail.checkpoint();
        ctx.assign(0, 1);
        ctx.assign(1, 2);
        assert_eq!(ctx.state.receiver_of(1), Some(2));

        ctx.rewind_to(checkpoint);
        assert_eq!(ctx.state.receiver_of(0), None);
        assert_eq!(ctx.trail.len(), 0);
    }

    #[test]
    fn test_node_budget() {
        let model = ConstraintModel::new(3, &[]);
        let mut ctx = DrawContext::new(&model, StdRng::seed_from_u64(1)).with_node_budget(Some(2));

        assert!(ctx.charge_node().is_ok());
        assert!(ctx.charge_node().is_ok());
        assert!(!ctx.is_aborted());
        assert_eq!(
            ctx.charge_node(),
            Err(PropagationFailure::BudgetExhausted { budget: 2 })
        );
        assert!(ctx.is_aborted());
        assert_eq!(ctx.statistics.get(Counters::Nodes), 2);
    }

    #[test]
    fn test_independent_contexts() {
        let model = ConstraintModel::new(4, &[]);
        let mut ctx1 = DrawContext::new(&model, StdRng::seed_from_u64(1));
        let ctx2 = DrawContext::new(&model, StdRng::seed_from_u64(2));

        ctx1.assign(0, 3);
        assert_eq!(ctx1.trail.len(), 2);
        assert_eq!(ctx2.trail.len(), 0);
        assert_eq!(ctx2.state.receiver_of(0), None);
    }
}
