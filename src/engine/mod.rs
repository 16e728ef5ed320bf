// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-deterministic search engine.
//!
//! This module implements a backtracking search engine that runs predicates
//! in sequence. The engine coordinates with the trail system to provide
//! automatic state restoration on backtracking.
//!
//! # Architecture
//!
//! The engine maintains a stack of predicate execution states. Each stack entry tracks:
//! - Which predicate is executing
//! - Current round number (for predicates that execute multiple times)
//! - Choice mode state (whether we're trying alternatives)
//! - Current choice index (when in choice mode)
//!
//! Execution model:
//! 1. Call try_pred(round) on each predicate
//! 2. If Success: advance to next predicate
//! 3. If SuccessSamePredicate: increment round, stay at same predicate
//! 4. If Choices(n): enter choice mode, call retry_pred(round, 0..n-1)
//! 5. If Failure: backtrack to previous stack entry
//! 6. If Suspend: pause and return control to caller
//!
//! A draw is the program `AssignGiver, Counting(Solutions), Suspend`: the
//! engine suspends exactly when every giver holds a receiver, and is exhausted
//! when no complete assignment exists under the giver order it was given.
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use santa_draw::context::{ConstraintModel, DrawContext};
//! use santa_draw::engine::EngineBuilder;
//! use santa_draw::predicates::{AssignGiverPredicate, SuspendPredicate};
//!
//! let model = ConstraintModel::new(3, &[]);
//! let mut ctx = DrawContext::new(&model, StdRng::seed_from_u64(7));
//! let engine = EngineBuilder::new()
//!     .add(Box::new(AssignGiverPredicate::new(vec![0, 1, 2])))
//!     .terminal(Box::new(SuspendPredicate))
//!     .build();
//!
//! // Suspended means every giver holds a receiver
//! assert!(engine.search(&mut ctx).is_some());
//! assert!(ctx.state.is_complete());
//! ```

pub mod predicate;

pub use predicate::{Predicate, PredicateResult, TerminalPredicate};

use crate::context::DrawContext;

/// Stack entry tracking the state of one predicate execution.
#[derive(Debug)]
struct StackEntry {
    /// Index of the predicate in the predicates list.
    predicate_index: usize,

    /// Current round number (incremented by SuccessSamePredicate).
    round: usize,

    /// Whether we're in choice mode (exploring alternatives).
    in_choice_mode: bool,

    /// Current choice being tried (when in_choice_mode is true).
    current_choice: usize,

    /// Total number of choices (when in_choice_mode is true).
    num_choices: usize,

    /// Trail checkpoint for this stack entry.
    trail_checkpoint: usize,
}

impl StackEntry {
    fn new(predicate_index: usize, round: usize, trail_checkpoint: usize) -> Self {
        Self {
            predicate_index,
            round,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            trail_checkpoint,
        }
    }
}

/// Search engine that coordinates predicate execution and backtracking.
#[derive(Debug)]
pub struct SearchEngine {
    /// List of predicates to execute in sequence.
    predicates: Vec<Box<dyn Predicate>>,

    /// Stack of predicate execution states.
    stack: Vec<StackEntry>,

    /// Statistics: number of try_pred calls.
    try_count: u64,

    /// Statistics: number of retry_pred calls.
    retry_count: u64,
}

impl SearchEngine {
    /// Create a new search engine with the given predicates.
    ///
    /// Prefer [`EngineBuilder`], which refuses to build a program without a
    /// terminal predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            predicates,
            stack: Vec::new(),
            try_count: 0,
            retry_count: 0,
        }
    }

    /// Run the search to find one solution.
    ///
    /// Consumes the engine and returns:
    /// - `Some(engine)` if suspended: the solution is in `ctx`, and the engine
    ///   is handed back so its statistics can be read
    /// - `None` if exhausted (backtracked past the first predicate)
    ///
    /// # Panics
    ///
    /// Panics if the predicate sequence is invalid (reaches the end without
    /// FAIL or SUSPEND), or if `retry_pred` returns `Choices` or `Suspend`.
    pub fn search(mut self, ctx: &mut DrawContext<'_>) -> Option<Self> {
        self.stack.clear();
        self.try_count = 0;
        self.retry_count = 0;

        if self.predicates.is_empty() {
            return None;
        }

        self.stack.push(StackEntry::new(0, 0, ctx.trail.checkpoint()));

        while let Some(entry) = self.stack.last_mut() {
            // Every step starts from the state this entry was entered with
            ctx.rewind_to(entry.trail_checkpoint);

            let pred_idx = entry.predicate_index;
            let round = entry.round;

            if !entry.in_choice_mode {
                // Call mode: try_pred
                self.try_count += 1;
                match self.predicates[pred_idx].try_pred(ctx, round) {
                    PredicateResult::Success => self.push_next_predicate(pred_idx, ctx),
                    PredicateResult::SuccessSamePredicate => {
                        self.push_same_predicate(pred_idx, round, ctx)
                    }
                    PredicateResult::Failure => {
                        self.stack.pop();
                    }
                    PredicateResult::Choices(n) => {
                        if let Some(entry) = self.stack.last_mut() {
                            entry.in_choice_mode = true;
                            entry.current_choice = 0;
                            entry.num_choices = n;
                            entry.trail_checkpoint = ctx.trail.checkpoint();
                        }
                    }
                    PredicateResult::Suspend => return Some(self),
                }
            } else {
                // Choice mode: retry_pred
                if entry.current_choice >= entry.num_choices {
                    self.stack.pop();
                    continue;
                }

                let choice = entry.current_choice;
                entry.current_choice += 1;
                self.retry_count += 1;

                match self.predicates[pred_idx].retry_pred(ctx, round, choice) {
                    PredicateResult::Success => self.push_next_predicate(pred_idx, ctx),
                    PredicateResult::SuccessSamePredicate => {
                        self.push_same_predicate(pred_idx, round, ctx)
                    }
                    PredicateResult::Failure => {
                        // Try next choice (loop continues)
                    }
                    result @ (PredicateResult::Choices(_) | PredicateResult::Suspend) => {
                        panic!("retry_pred returned invalid result: {:?}", result);
                    }
                }
            }
        }

        None
    }

    /// Push a new stack entry for the predicate after `current`.
    fn push_next_predicate(&mut self, current: usize, ctx: &DrawContext<'_>) {
        let next_index = current + 1;

        if next_index >= self.predicates.len() {
            panic!(
                "Invalid predicate sequence: reached end without FAIL or SUSPEND. \
                 All predicate programs must terminate with a FAIL or SUSPEND predicate."
            );
        }

        self.stack
            .push(StackEntry::new(next_index, 0, ctx.trail.checkpoint()));
    }

    /// Push a new stack entry for the same predicate with incremented round.
    fn push_same_predicate(&mut self, current: usize, round: usize, ctx: &DrawContext<'_>) {
        self.stack
            .push(StackEntry::new(current, round + 1, ctx.trail.checkpoint()));
    }

    /// Get statistics about the search.
    ///
    /// Returns (try_count, retry_count) showing how many times predicates
    /// were tried and retried.
    pub fn statistics(&self) -> (u64, u64) {
        (self.try_count, self.retry_count)
    }
}

/// Builder for predicate programs.
///
/// Predicates are added in execution order; [`EngineBuilder::terminal`] closes
/// the program and is the only way to reach `build`.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate.
    pub fn add(mut self, predicate: Box<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append the terminal predicate, closing the program.
    pub fn terminal<T: TerminalPredicate + 'static>(mut self, predicate: Box<T>) -> TerminatedBuilder {
        self.predicates.push(predicate);
        TerminatedBuilder {
            predicates: self.predicates,
        }
    }
}

/// A predicate program that ends in a terminal predicate.
#[derive(Debug)]
pub struct TerminatedBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl TerminatedBuilder {
    pub fn build(self) -> SearchEngine {
        SearchEngine::new(self.predicates)
    }
}
