// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The draw: roster and restrictions in, assignment or verdict out.
//!
//! # Pipeline
//!
//! 1. **Validate**: build the [`Roster`], resolve forbidden pairs. Malformed
//!    input stops here with a [`ValidationError`].
//! 2. **Pre-check**: [`propagation::precheck`] rejects rosters that are too
//!    small or that have no valid assignment at all, without searching. This
//!    is the only place an [`ImpossibleDraw`](DrawFailure::ImpossibleDraw)
//!    verdict comes from.
//! 3. **Search**: attempt 0 binds givers most-constrained-first; if it finds
//!    nothing, up to `max_retries` further attempts each use a random giver
//!    order. Every attempt shuffles receivers with its own seeded RNG and is
//!    bounded by `node_budget`.
//! 4. **Fallback**: if every attempt ran out of budget, a [`Matching`] over
//!    shuffled givers and receivers supplies the assignment.
//!
//! # Fairness
//!
//! Receivers are tried in shuffled order, so repeated draws of the same input
//! visibly vary. The draw does **not** sample uniformly from all valid
//! assignments; assignments that the most-constrained-first order reaches
//! through fewer forced moves can be more likely than others, and the
//! fallback matching has biases of its own.

mod attempt;
mod config;
mod result;

pub use config::DrawConfig;
pub use result::{Assignment, DrawError, DrawFailure, DrawReport, DrawResult, Infeasibility};

use crate::context::ConstraintModel;
use crate::model::{ForbiddenPair, Participant, Roster, ValidationError};
use crate::propagation::{self, Matching, PrecheckFailure};
use crate::state::{DrawStatistics, Statistics};
use attempt::{run_attempt, AttemptOutcome, AttemptReport, SeedSchedule};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Draw with the default configuration.
///
/// # Example
///
/// ```
/// use santa_draw::{draw, DrawResult};
///
/// let result = draw(["ann", "bob", "cat", "dan"], [("ann", "bob"), ("bob", "ann")]).unwrap();
/// match result {
///     DrawResult::Success(assignment) => {
///         assert_ne!(assignment.receiver_of(&"ann"), Some(&"bob"));
///     }
///     DrawResult::Failure(failure) => panic!("{}", failure),
/// }
/// ```
pub fn draw<P, I, F>(participants: I, forbidden: F) -> Result<DrawResult<P>, ValidationError<P>>
where
    P: Participant,
    I: IntoIterator<Item = P>,
    F: IntoIterator,
    F::Item: Into<ForbiddenPair<P>>,
{
    Drawer::default()
        .draw(participants, forbidden)
        .map(|report| report.result)
}

/// Draw with the default configuration, flattening every failure into one error.
pub fn try_draw<P, I, F>(participants: I, forbidden: F) -> Result<Assignment<P>, DrawError<P>>
where
    P: Participant,
    I: IntoIterator<Item = P>,
    F: IntoIterator,
    F::Item: Into<ForbiddenPair<P>>,
{
    Ok(draw(participants, forbidden)?.into_result()?)
}

/// A configured draw engine.
///
/// Holds no state between draws; one `Drawer` can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Drawer {
    config: DrawConfig,
}

impl Drawer {
    pub fn new(config: DrawConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Run a draw and report the work it took.
    pub fn draw<P, I, F>(&self, participants: I, forbidden: F) -> Result<DrawReport<P>, ValidationError<P>>
    where
        P: Participant,
        I: IntoIterator<Item = P>,
        F: IntoIterator,
        F::Item: Into<ForbiddenPair<P>>,
    {
        let roster = Roster::new(participants)?;
        let pairs = roster.resolve_forbidden(forbidden)?;
        let model = ConstraintModel::new(roster.len(), &pairs);

        debug!(
            participants = roster.len(),
            forbidden = pairs.len(),
            "starting draw"
        );

        if let Err(failure) = propagation::precheck(&model) {
            debug!(%failure, "draw rejected before search");
            return Ok(DrawReport::rejected(classify_precheck(&roster, failure)));
        }

        let schedule = SeedSchedule::new(self.config.seed.unwrap_or_else(rand::random));
        let (winner, reports) = if self.config.parallel {
            self.race_attempts(&model, &schedule)
        } else {
            self.run_attempts(&model, &schedule)
        };

        let mut statistics = Statistics::new();
        let mut max_trail_len = 0;
        for report in reports.iter().chain(winner.iter()) {
            statistics.merge(&report.statistics);
            max_trail_len = max_trail_len.max(report.max_trail_len);
        }
        let attempts = (reports.len() + usize::from(winner.is_some())) as u64;
        let summary = DrawStatistics::from_statistics(&statistics, attempts, max_trail_len);

        let report = match winner {
            Some(AttemptReport {
                attempt,
                strategy,
                outcome: AttemptOutcome::Found(receivers),
                ..
            }) => {
                debug_assert!(result::is_valid_assignment(&model, &receivers));
                debug!(attempt, %strategy, nodes = summary.nodes, "draw succeeded");
                DrawReport {
                    result: DrawResult::Success(Assignment::from_receivers(&roster, &receivers)),
                    statistics: summary,
                    winning_attempt: Some(attempt),
                    winning_strategy: Some(strategy),
                }
            }
            _ => {
                let mut rng = StdRng::seed_from_u64(schedule.fallback());
                let outcome = match Matching::shuffled(&model, &mut rng) {
                    Ok(receivers) => {
                        debug_assert!(result::is_valid_assignment(&model, &receivers));
                        debug!(attempts, nodes = summary.nodes, "search budget spent, using shuffled matching");
                        DrawResult::Success(Assignment::from_receivers(&roster, &receivers))
                    }
                    // Unreachable once the pre-check has passed.
                    Err(deficiency) => {
                        let failure = classify_precheck(
                            &roster,
                            PrecheckFailure::Overconstrained {
                                givers: deficiency.givers,
                                receivers: deficiency.receivers,
                            },
                        );
                        debug!(%failure, "draw impossible");
                        DrawResult::Failure(failure)
                    }
                };
                DrawReport {
                    result: outcome,
                    statistics: DrawStatistics {
                        matching_fallback: true,
                        ..summary
                    },
                    winning_attempt: None,
                    winning_strategy: None,
                }
            }
        };

        Ok(report)
    }

    /// Attempts one after another, stopping at the first success.
    fn run_attempts(
        &self,
        model: &ConstraintModel,
        schedule: &SeedSchedule,
    ) -> (Option<AttemptReport>, Vec<AttemptReport>) {
        let mut failed = Vec::new();
        for attempt in 0..self.config.attempts() {
            let report = run_attempt(
                model,
                attempt,
                schedule.attempt(attempt),
                self.config.node_budget,
            );
            if report.is_found() {
                return (Some(report), failed);
            }
            failed.push(report);
        }
        (None, failed)
    }

    /// All attempts at once on the rayon pool; the first success wins and
    /// attempts not yet started are skipped.
    fn race_attempts(
        &self,
        model: &ConstraintModel,
        schedule: &SeedSchedule,
    ) -> (Option<AttemptReport>, Vec<AttemptReport>) {
        let failed = Mutex::new(Vec::new());
        let winner = (0..self.config.attempts())
            .into_par_iter()
            .find_map_any(|attempt| {
                let report = run_attempt(
                    model,
                    attempt,
                    schedule.attempt(attempt),
                    self.config.node_budget,
                );
                if report.is_found() {
                    Some(report)
                } else {
                    failed
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(report);
                    None
                }
            });

        let mut failed = failed.into_inner().unwrap_or_else(PoisonError::into_inner);
        failed.sort_by_key(|report| report.attempt);
        (winner, failed)
    }
}

/// Map a pre-check verdict onto the caller-facing outcome.
fn classify_precheck<P: Participant>(roster: &Roster<P>, failure: PrecheckFailure) -> DrawFailure<P> {
    match failure {
        PrecheckFailure::TooFewParticipants { count } => DrawFailure::TooFewParticipants { count },
        PrecheckFailure::NoAllowedReceivers { giver } => DrawFailure::ImpossibleDraw {
            hint: Infeasibility::NoAllowedReceivers {
                giver: roster.id(giver).clone(),
            },
        },
        PrecheckFailure::NoAllowedGivers { receiver } => DrawFailure::ImpossibleDraw {
            hint: Infeasibility::NoAllowedGivers {
                receiver: roster.id(receiver).clone(),
            },
        },
        PrecheckFailure::Overconstrained { givers, receivers } => DrawFailure::ImpossibleDraw {
            hint: Infeasibility::Overconstrained {
                givers: ids(roster, &givers),
                receivers: ids(roster, &receivers),
            },
        },
    }
}

fn ids<P: Participant>(roster: &Roster<P>, indices: &[usize]) -> Vec<P> {
    indices.iter().map(|&index| roster.id(index).clone()).collect()
}
