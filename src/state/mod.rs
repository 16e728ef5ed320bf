// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search bookkeeping that is not part of the assignment itself.
//!
//! Counters live in the context next to the trail, but are never trailed:
//! backtracking undoes bindings, not the record of having tried them.

pub mod statistics;

pub use statistics::{Counters, DrawStatistics, Statistics};
