// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Participant model.
//!
//! Contains the input-side types of a draw:
//! - `Participant`: bound satisfied by any usable opaque identifier
//! - `Roster`: validated participants and their dense indices
//! - `ForbiddenPair`: a directional exclusion rule
//! - `ReceiverSet`: bitset over participant indices used throughout the search

pub mod receiver_set;
pub mod roster;

pub use receiver_set::ReceiverSet;
pub use roster::{ForbiddenPair, Roster, ValidationError};

use std::fmt::Debug;
use std::hash::Hash;

/// Dense index of a participant within one draw (`0..n`, roster order).
pub type ParticipantId = usize;

/// Anything usable as an opaque participant identifier.
///
/// Blanket-implemented: `&str`, `String`, integers, UUIDs, ... all qualify.
pub trait Participant: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Participant for T {}
