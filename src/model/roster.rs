// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Roster and forbidden-pair resolution.
//!
//! Callers speak in opaque participant identifiers. The search speaks in dense
//! indices `0..n`. The roster is the only place the two meet: it validates the
//! caller's input and translates it into index form before any search begins,
//! and translates the finished assignment back afterwards.

use super::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A directional exclusion rule: `blocker` must not draw `blocked`.
///
/// `(a, b)` and `(b, a)` are different rules. Supply both to keep a couple
/// apart in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForbiddenPair<P> {
    pub blocker: P,
    pub blocked: P,
}

impl<P> ForbiddenPair<P> {
    pub fn new(blocker: P, blocked: P) -> Self {
        Self { blocker, blocked }
    }
}

impl<P> From<(P, P)> for ForbiddenPair<P> {
    fn from((blocker, blocked): (P, P)) -> Self {
        Self { blocker, blocked }
    }
}

/// Malformed draw input. Raised before any search starts.
///
/// These are caller errors and are distinct from the two draw outcomes
/// (`TooFewParticipants`, `ImpossibleDraw`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError<P> {
    #[error("participant {0:?} appears more than once in the roster")]
    DuplicateParticipant(P),

    #[error("forbidden pair ({blocker:?}, {blocked:?}) references {unknown:?}, who is not a participant")]
    UnknownParticipant { blocker: P, blocked: P, unknown: P },

    #[error("forbidden pair ({blocker:?}, {blocked:?}) is listed more than once")]
    DuplicateForbiddenPair { blocker: P, blocked: P },
}

/// The validated participant list for one draw.
///
/// Participant `i` in index space is `ids[i]`, i.e. roster order is input order.
#[derive(Debug, Clone)]
pub struct Roster<P> {
    ids: Vec<P>,
    index: HashMap<P, ParticipantId>,
}

impl<P: Participant> Roster<P> {
    /// Build a roster, rejecting duplicate identifiers.
    pub fn new<I>(participants: I) -> Result<Self, ValidationError<P>>
    where
        I: IntoIterator<Item = P>,
    {
        let ids: Vec<P> = participants.into_iter().collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateParticipant(id.clone()));
            }
        }
        Ok(Self { ids, index })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index of a participant, if present.
    pub fn index_of(&self, id: &P) -> Option<ParticipantId> {
        self.index.get(id).copied()
    }

    /// Identifier for an index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn id(&self, index: ParticipantId) -> &P {
        &self.ids[index]
    }

    /// Translate caller pairs into index pairs.
    ///
    /// Every pair must name two roster members and appear at most once. An
    /// explicit self-pair `(p, p)` is accepted: the self-draw exclusion always
    /// applies, so stating it is harmless.
    pub fn resolve_forbidden<I>(
        &self,
        pairs: I,
    ) -> Result<Vec<(ParticipantId, ParticipantId)>, ValidationError<P>>
    where
        I: IntoIterator,
        I::Item: Into<ForbiddenPair<P>>,
    {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for pair in pairs {
            let ForbiddenPair { blocker, blocked } = pair.into();
            let lookup = |who: &P| {
                self.index_of(who).ok_or_else(|| ValidationError::UnknownParticipant {
                    blocker: blocker.clone(),
                    blocked: blocked.clone(),
                    unknown: who.clone(),
                })
            };
            let from = lookup(&blocker)?;
            let to = lookup(&blocked)?;

            if !seen.insert((from, to)) {
                return Err(ValidationError::DuplicateForbiddenPair { blocker, blocked });
            }
            resolved.push((from, to));
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order_is_input_order() {
        let roster = Roster::new(["carol", "alice", "bob"]).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.index_of(&"carol"), Some(0));
        assert_eq!(roster.index_of(&"bob"), Some(2));
        assert_eq!(*roster.id(1), "alice");
        assert_eq!(roster.index_of(&"dave"), None);
    }

    #[test]
    fn test_duplicate_participant() {
        let err = Roster::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateParticipant("a"));
    }

    #[test]
    fn test_resolve_forbidden() {
        let roster = Roster::new(["a", "b", "c"]).unwrap();
        let pairs = roster.resolve_forbidden([("a", "b"), ("b", "a"), ("c", "c")]).unwrap();
        assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn test_unknown_participant() {
        let roster = Roster::new(["a", "b", "c"]).unwrap();
        let err = roster.resolve_forbidden([("a", "z")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownParticipant {
                blocker: "a",
                blocked: "z",
                unknown: "z",
            }
        );
    }

    #[test]
    fn test_duplicate_pair() {
        let roster = Roster::new(["a", "b", "c"]).unwrap();
        let err = roster
            .resolve_forbidden([ForbiddenPair::new("a", "b"), ForbiddenPair::new("a", "b")])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateForbiddenPair {
                blocker: "a",
                blocked: "b",
            }
        );
    }

    #[test]
    fn test_error_messages() {
        let err: ValidationError<&str> = ValidationError::DuplicateForbiddenPair {
            blocker: "a",
            blocked: "b",
        };
        assert_eq!(
            err.to_string(),
            "forbidden pair (\"a\", \"b\") is listed more than once"
        );
    }
}
