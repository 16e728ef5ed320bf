// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! ReceiverSet type for representing sets of participants as bitsets.
//!
//! A ReceiverSet is a compact representation of a set of participant indices,
//! where bit i represents the presence of participant i. Rosters are sized at
//! runtime, so the set carries its own capacity and as many u64 words as that
//! capacity needs.
//!
//! # Examples
//!
//! ```
//! use santa_draw::model::ReceiverSet;
//!
//! let mut set = ReceiverSet::empty(5);
//! set.insert(0);
//! set.insert(3);
//!
//! assert_eq!(set.len(), 2);
//! assert!(set.contains(0));
//! assert!(set.contains(3));
//! assert!(!set.contains(4));
//! ```

use super::ParticipantId;
use std::fmt;

const WORD_BITS: usize = 64;

/// A set of participants represented as a bitset.
///
/// Bit i (across all words) is set if participant i is in the set. Only the
/// first `capacity` bits are ever set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ReceiverSet {
    words: Vec<u64>,
    capacity: usize,
}

impl ReceiverSet {
    /// Create an empty set able to hold participants `0..capacity`.
    pub fn empty(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Create a set containing every participant `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::empty(capacity);

        let complete_words = capacity / WORD_BITS;
        for word in &mut set.words[..complete_words] {
            *word = u64::MAX;
        }

        let remaining_bits = capacity % WORD_BITS;
        if remaining_bits > 0 {
            set.words[complete_words] = (1u64 << remaining_bits) - 1;
        }

        set
    }

    /// Check if the set contains a participant.
    ///
    /// # Panics
    ///
    /// Panics if `id >= capacity`.
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.check_range(id);
        (self.words[id / WORD_BITS] >> (id % WORD_BITS)) & 1 != 0
    }

    /// Insert a participant into the set.
    ///
    /// # Panics
    ///
    /// Panics if `id >= capacity`.
    pub fn insert(&mut self, id: ParticipantId) {
        self.check_range(id);
        self.words[id / WORD_BITS] |= 1u64 << (id % WORD_BITS);
    }

    /// Remove a participant from the set.
    ///
    /// # Panics
    ///
    /// Panics if `id >= capacity`.
    pub fn remove(&mut self, id: ParticipantId) {
        self.check_range(id);
        self.words[id / WORD_BITS] &= !(1u64 << (id % WORD_BITS));
    }

    /// Number of participants in the set (population count).
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// True if the two sets share at least one participant.
    ///
    /// This is the hot path of forward checking, so it never allocates.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// Compute the intersection of two sets.
    pub fn intersection(&self, other: &Self) -> Self {
        debug_assert_eq!(self.capacity, other.capacity);
        Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
            capacity: self.capacity,
        }
    }

    /// Iterate over participants in the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(word_idx, &word)| BitIter { word }.map(move |bit| word_idx * WORD_BITS + bit))
    }

    fn check_range(&self, id: ParticipantId) {
        assert!(
            id < self.capacity,
            "ParticipantId out of range: {} >= {}",
            id,
            self.capacity
        );
    }
}

/// Yields the positions of set bits in one word, lowest first.
struct BitIter {
    word: u64,
}

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.word == 0 {
            return None;
        }
        let bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(bit)
    }
}

impl fmt::Debug for ReceiverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ReceiverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full() {
        let empty = ReceiverSet::empty(10);
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let full = ReceiverSet::full(10);
        assert_eq!(full.len(), 10);
        assert!((0..10).all(|i| full.contains(i)));
    }

    #[test]
    fn test_full_spanning_words() {
        let full = ReceiverSet::full(130);
        assert_eq!(full.len(), 130);
        assert!(full.contains(64));
        assert!(full.contains(129));
        assert_eq!(full.iter().last(), Some(129));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = ReceiverSet::empty(70);
        set.insert(3);
        set.insert(65);
        assert_eq!(set.len(), 2);

        set.remove(3);
        assert!(!set.contains(3));
        assert!(set.contains(65));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![65]);
    }

    #[test]
    fn test_iter_ascending() {
        let mut set = ReceiverSet::empty(200);
        for id in [150, 2, 64, 63, 0] {
            set.insert(id);
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 2, 63, 64, 150]);
    }

    #[test]
    fn test_set_operations() {
        let mut a = ReceiverSet::empty(8);
        let mut b = ReceiverSet::empty(8);
        a.insert(1);
        a.insert(2);
        b.insert(2);
        b.insert(5);

        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b).iter().collect::<Vec<_>>(), vec![2]);

        b.remove(2);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_display() {
        let mut set = ReceiverSet::empty(4);
        set.insert(0);
        set.insert(3);
        assert_eq!(set.to_string(), "{0, 3}");
        assert_eq!(format!("{:?}", set), "{0, 3}");
    }

    #[test]
    #[should_panic(expected = "ParticipantId out of range")]
    fn test_out_of_range() {
        let set = ReceiverSet::empty(4);
        set.contains(4);
    }
}
