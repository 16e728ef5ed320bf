// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for the draw search.
//!
//! This module provides O(1) backtracking by recording state changes in a trail.
//! When backtracking occurs, the trail is rewound and every recorded old value
//! is handed back to the owner of the state, newest first.
//!
//! The trail never touches the state itself. Whoever owns the state implements
//! [`TrailRestore`] and decides what a slot id means.

/// A single entry in the trail, recording one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    /// Identifier of the slot that changed (meaning is owned by the state)
    pub id: usize,
    /// The value the slot held before the change
    pub old_value: u64,
}

/// Something whose slots can be restored from trail entries.
pub trait TrailRestore {
    /// Put `old_value` back into slot `id`.
    fn restore(&mut self, id: usize, old_value: u64);
}

/// The trail system for O(1) backtracking.
///
/// # Memory Model
///
/// Each `DrawContext` owns its own trail, so independent attempts can run in
/// parallel without sharing anything mutable.
#[derive(Debug, Default)]
pub struct Trail {
    /// All trail entries recorded so far
    entries: Vec<TrailEntry>,
    /// High-water mark, kept for statistics
    max_len: usize,
}

impl Trail {
    /// Create an empty trail with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            max_len: 0,
        }
    }

    /// Current position, usable as a checkpoint for [`Trail::rewind_to`].
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Record a state change in the trail.
    pub(crate) fn record_change(&mut self, id: usize, old_value: u64) {
        self.entries.push(TrailEntry { id, old_value });
        self.max_len = self.max_len.max(self.entries.len());
    }

    /// Undo every change recorded after `checkpoint`, newest first.
    ///
    /// Rewinding to a checkpoint at or beyond the current length is a no-op.
    pub fn rewind_to<R: TrailRestore>(&mut self, checkpoint: usize, target: &mut R) {
        while self.entries.len() > checkpoint {
            if let Some(entry) = self.entries.pop() {
                target.restore(entry.id, entry.old_value);
            }
        }
    }

    /// Entries recorded since `checkpoint`, oldest first.
    pub fn entries_since(&self, checkpoint: usize) -> &[TrailEntry] {
        &self.entries[checkpoint.min(self.entries.len())..]
    }

    /// Get the current number of entries in the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest the trail has been since creation.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
