//! Play queue
//!
//! Explicit, user-ordered override sequence. While non-empty it takes
//! priority over the library when resolving what plays next.
//!
//! ```text
//! entries:  [ T2 ][ T4 ][ T7 ][ T4 ]
//!                   ^
//!                position (entry the transport refers to)
//! ```
//!
//! Invariant: `position < entries.len()`, or the queue is empty and
//! `position == 0`.

use groove_core::{Track, TrackId};

/// Ordered track sequence with a current position
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// Queued tracks (repeats allowed)
    entries: Vec<Track>,

    /// Index of the entry the transport refers to
    position: usize,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append track to the end of the queue
    pub fn push(&mut self, track: Track) {
        self.entries.push(track);
    }

    /// Insert track immediately after the current position
    ///
    /// On an empty queue this starts a new queue of one.
    pub fn insert_next(&mut self, track: Track) {
        if self.entries.is_empty() {
            self.entries.push(track);
            self.position = 0;
        } else {
            self.entries.insert(self.position + 1, track);
        }
    }

    /// Insert track at `index` (clamped to the end)
    ///
    /// Inserting at or before the current position shifts the position so it
    /// keeps referring to the same entry.
    pub fn insert(&mut self, index: usize, track: Track) {
        let index = index.min(self.entries.len());
        let was_empty = self.entries.is_empty();
        self.entries.insert(index, track);
        if !was_empty && index <= self.position {
            self.position += 1;
        }
    }

    /// Remove the entry at `index`
    ///
    /// If the removed index is at or before the current position and the
    /// position is greater than zero, the position moves back by one.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.entries.len() {
            return None;
        }

        let track = self.entries.remove(index);
        if index <= self.position && self.position > 0 {
            self.position -= 1;
        }
        if self.entries.is_empty() {
            self.position = 0;
        }

        Some(track)
    }

    /// Remove every entry referring to `track_id`
    ///
    /// Returns the number of entries removed.
    pub fn remove_track(&mut self, track_id: &TrackId) -> usize {
        let indices: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, track)| &track.id == track_id)
            .map(|(index, _)| index)
            .collect();

        // Highest first so earlier indices stay valid
        for &index in indices.iter().rev() {
            self.remove(index);
        }

        indices.len()
    }

    /// Replace every entry referring to `track.id` with the given metadata
    pub fn refresh_track(&mut self, track: &Track) {
        for entry in self.entries.iter_mut().filter(|entry| entry.id == track.id) {
            entry.clone_from(track);
        }
    }

    /// Replace the queue contents
    ///
    /// Position is clamped into the new contents.
    pub fn replace(&mut self, tracks: Vec<Track>, position: usize) {
        self.entries = tracks;
        self.position = if self.entries.is_empty() {
            0
        } else {
            position.min(self.entries.len() - 1)
        };
    }

    /// Clear the queue and reset the position
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = 0;
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the position to `index`
    ///
    /// Out-of-range indices are ignored.
    pub fn set_position(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.position = index;
            true
        } else {
            false
        }
    }

    /// Track at the current position
    pub fn current(&self) -> Option<&Track> {
        self.entries.get(self.position)
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.entries.get(index)
    }

    /// First index holding `track_id`
    pub fn index_of(&self, track_id: &TrackId) -> Option<usize> {
        self.entries.iter().position(|track| &track.id == track_id)
    }

    /// All entries in queue order
    pub fn tracks(&self) -> &[Track] {
        &self.entries
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
