//! Next/previous resolution
//!
//! Pure index arithmetic over an active sequence (the play queue when it
//! has entries, the library otherwise). The transport supplies the
//! sequence length and the index of the entry it currently refers to;
//! these functions never touch tracks or the backend.

use crate::types::RepeatMode;
use rand::seq::SliceRandom;
use rand::Rng;

/// Outcome of resolving "next"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Replay the current track without moving the position
    ReplayCurrent,

    /// Play the entry at this index
    Advance(usize),

    /// Nothing to advance to; playback does not change
    Stop,
}

/// Resolve the next index
///
/// * `len` - length of the active sequence
/// * `current` - index the transport refers to (`None` when nothing has
///   been played from this sequence, in which case sequential playback
///   starts at index 0)
///
/// Rules, in order:
/// 1. Empty sequence: stop.
/// 2. Repeat one: replay the current track.
/// 3. Shuffle: uniform pick among indices other than `current`. With no
///    other index, repeat all replays index 0, otherwise stop.
/// 4. Sequential: `current + 1`; past the end, repeat all wraps to 0,
///    otherwise stop.
pub fn resolve_next<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> NextStep {
    if len == 0 {
        return NextStep::Stop;
    }

    if repeat == RepeatMode::One {
        return NextStep::ReplayCurrent;
    }

    if shuffle {
        let candidates: Vec<usize> = (0..len).filter(|&index| Some(index) != current).collect();
        return match candidates.choose(rng) {
            Some(&index) => NextStep::Advance(index),
            None if repeat == RepeatMode::All => NextStep::Advance(0),
            None => NextStep::Stop,
        };
    }

    let next = current.map_or(0, |index| index + 1);
    if next < len {
        NextStep::Advance(next)
    } else if repeat == RepeatMode::All {
        NextStep::Advance(0)
    } else {
        NextStep::Stop
    }
}

/// Resolve the previous index
///
/// Always cycles: index 0 (or no index) wraps to the last entry,
/// independent of repeat mode. Returns `None` only for an empty sequence.
pub fn resolve_previous(len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        Some(index) if index > 0 && index < len => Some(index - 1),
        _ => Some(len - 1),
    }
}
