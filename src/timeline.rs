//! Resolving the active caption or transcript entry for a playback position.
//!
//! Lookups run on every position tick, so both are binary searches over the
//! track's time axis rather than scans.

use crate::subtitle::{CaptionEntry, CaptionTrack};
use crate::timestamp::TimeMs;
use crate::transcript::{TranscriptEntry, TranscriptTrack};

/// Tracks at or below this size are scanned linearly.
const LINEAR_SCAN_LIMIT: usize = 16;

/// The caption with `start <= position <= end`.
///
/// Overlapping captions resolve to the first match in track order.
pub fn active_caption(track: &CaptionTrack, position: TimeMs) -> Option<&CaptionEntry> {
    active_caption_index(track, position).and_then(|index| track.get(index))
}

/// Position within `track` of the caption [`active_caption`] returns.
pub fn active_caption_index(track: &CaptionTrack, position: TimeMs) -> Option<usize> {
    let entries = track.entries();
    if entries.len() <= LINEAR_SCAN_LIMIT || !track.is_sorted_by_start() {
        return entries
            .iter()
            .position(|entry| entry.start <= position && position <= entry.end);
    }

    // Entries [..started] have start <= position. The running maximum of end
    // times first reaches `position` exactly at the first entry whose own end
    // does, so that entry is the first match in track order.
    let started = entries.partition_point(|entry| entry.start <= position);
    let first_open = track.max_end().partition_point(|&end| end < position);
    (first_open < started).then_some(first_open)
}

/// Index and entry with the largest `timestamp <= position`.
///
/// Among entries sharing that timestamp the last one wins. Returns `None`
/// before the first entry.
pub fn active_transcript(
    track: &TranscriptTrack,
    position: TimeMs,
) -> Option<(usize, &TranscriptEntry)> {
    let index = active_index(track, position)?;
    track.get(index).map(|entry| (index, entry))
}

/// Position of the active transcript entry, `None` before the first entry.
pub fn active_index(track: &TranscriptTrack, position: TimeMs) -> Option<usize> {
    track
        .entries()
        .partition_point(|entry| entry.timestamp <= position)
        .checked_sub(1)
}

/// A change of active entry between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// An entry became active (possibly replacing another one).
    Entered(usize),
    /// The previously active entry ended and nothing replaced it.
    Cleared,
}

/// Remembers the last active index and reports only changes, so the host can
/// redraw or scroll once per change instead of on every tick.
#[derive(Debug, Clone, Default)]
pub struct ActiveTracker {
    current: Option<usize>,
}

impl ActiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn update(&mut self, active: Option<usize>) -> Option<Transition> {
        if active == self.current {
            return None;
        }
        self.current = active;
        Some(match active {
            Some(index) => Transition::Entered(index),
            None => Transition::Cleared,
        })
    }

    /// Forget the last index, e.g. after a track reload.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
