//! Bracket-timestamped transcripts.
//!
//! Each meaningful line starts with a timestamp in square brackets followed by
//! free text:
//!
//! ```text
//! [00:01:23.500] Chapter two begins
//! [01:30] Short form without hours
//! ```
//!
//! Lines without a recognizable timestamp are annotations and are dropped.

use crate::timestamp::TimeMs;
use regex::{Captures, Regex};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub timestamp: TimeMs,
    pub text: String,
    pub original_line: String,
    /// 1-based line number in the source text.
    pub line_number: usize,
}

/// Transcript entries sorted by timestamp. Lines sharing a timestamp keep
/// their source order.
#[derive(Debug, Clone, Default)]
pub struct TranscriptTrack {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptTrack {
    pub fn new(mut entries: Vec<TranscriptEntry>) -> Self {
        entries.sort_by_key(|entry| entry.timestamp);
        Self { entries }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TranscriptEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position to seek to when the user jumps to entry `index`.
    pub fn seek_target(&self, index: usize) -> Option<TimeMs> {
        self.get(index).map(|entry| entry.timestamp)
    }

    pub fn active_at(&self, position: TimeMs) -> Option<(usize, &TranscriptEntry)> {
        crate::timeline::active_transcript(self, position)
    }
}

impl<'a> IntoIterator for &'a TranscriptTrack {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Accepted bracket forms, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimestampShape {
    /// `[HH:MM:SS.mmm]`
    HoursWithMillis,
    /// `[HH:MM:SS]`
    Hours,
    /// `[MM:SS.mmm]`
    MinutesWithMillis,
    /// `[MM:SS]`
    Minutes,
}

impl TimestampShape {
    const ALL: [TimestampShape; 4] = [
        TimestampShape::HoursWithMillis,
        TimestampShape::Hours,
        TimestampShape::MinutesWithMillis,
        TimestampShape::Minutes,
    ];

    fn pattern(self) -> &'static str {
        match self {
            TimestampShape::HoursWithMillis => {
                r"^\[(\d{1,2}):(\d{2}):(\d{2})[.,](\d{1,3})\]\s*(.*)$"
            }
            TimestampShape::Hours => r"^\[(\d{1,2}):(\d{2}):(\d{2})\]\s*(.*)$",
            TimestampShape::MinutesWithMillis => r"^\[(\d{1,3}):(\d{2})[.,](\d{1,3})\]\s*(.*)$",
            TimestampShape::Minutes => r"^\[(\d{1,3}):(\d{2})\]\s*(.*)$",
        }
    }

    /// Returns the timestamp and the capture group index holding the text.
    fn decode(self, caps: &Captures<'_>) -> (TimeMs, usize) {
        let field = |i: usize| -> u64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };

        match self {
            TimestampShape::HoursWithMillis => {
                (hms(field(1), field(2), field(3)).saturating_add(field(4)), 5)
            }
            TimestampShape::Hours => (hms(field(1), field(2), field(3)), 4),
            TimestampShape::MinutesWithMillis => {
                (hms(0, field(1), field(2)).saturating_add(field(3)), 4)
            }
            TimestampShape::Minutes => (hms(0, field(1), field(2)), 3),
        }
    }
}

fn hms(hours: u64, minutes: u64, seconds: u64) -> TimeMs {
    hours
        .saturating_mul(3_600_000)
        .saturating_add(minutes.saturating_mul(60_000))
        .saturating_add(seconds.saturating_mul(1_000))
}

/// Reusable transcript parser; holds the compiled timestamp patterns.
pub struct TranscriptParser {
    patterns: Vec<(TimestampShape, Regex)>,
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser {
    pub fn new() -> Self {
        let patterns = TimestampShape::ALL
            .iter()
            .map(|&shape| (shape, Regex::new(shape.pattern()).expect("Invalid regex")))
            .collect();
        Self { patterns }
    }

    pub fn parse(&self, text: &str) -> TranscriptTrack {
        let mut entries = Vec::new();
        let mut dropped = 0;

        for (i, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_line(trimmed) {
                Some((timestamp, text)) => entries.push(TranscriptEntry {
                    timestamp,
                    text,
                    original_line: line.to_string(),
                    line_number: i + 1,
                }),
                None => dropped += 1,
            }
        }

        debug!(
            "Parsed {} transcript entries ({} annotation lines ignored)",
            entries.len(),
            dropped
        );
        TranscriptTrack::new(entries)
    }

    fn parse_line(&self, line: &str) -> Option<(TimeMs, String)> {
        self.patterns.iter().find_map(|(shape, regex)| {
            let caps = regex.captures(line)?;
            let (timestamp, text_group) = shape.decode(&caps);
            let text = caps
                .get(text_group)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            Some((timestamp, text))
        })
    }
}

/// Parse a transcript with a one-off [`TranscriptParser`].
pub fn parse_transcript(text: &str) -> TranscriptTrack {
    TranscriptParser::new().parse(text)
}
