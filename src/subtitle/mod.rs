pub mod json;
pub mod srt;
pub mod vtt;

use crate::config::OutputFormat;
use crate::timestamp::TimeMs;
use tracing::debug;

/// Marker separating the two timestamps of a cue timing line.
pub(crate) const ARROW: &str = "-->";

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    pub sequence_index: usize,
    pub start: TimeMs,
    pub end: TimeMs,
    pub text: String,
}

/// Immutable, source-ordered list of captions with a precomputed lookup index.
#[derive(Debug, Clone, Default)]
pub struct CaptionTrack {
    entries: Vec<CaptionEntry>,
    /// `max_end[i]` is the largest end time among `entries[..=i]`.
    max_end: Vec<TimeMs>,
    sorted_by_start: bool,
}

impl CaptionTrack {
    pub fn new(entries: Vec<CaptionEntry>) -> Self {
        let sorted_by_start = entries.windows(2).all(|w| w[0].start <= w[1].start);
        let max_end = entries
            .iter()
            .scan(0, |max, entry| {
                *max = entry.end.max(*max);
                Some(*max)
            })
            .collect();

        Self {
            entries,
            max_end,
            sorted_by_start,
        }
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CaptionEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest end time in the track.
    pub fn end_time(&self) -> Option<TimeMs> {
        self.max_end.last().copied()
    }

    /// Caption shown at `position`, see [`crate::timeline::active_caption`].
    pub fn active_at(&self, position: TimeMs) -> Option<&CaptionEntry> {
        crate::timeline::active_caption(self, position)
    }

    pub(crate) fn max_end(&self) -> &[TimeMs] {
        &self.max_end
    }

    pub(crate) fn is_sorted_by_start(&self) -> bool {
        self.sorted_by_start
    }
}

impl<'a> IntoIterator for &'a CaptionTrack {
    type Item = &'a CaptionEntry;
    type IntoIter = std::slice::Iter<'a, CaptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    Srt,
    WebVtt,
}

impl CaptionFormat {
    /// WebVTT when the buffer starts with the `WEBVTT` marker, SRT otherwise.
    pub fn detect(text: &str) -> Self {
        if strip_bom(text).trim_start().starts_with("WEBVTT") {
            CaptionFormat::WebVtt
        } else {
            CaptionFormat::Srt
        }
    }
}

impl std::fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFormat::Srt => write!(f, "srt"),
            CaptionFormat::WebVtt => write!(f, "webvtt"),
        }
    }
}

/// Parse SRT or WebVTT text into a caption track.
///
/// Never fails: malformed records are dropped and whatever parsed cleanly is
/// returned, possibly an empty track.
pub fn parse_captions(text: &str) -> CaptionTrack {
    let text = strip_bom(text);
    let format = CaptionFormat::detect(text);
    let entries = match format {
        CaptionFormat::Srt => srt::parse(text),
        CaptionFormat::WebVtt => vtt::parse(text),
    };
    debug!("Parsed {} {} captions", entries.len(), format);
    CaptionTrack::new(entries)
}

pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// A cue whose timing line has been read and whose text is still being collected.
#[derive(Debug)]
pub(crate) struct PendingCue {
    index: usize,
    start: TimeMs,
    end: TimeMs,
    lines: Vec<String>,
}

impl PendingCue {
    pub(crate) fn new(index: usize, (start, end): (TimeMs, TimeMs)) -> Self {
        Self {
            index,
            start,
            end,
            lines: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Emit the cue into `entries` if it has text and a well-ordered range.
    pub(crate) fn finish_into(self, entries: &mut Vec<CaptionEntry>) {
        if self.lines.is_empty() {
            debug!("Dropping cue {}: no text", self.index);
            return;
        }
        if self.end < self.start {
            debug!(
                "Dropping cue {}: ends at {}ms before it starts at {}ms",
                self.index, self.end, self.start
            );
            return;
        }
        entries.push(CaptionEntry {
            sequence_index: self.index,
            start: self.start,
            end: self.end,
            text: self.lines.join("\n"),
        });
    }
}

pub trait SubtitleFormatter {
    fn format(&self, entries: &[CaptionEntry]) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn SubtitleFormatter> {
    match format {
        OutputFormat::Srt => Box::new(srt::SrtFormatter),
        OutputFormat::Vtt => Box::new(vtt::VttFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, start: TimeMs, end: TimeMs) -> CaptionEntry {
        CaptionEntry {
            sequence_index: index,
            start,
            end,
            text: format!("cue {}", index),
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(CaptionFormat::detect("WEBVTT\n\n"), CaptionFormat::WebVtt);
        assert_eq!(
            CaptionFormat::detect("\u{feff}  WEBVTT - title\n"),
            CaptionFormat::WebVtt
        );
        assert_eq!(CaptionFormat::detect("1\n00:00:01,000 --> 00:00:02,000\nHi"), CaptionFormat::Srt);
        assert_eq!(CaptionFormat::detect(""), CaptionFormat::Srt);
    }

    #[test]
    fn test_track_index_is_built() {
        let track = CaptionTrack::new(vec![entry(1, 0, 5000), entry(2, 1000, 2000), entry(3, 6000, 7000)]);
        assert!(track.is_sorted_by_start());
        assert_eq!(track.max_end(), &[5000, 5000, 7000]);
        assert_eq!(track.end_time(), Some(7000));
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_unsorted_track_is_flagged() {
        let track = CaptionTrack::new(vec![entry(1, 5000, 6000), entry(2, 1000, 2000)]);
        assert!(!track.is_sorted_by_start());
    }

    #[test]
    fn test_pending_cue_drops_inverted_range() {
        let mut entries = Vec::new();
        let mut cue = PendingCue::new(1, (4000, 1000));
        cue.push_line("backwards");
        cue.finish_into(&mut entries);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_pending_cue_drops_empty_text() {
        let mut entries = Vec::new();
        PendingCue::new(1, (0, 1000)).finish_into(&mut entries);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_pending_cue_joins_lines() {
        let mut entries = Vec::new();
        let mut cue = PendingCue::new(7, (1000, 1000));
        cue.push_line("first");
        cue.push_line("second");
        cue.finish_into(&mut entries);
        assert_eq!(entries[0].text, "first\nsecond");
        assert_eq!(entries[0].sequence_index, 7);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_captions("").is_empty());
        assert!(parse_captions("WEBVTT\n").is_empty());
    }
}
