// WebVTT subtitle format
use super::{CaptionEntry, PendingCue, SubtitleFormatter, ARROW};
use crate::timestamp::{format_vtt_timestamp, parse_time_range, VTT_SEPARATOR};
use tracing::debug;

/// Blocks that carry no cue text.
const SKIPPED_BLOCKS: [&str; 3] = ["NOTE", "STYLE", "REGION"];

#[derive(Debug)]
enum State {
    /// The `WEBVTT` line and any header metadata up to the first blank line.
    Header,
    AwaitingCue,
    /// A cue identifier was read; its timing line must follow.
    AwaitingTimeRange,
    AwaitingText(PendingCue),
    SkippingBlock,
}

/// Parse WebVTT text.
///
/// Cues are numbered by the order of their timing lines, starting at 1. Lines
/// containing `-->` always start a new cue and are never treated as text.
pub fn parse(text: &str) -> Vec<CaptionEntry> {
    let mut entries = Vec::new();
    let mut state = State::Header;
    let mut cue_count = 0;

    for line in text.lines().map(str::trim) {
        if line.contains(ARROW) {
            if let State::AwaitingText(cue) = state {
                cue.finish_into(&mut entries);
            }
            cue_count += 1;
            state = start_cue(line, cue_count);
            continue;
        }

        state = match state {
            State::Header => {
                if line.is_empty() {
                    State::AwaitingCue
                } else {
                    State::Header
                }
            }
            State::AwaitingCue => {
                if line.is_empty() {
                    State::AwaitingCue
                } else if is_skipped_block(line) {
                    State::SkippingBlock
                } else {
                    State::AwaitingTimeRange
                }
            }
            State::AwaitingTimeRange => {
                if line.is_empty() {
                    State::AwaitingCue
                } else {
                    debug!("Skipping WebVTT block without timing line at {:?}", line);
                    State::SkippingBlock
                }
            }
            State::AwaitingText(mut cue) => {
                if line.is_empty() {
                    cue.finish_into(&mut entries);
                    State::AwaitingCue
                } else {
                    cue.push_line(line);
                    State::AwaitingText(cue)
                }
            }
            State::SkippingBlock => {
                if line.is_empty() {
                    State::AwaitingCue
                } else {
                    State::SkippingBlock
                }
            }
        };
    }

    match state {
        State::AwaitingText(cue) => cue.finish_into(&mut entries),
        State::Header | State::AwaitingCue | State::AwaitingTimeRange | State::SkippingBlock => {}
    }

    entries
}

fn start_cue(line: &str, index: usize) -> State {
    match parse_time_range(line, VTT_SEPARATOR) {
        Some(range) => State::AwaitingText(PendingCue::new(index, range)),
        None => State::SkippingBlock,
    }
}

fn is_skipped_block(line: &str) -> bool {
    SKIPPED_BLOCKS.iter().any(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

pub struct VttFormatter;

impl SubtitleFormatter for VttFormatter {
    fn format(&self, entries: &[CaptionEntry]) -> String {
        let mut output = String::from("WEBVTT\n\n");

        for entry in entries {
            output.push_str(&format!(
                "{} --> {}\n{}\n\n",
                format_vtt_timestamp(entry.start),
                format_vtt_timestamp(entry.end),
                entry.text
            ));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "vtt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let input = "WEBVTT\n\n00:00:01.500 --> 00:00:04.000\nHello world\n\n00:05.000 --> 00:06.200\nSecond line\n";
        let entries = parse(input);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sequence_index, 1);
        assert_eq!(entries[0].start, 1500);
        assert_eq!(entries[0].end, 4000);
        assert_eq!(entries[1].sequence_index, 2);
        assert_eq!(entries[1].start, 5000);
        assert_eq!(entries[1].text, "Second line");
    }

    #[test]
    fn test_header_metadata_is_skipped() {
        let input = "WEBVTT - Sample\nKind: captions\nLanguage: en\n\n00:01.000 --> 00:02.000\nText\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Text");
    }

    #[test]
    fn test_cue_identifier_and_settings() {
        let input = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:02.000 align:start position:10%\n<v Roger>Hi there\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].end, 2000);
        assert_eq!(entries[0].text, "<v Roger>Hi there");
    }

    #[test]
    fn test_note_and_style_blocks_are_skipped() {
        let input = "WEBVTT\n\nNOTE this is a comment\nspanning lines\n\nSTYLE\n::cue { color: red }\n\n00:01.000 --> 00:02.000\nVisible\n\nNOTES are text here\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Visible");
    }

    #[test]
    fn test_arrow_line_starts_new_cue() {
        let input = "WEBVTT\n\n00:01.000 --> 00:02.000\nFirst\n00:03.000 --> 00:04.000\nSecond\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "First");
        assert_eq!(entries[1].text, "Second");
        assert_eq!(entries[1].sequence_index, 2);
    }

    #[test]
    fn test_identifier_without_timing_is_skipped() {
        let input = "WEBVTT\n\nlonely-id\nno timing here\n\n00:01.000 --> 00:02.000\nKept\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Kept");
    }

    #[test]
    fn test_dropped_cue_still_counts() {
        let input = "WEBVTT\n\n00:01.000 --> 00:02.000\n\n00:03.000 --> 00:04.000\nSecond\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence_index, 2);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_vtt_timestamp(1500), "00:00:01.500");
    }

    #[test]
    fn test_vtt_format() {
        let entries = vec![CaptionEntry {
            sequence_index: 1,
            start: 1500,
            end: 4000,
            text: "Hello, world!".to_string(),
        }];

        let formatter = VttFormatter;
        let output = formatter.format(&entries);

        assert!(output.starts_with("WEBVTT\n\n"));
        assert!(output.contains("00:00:01.500 --> 00:00:04.000"));
        assert_eq!(parse(&output), entries);
    }
}
