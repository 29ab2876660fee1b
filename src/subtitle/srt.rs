// SRT subtitle format
use super::{CaptionEntry, PendingCue, SubtitleFormatter, ARROW};
use crate::timestamp::{format_srt_timestamp, parse_time_range, SRT_SEPARATOR};
use tracing::debug;

#[derive(Debug)]
enum State {
    AwaitingIndex,
    AwaitingTimeRange { index: usize },
    AwaitingText(PendingCue),
    /// Rest of a malformed block, up to the next blank line.
    Skipping,
}

/// Parse SRT text. Records without a numeric index line are skipped.
pub fn parse(text: &str) -> Vec<CaptionEntry> {
    let mut entries = Vec::new();
    let mut state = State::AwaitingIndex;
    let mut lines = text.lines().map(str::trim).peekable();

    while let Some(line) = lines.next() {
        // An index directly followed by a timing line starts a record even
        // when the blank separator before it is missing.
        let starts_record = lines.peek().is_some_and(|next| next.contains(ARROW))
            && parse_index(line).is_some();

        state = match state {
            State::AwaitingIndex => {
                if line.is_empty() {
                    State::AwaitingIndex
                } else if let Some(index) = parse_index(line) {
                    State::AwaitingTimeRange { index }
                } else {
                    debug!("Skipping SRT block without index: {:?}", line);
                    State::Skipping
                }
            }
            State::AwaitingTimeRange { index } => {
                if line.is_empty() {
                    debug!("Dropping SRT record {}: no timing line", index);
                    State::AwaitingIndex
                } else if let Some(range) = parse_time_range(line, SRT_SEPARATOR) {
                    State::AwaitingText(PendingCue::new(index, range))
                } else {
                    debug!("Dropping SRT record {}: bad timing line {:?}", index, line);
                    State::Skipping
                }
            }
            State::AwaitingText(mut cue) => {
                if line.is_empty() {
                    cue.finish_into(&mut entries);
                    State::AwaitingIndex
                } else if line.contains(ARROW) {
                    cue.finish_into(&mut entries);
                    debug!("Skipping SRT timing line without index: {:?}", line);
                    State::Skipping
                } else if starts_record {
                    cue.finish_into(&mut entries);
                    next_record(line)
                } else {
                    cue.push_line(line);
                    State::AwaitingText(cue)
                }
            }
            State::Skipping => {
                if line.is_empty() {
                    State::AwaitingIndex
                } else if starts_record {
                    next_record(line)
                } else {
                    State::Skipping
                }
            }
        };
    }

    match state {
        State::AwaitingText(cue) => cue.finish_into(&mut entries),
        State::AwaitingIndex | State::AwaitingTimeRange { .. } | State::Skipping => {}
    }

    entries
}

fn next_record(line: &str) -> State {
    match parse_index(line) {
        Some(index) => State::AwaitingTimeRange { index },
        None => State::Skipping,
    }
}

fn parse_index(line: &str) -> Option<usize> {
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    line.parse().ok()
}

pub struct SrtFormatter;

impl SubtitleFormatter for SrtFormatter {
    fn format(&self, entries: &[CaptionEntry]) -> String {
        entries
            .iter()
            .map(|entry| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    entry.sequence_index,
                    format_srt_timestamp(entry.start),
                    format_srt_timestamp(entry.end),
                    entry.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn extension(&self) -> &'static str {
        "srt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,500 --> 00:00:04,000\nHello world\n\n2\n00:00:05,000 --> 00:00:06,200\nSecond line\n";

    #[test]
    fn test_parse_basic() {
        let entries = parse(SAMPLE);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            CaptionEntry {
                sequence_index: 1,
                start: 1500,
                end: 4000,
                text: "Hello world".to_string(),
            }
        );
        assert_eq!(entries[1].sequence_index, 2);
        assert_eq!(entries[1].start, 5000);
        assert_eq!(entries[1].end, 6200);
        assert_eq!(entries[1].text, "Second line");
    }

    #[test]
    fn test_last_record_without_trailing_blank() {
        let entries = parse("1\n00:00:01,000 --> 00:00:02,000\nOnly one");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Only one");
    }

    #[test]
    fn test_multiline_text_and_crlf() {
        let entries = parse("1\r\n00:00:01,000 --> 00:00:02,000\r\nLine one\r\nLine two\r\n\r\n");
        assert_eq!(entries[0].text, "Line one\nLine two");
    }

    #[test]
    fn test_missing_index_is_skipped() {
        let input = "00:00:01,000 --> 00:00:02,000\nOrphan\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence_index, 2);
        assert_eq!(entries[0].text, "Kept");
    }

    #[test]
    fn test_record_without_text_is_dropped() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence_index, 2);
    }

    #[test]
    fn test_bad_timing_line_drops_record_only() {
        let input = "1\nnot a timing line\nLost\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Kept");
    }

    #[test]
    fn test_inverted_range_is_dropped() {
        let input = "1\n00:00:05,000 --> 00:00:01,000\nBackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nForwards\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Forwards");
    }

    #[test]
    fn test_bad_field_defaults_to_zero() {
        let entries = parse("1\n00:00:xx,500 --> 00:00:04,000\nLenient\n");
        assert_eq!(entries[0].start, 500);
        assert_eq!(entries[0].end, 4000);
    }

    #[test]
    fn test_missing_blank_separator_is_recovered() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nFirst\n2\n00:00:03,000 --> 00:00:04,000\nSecond\n";
        let entries = parse(input);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "First");
        assert_eq!(entries[1].sequence_index, 2);
    }

    #[test]
    fn test_numeric_text_line_is_kept() {
        let entries = parse("1\n00:00:01,000 --> 00:00:02,000\nThe year was\n1984\n");
        assert_eq!(entries[0].text, "The year was\n1984");
    }

    #[test]
    fn test_source_order_is_preserved() {
        let input = "3\n00:00:05,000 --> 00:00:06,000\nC\n\n1\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n";
        let indices: Vec<usize> = parse(input).iter().map(|e| e.sequence_index).collect();
        assert_eq!(indices, vec![3, 1, 2]);
    }

    #[test]
    fn test_srt_format() {
        let formatter = SrtFormatter;
        let output = formatter.format(&parse(SAMPLE));

        assert!(output.contains("1\n00:00:01,500 --> 00:00:04,000\nHello world"));
        assert!(output.contains("2\n00:00:05,000 --> 00:00:06,200\nSecond line"));
        assert_eq!(parse(&output), parse(SAMPLE));
    }
}
