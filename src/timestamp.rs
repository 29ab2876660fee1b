//! Time literal parsing and formatting shared by captions and transcripts.
//!
//! Parsing is lenient at the field level: a numeric group that fails to parse
//! counts as zero instead of rejecting the literal. Only the caller decides
//! whether a line is structurally a timestamp at all.

/// Milliseconds since content start.
pub type TimeMs = u64;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Fractional separator used by SRT (`00:00:01,500`).
pub const SRT_SEPARATOR: char = ',';
/// Fractional separator used by WebVTT (`00:00:01.500`).
pub const VTT_SEPARATOR: char = '.';

/// Parse `HH:MM:SS<sep>mmm`, `MM:SS<sep>mmm`, `HH:MM:SS` or `MM:SS` into milliseconds.
///
/// The rightmost group is milliseconds only when `separator` is present,
/// otherwise it is whole seconds.
pub fn parse_timestamp(literal: &str, separator: char) -> TimeMs {
    let literal = literal.trim();

    let (clock, millis) = match literal.rsplit_once(separator) {
        Some((clock, fraction)) => (clock, parse_field(fraction)),
        None => (literal, 0),
    };

    let mut groups = clock.rsplit(':');
    let seconds = groups.next().map(parse_field).unwrap_or(0);
    let minutes = groups.next().map(parse_field).unwrap_or(0);
    let hours = groups.next().map(parse_field).unwrap_or(0);

    hours
        .saturating_mul(MS_PER_HOUR)
        .saturating_add(minutes.saturating_mul(MS_PER_MINUTE))
        .saturating_add(seconds.saturating_mul(MS_PER_SECOND))
        .saturating_add(millis)
}

fn parse_field(field: &str) -> u64 {
    field.trim().parse().unwrap_or(0)
}

/// Split a cue timing line on `-->` and parse both sides.
///
/// Returns `None` only when the line has no `-->` at all. Anything after the
/// end timestamp (WebVTT cue settings such as `align:start`) is ignored.
pub fn parse_time_range(line: &str, separator: char) -> Option<(TimeMs, TimeMs)> {
    let (start, end) = line.split_once("-->")?;
    let end = end.split_whitespace().next().unwrap_or("");
    Some((parse_timestamp(start, separator), parse_timestamp(end, separator)))
}

/// Canonical display form: `HH:MM:SS[.mmm]` from one hour up, `MM:SS[.mmm]` below.
///
/// Milliseconds are printed only when non-zero.
pub fn format_timestamp(t: TimeMs) -> String {
    let (hours, minutes, seconds, millis) = split(t);

    let mut out = if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    };
    if millis > 0 {
        out.push_str(&format!("{}{:03}", VTT_SEPARATOR, millis));
    }
    out
}

/// Fixed-width SRT form, `HH:MM:SS,mmm`.
pub fn format_srt_timestamp(t: TimeMs) -> String {
    format_full(t, SRT_SEPARATOR)
}

/// Fixed-width WebVTT form, `HH:MM:SS.mmm`.
pub fn format_vtt_timestamp(t: TimeMs) -> String {
    format_full(t, VTT_SEPARATOR)
}

fn format_full(t: TimeMs, separator: char) -> String {
    let (hours, minutes, seconds, millis) = split(t);
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, seconds, separator, millis
    )
}

fn split(t: TimeMs) -> (u64, u64, u64, u64) {
    (
        t / MS_PER_HOUR,
        (t % MS_PER_HOUR) / MS_PER_MINUTE,
        (t % MS_PER_MINUTE) / MS_PER_SECOND,
        t % MS_PER_SECOND,
    )
}

/// Parse a playback position typed by a user.
///
/// A bare integer is milliseconds; anything with a `:` is a timestamp literal
/// using either `,` or `.` for the fraction.
pub fn parse_position(text: &str) -> Option<TimeMs> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        return text.parse().ok();
    }
    if text.contains(':') {
        let separator = if text.contains(SRT_SEPARATOR) {
            SRT_SEPARATOR
        } else {
            VTT_SEPARATOR
        };
        return Some(parse_timestamp(text, separator));
    }
    None
}
