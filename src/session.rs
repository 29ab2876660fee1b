use crate::loader::LoadedTrack;
use crate::subtitle::{CaptionEntry, CaptionTrack};
use crate::timeline::{active_caption_index, active_index, ActiveTracker, Transition};
use crate::timestamp::{format_timestamp, TimeMs};
use crate::transcript::{TranscriptEntry, TranscriptTrack};
use tracing::debug;

/// What changed on one clock tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickUpdate {
    pub caption: Option<Transition>,
    pub transcript: Option<Transition>,
}

impl TickUpdate {
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.transcript.is_none()
    }
}

/// Statistics gathered while driving a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub caption_changes: u64,
    pub transcript_changes: u64,
}

/// The tracks currently loaded for one media item, and which of their
/// entries are on screen.
///
/// The host calls [`SyncSession::tick`] with the playback position on every
/// clock update and redraws only when the returned update is non-empty.
#[derive(Debug, Default)]
pub struct SyncSession {
    captions: Option<CaptionTrack>,
    transcript: Option<TranscriptTrack>,
    caption_tracker: ActiveTracker,
    transcript_tracker: ActiveTracker,
    position: TimeMs,
    stats: SessionStats,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(track: LoadedTrack) -> Self {
        let mut session = Self::new();
        session.load(track);
        session
    }

    /// Replace the track of the same kind.
    pub fn load(&mut self, track: LoadedTrack) {
        match track {
            LoadedTrack::Captions(track) => self.set_captions(track),
            LoadedTrack::Transcript(track) => self.set_transcript(track),
        }
    }

    pub fn set_captions(&mut self, track: CaptionTrack) {
        debug!("Caption track replaced ({} entries)", track.len());
        self.captions = Some(track);
        self.caption_tracker.reset();
    }

    pub fn set_transcript(&mut self, track: TranscriptTrack) {
        debug!("Transcript replaced ({} entries)", track.len());
        self.transcript = Some(track);
        self.transcript_tracker.reset();
    }

    pub fn clear_captions(&mut self) {
        self.captions = None;
        self.caption_tracker.reset();
    }

    pub fn clear_transcript(&mut self) {
        self.transcript = None;
        self.transcript_tracker.reset();
    }

    pub fn captions(&self) -> Option<&CaptionTrack> {
        self.captions.as_ref()
    }

    pub fn transcript(&self) -> Option<&TranscriptTrack> {
        self.transcript.as_ref()
    }

    pub fn position(&self) -> TimeMs {
        self.position
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Latest time covered by any loaded track.
    pub fn end_time(&self) -> Option<TimeMs> {
        let caption_end = self.captions.as_ref().and_then(|t| t.end_time());
        let transcript_end = self
            .transcript
            .as_ref()
            .and_then(|t| t.entries().last())
            .map(|e| e.timestamp);
        caption_end.max(transcript_end)
    }

    /// Advance to `position` and report which active entries changed.
    ///
    /// Positions may move backwards (seeks); the resolution is stateless,
    /// only change detection remembers the previous tick.
    pub fn tick(&mut self, position: TimeMs) -> TickUpdate {
        self.position = position;
        self.stats.ticks += 1;

        let caption = self
            .captions
            .as_ref()
            .and_then(|track| self.caption_tracker.update(active_caption_index(track, position)));
        let transcript = self
            .transcript
            .as_ref()
            .and_then(|track| self.transcript_tracker.update(active_index(track, position)));

        if caption.is_some() {
            self.stats.caption_changes += 1;
        }
        if transcript.is_some() {
            self.stats.transcript_changes += 1;
        }
        if caption.is_some() || transcript.is_some() {
            debug!(
                "Tick {}: caption {:?}, transcript {:?}",
                format_timestamp(position),
                caption,
                transcript
            );
        }

        TickUpdate {
            caption,
            transcript,
        }
    }

    pub fn current_caption(&self) -> Option<&CaptionEntry> {
        let index = self.caption_tracker.current()?;
        self.captions.as_ref()?.get(index)
    }

    pub fn current_transcript(&self) -> Option<(usize, &TranscriptEntry)> {
        let index = self.transcript_tracker.current()?;
        let entry = self.transcript.as_ref()?.get(index)?;
        Some((index, entry))
    }
}

/// Print a short summary of a finished session.
pub fn print_summary(session: &SyncSession) {
    let stats = session.stats();
    println!();
    println!("Ticks:               {}", stats.ticks);
    println!("Final position:      {}", format_timestamp(session.position()));
    if let Some(track) = session.captions() {
        println!("Captions:            {}", track.len());
        println!("Caption changes:     {}", stats.caption_changes);
    }
    if let Some(track) = session.transcript() {
        println!("Transcript entries:  {}", track.len());
        println!("Transcript changes:  {}", stats.transcript_changes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::parse_captions;
    use crate::transcript::parse_transcript;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nOne\n\n2\n00:00:03,000 --> 00:00:04,000\nTwo\n";

    #[test]
    fn test_tick_reports_caption_changes() {
        let mut session = SyncSession::with_track(LoadedTrack::Captions(parse_captions(SRT)));

        assert!(session.tick(0).is_empty());
        assert_eq!(session.tick(1_000).caption, Some(Transition::Entered(0)));
        assert!(session.tick(1_500).is_empty());
        assert_eq!(session.current_caption().map(|c| c.text.as_str()), Some("One"));
        assert_eq!(session.tick(2_500).caption, Some(Transition::Cleared));
        assert_eq!(session.tick(3_000).caption, Some(Transition::Entered(1)));

        let stats = session.stats();
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.caption_changes, 3);
    }

    #[test]
    fn test_seek_backwards() {
        let mut session = SyncSession::new();
        session.set_transcript(parse_transcript("[00:01] a\n[00:05] b\n"));

        assert_eq!(session.tick(6_000).transcript, Some(Transition::Entered(1)));
        assert_eq!(session.tick(2_000).transcript, Some(Transition::Entered(0)));
        assert_eq!(session.tick(0).transcript, Some(Transition::Cleared));
        assert_eq!(session.current_transcript(), None);
    }

    #[test]
    fn test_both_tracks() {
        let mut session = SyncSession::new();
        session.set_captions(parse_captions(SRT));
        session.set_transcript(parse_transcript("[00:00] intro\n[00:03] topic\n"));

        let update = session.tick(3_500);
        assert_eq!(update.caption, Some(Transition::Entered(1)));
        assert_eq!(update.transcript, Some(Transition::Entered(1)));
        assert_eq!(session.current_transcript().map(|(_, e)| e.text.as_str()), Some("topic"));
        assert_eq!(session.end_time(), Some(4_000));
    }

    #[test]
    fn test_reload_resets_tracker() {
        let mut session = SyncSession::with_track(LoadedTrack::Captions(parse_captions(SRT)));
        session.tick(1_000);
        session.set_captions(parse_captions(SRT));
        assert_eq!(session.current_caption(), None);
        assert_eq!(session.tick(1_000).caption, Some(Transition::Entered(0)));

        session.clear_captions();
        assert!(session.captions().is_none());
        assert!(session.tick(1_000).is_empty());
    }
}
