//! Reading caption and transcript files from disk.
//!
//! This is the only place the crate touches the filesystem. Bytes are decoded
//! as UTF-8 (invalid sequences replaced) and a leading byte-order mark is
//! dropped before the text reaches a parser.

use crate::config::TrackKind;
use crate::error::{CueSyncError, Result};
use crate::subtitle::{parse_captions, strip_bom, CaptionTrack};
use crate::transcript::{parse_transcript, TranscriptTrack};
use std::path::Path;
use tracing::{debug, info};

/// A parsed file of either kind.
#[derive(Debug, Clone)]
pub enum LoadedTrack {
    Captions(CaptionTrack),
    Transcript(TranscriptTrack),
}

impl LoadedTrack {
    pub fn kind(&self) -> TrackKind {
        match self {
            LoadedTrack::Captions(_) => TrackKind::Captions,
            LoadedTrack::Transcript(_) => TrackKind::Transcript,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LoadedTrack::Captions(track) => track.len(),
            LoadedTrack::Transcript(track) => track.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guess the track kind from the file extension.
pub fn detect_kind(path: &Path) -> Option<TrackKind> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "srt" | "vtt" | "webvtt" => Some(TrackKind::Captions),
        "txt" | "md" | "transcript" => Some(TrackKind::Transcript),
        _ => None,
    }
}

/// Read a text file, tolerating invalid UTF-8 and a byte-order mark.
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CueSyncError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(strip_bom(&text).to_string())
}

pub fn load_captions(path: &Path) -> Result<CaptionTrack> {
    let track = parse_captions(&read_text(path)?);
    info!("Loaded {} captions from {}", track.len(), path.display());
    Ok(track)
}

pub fn load_transcript(path: &Path) -> Result<TranscriptTrack> {
    let track = parse_transcript(&read_text(path)?);
    info!(
        "Loaded {} transcript entries from {}",
        track.len(),
        path.display()
    );
    Ok(track)
}

/// Load `path` as `kind`, or as whatever its extension suggests.
pub fn load(path: &Path, kind: Option<TrackKind>) -> Result<LoadedTrack> {
    let kind = kind
        .or_else(|| detect_kind(path))
        .ok_or_else(|| CueSyncError::UnsupportedFormat(path.display().to_string()))?;

    match kind {
        TrackKind::Captions => load_captions(path).map(LoadedTrack::Captions),
        TrackKind::Transcript => load_transcript(path).map(LoadedTrack::Transcript),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(Path::new("movie.srt")), Some(TrackKind::Captions));
        assert_eq!(detect_kind(Path::new("movie.VTT")), Some(TrackKind::Captions));
        assert_eq!(detect_kind(Path::new("talk.txt")), Some(TrackKind::Transcript));
        assert_eq!(detect_kind(Path::new("movie.mp4")), None);
        assert_eq!(detect_kind(Path::new("no_extension")), None);
    }

    #[test]
    fn test_missing_file() {
        let result = read_text(&PathBuf::from("/nonexistent/cuesync/file.srt"));
        assert!(matches!(result, Err(CueSyncError::FileNotFound(_))));
    }

    #[test]
    fn test_unknown_extension_needs_kind() {
        let result = load(Path::new("/nonexistent/clip.mp4"), None);
        assert!(matches!(result, Err(CueSyncError::UnsupportedFormat(_))));
    }
}
