pub mod config;
pub mod control;
pub mod error;
pub mod loader;
pub mod session;
pub mod subtitle;
pub mod timeline;
pub mod timestamp;
pub mod transcript;

pub use config::Config;
pub use error::{CueSyncError, Result};
pub use session::{print_summary, SessionStats, SyncSession, TickUpdate};
pub use subtitle::{parse_captions, CaptionEntry, CaptionTrack};
pub use timeline::{active_caption, active_index, active_transcript};
pub use timestamp::{format_timestamp, parse_timestamp, TimeMs};
pub use transcript::{parse_transcript, TranscriptEntry, TranscriptTrack};
