// JSON caption export
use super::{CaptionEntry, SubtitleFormatter};
use crate::timestamp::format_vtt_timestamp;
use serde::Serialize;

#[derive(Default)]
pub struct JsonFormatter {
    pub source_file: Option<String>,
    pub source_format: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    metadata: JsonMetadata,
    captions: Vec<JsonCaption>,
}

#[derive(Serialize)]
struct JsonMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_format: Option<String>,
    caption_count: usize,
}

#[derive(Serialize)]
struct JsonCaption {
    index: usize,
    start_ms: u64,
    end_ms: u64,
    start_formatted: String,
    end_formatted: String,
    text: String,
}

impl SubtitleFormatter for JsonFormatter {
    fn format(&self, entries: &[CaptionEntry]) -> String {
        let output = JsonOutput {
            metadata: JsonMetadata {
                source_file: self.source_file.clone(),
                source_format: self.source_format.clone(),
                caption_count: entries.len(),
            },
            captions: entries
                .iter()
                .map(|e| JsonCaption {
                    index: e.sequence_index,
                    start_ms: e.start,
                    end_ms: e.end,
                    start_formatted: format_vtt_timestamp(e.start),
                    end_formatted: format_vtt_timestamp(e.end),
                    text: e.text.clone(),
                })
                .collect(),
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
