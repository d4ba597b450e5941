pub mod completion;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod web;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;

/// A single captioned segment
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Segment texts in order, joined with single spaces. Timing is dropped.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern is valid"));

/// Extract the 11-character video ID from a YouTube URL.
///
/// Best-effort: the first `v=ID` or `/ID` run wins, and neither scheme nor
/// host is checked.
pub fn extract_video_id(input: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(input.trim())
        .map(|caps| caps[1].to_string())
}
