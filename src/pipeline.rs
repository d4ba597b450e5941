use log::{debug, info, warn};
use thiserror::Error;

use crate::completion::CompletionClient;
use crate::prompt::{OutputMode, Prompt, SummaryRequest};
use crate::youtube::TranscriptFetcher;

/// Generated text for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub mode: OutputMode,
    pub text: String,
}

/// Why a request produced no output. Every variant ends the request.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("no URL provided")]
    MissingUrl,

    #[error("could not extract video ID from: {0}")]
    InvalidUrl(String),

    #[error("transcript fetch failed: {0}")]
    Transcript(eyre::Report),

    #[error("completion failed: {0}")]
    Completion(eyre::Report),
}

impl SummarizeError {
    /// Input problems that never reached the network
    pub fn is_warning(&self) -> bool {
        matches!(self, SummarizeError::MissingUrl | SummarizeError::InvalidUrl(_))
    }

    /// Message shown to the person who submitted the request
    pub fn user_message(&self) -> String {
        match self {
            SummarizeError::MissingUrl => "Please enter a YouTube URL.".to_string(),
            SummarizeError::InvalidUrl(_) => "Invalid YouTube URL.".to_string(),
            SummarizeError::Transcript(e) | SummarizeError::Completion(e) => {
                format!("An error occurred: {e:#}")
            }
        }
    }
}

/// URL -> video ID -> transcript -> prompt -> completion, strictly in order.
pub async fn summarize_video(
    url: &str,
    request: &SummaryRequest,
    fetcher: &dyn TranscriptFetcher,
    completer: &dyn CompletionClient,
) -> Result<Completion, SummarizeError> {
    // Only a truly empty field is "missing"; blanks fall through to extraction.
    if url.is_empty() {
        return Err(SummarizeError::MissingUrl);
    }
    let url = url.trim();

    let Some(video_id) = crate::extract_video_id(url) else {
        warn!("No video ID in {url}");
        return Err(SummarizeError::InvalidUrl(url.to_string()));
    };
    debug!("Extracted video ID {video_id} from {url}");

    let transcript = fetcher.fetch(&video_id).await.map_err(SummarizeError::Transcript)?;
    let text = transcript.text();
    info!(
        "Transcript for {video_id} \"{}\" [{}]: {} segments, {} chars",
        transcript.title,
        transcript.language,
        transcript.segments.len(),
        text.len()
    );

    let prompt = Prompt::build(request, &text);
    let output = completer
        .complete(&prompt)
        .await
        .map_err(SummarizeError::Completion)?;

    info!("{} for {video_id} generated ({} chars)", request.mode.label(), output.len());

    Ok(Completion {
        mode: request.mode,
        text: output,
    })
}
