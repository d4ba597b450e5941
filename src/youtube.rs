use std::sync::LazyLock;

use async_trait::async_trait;
use eyre::{Result, bail};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::{Segment, Transcript};

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("api key pattern is valid")
});

// Newer watch pages
static API_KEY_FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("api key fallback pattern is valid")
});

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Source of caption transcripts for a video ID
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

/// Fetches YouTube's built-in captions via the InnerTube API
#[derive(Debug, Clone)]
pub struct YouTubeCaptions {
    client: reqwest::Client,
    lang: String,
}

impl YouTubeCaptions {
    /// `lang` is the preferred caption track; the first track is used when it is missing.
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl TranscriptFetcher for YouTubeCaptions {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        fetch_captions(&self.client, video_id, &self.lang).await
    }
}

async fn fetch_captions(client: &reqwest::Client, video_id: &str, lang: &str) -> Result<Transcript> {
    // Step 1: Fetch the watch page to get the InnerTube API key
    let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
    debug!("Fetching watch page: {watch_url}");

    let page_html = client
        .get(&watch_url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let api_key = extract_api_key(&page_html)?;
    debug!("Extracted InnerTube API key: {api_key}");

    // Step 2: Call InnerTube player endpoint
    let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

    let body = serde_json::json!({
        "context": {
            "client": {
                "hl": lang,
                "gl": "US",
                "clientName": "WEB",
                "clientVersion": "2.20241126.01.00"
            }
        },
        "videoId": video_id
    });

    let resp: InnerTubePlayerResponse = client
        .post(&player_url)
        .header("User-Agent", USER_AGENT)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let title = resp
        .video_details
        .as_ref()
        .and_then(|vd| vd.title.clone())
        .unwrap_or_default();

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    let Some(track) = select_track(&tracks, lang) else {
        bail!("no captions available for video {video_id}");
    };

    let actual_lang = track.language_code.clone();
    debug!("Using caption track: lang={actual_lang}");

    // Step 3: Fetch the caption XML
    let caption_xml = client
        .get(&track.base_url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let segments = parse_caption_xml(&caption_xml)?;
    info!("Fetched {} caption segments for {video_id}", segments.len());

    Ok(Transcript {
        video_id: video_id.to_string(),
        title,
        language: actual_lang,
        segments,
    })
}

/// Requested language track, or the first available
fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    tracks.iter().find(|t| t.language_code == lang).or_else(|| tracks.first())
}

fn extract_api_key(html: &str) -> Result<String> {
    [&*API_KEY_RE, &*API_KEY_FALLBACK_RE]
        .iter()
        .find_map(|re| re.captures(html).map(|caps| caps[1].to_string()))
        .ok_or_else(|| eyre::eyre!("could not extract InnerTube API key from watch page"))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                current_dur = dur;
            }
            Ok(Event::Empty(_)) => {
                // Self-closing <text .../> carries no caption text
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
