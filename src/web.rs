//! Single-page web form: paste a URL, pick the output, get the text back.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::response::Html;
use axum::routing::get;
use eyre::Result;
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::{error, info, warn};
use serde::Deserialize;

use crate::completion::CompletionClient;
use crate::pipeline::{Completion, SummarizeError, summarize_video};
use crate::prompt::{Language, LengthTier, OutputMode, SummaryRequest};
use crate::youtube::TranscriptFetcher;

const STYLE: &str = r#"
body { background: #f5f7fa; font-family: sans-serif; }
main { max-width: 800px; margin: 2rem auto; }
h1 { color: #4f46e5; }
label { display: block; margin-top: 1rem; }
input[type=text] { width: 100%; height: 2.5rem; font-size: 1rem; }
button { margin-top: 1rem; background: #4f46e5; color: white; border: none; padding: 0.7rem 1.2rem; border-radius: 5px; }
.summary-box { background: white; border-left: 6px solid #4f46e5; padding: 1rem; border-radius: 8px; white-space: pre-wrap; }
.warning { color: #92400e; }
.error { color: #b91c1c; }
"#;

const SCRIPT: &str = r#"
const mode = document.getElementById('mode');
const lengthRow = document.getElementById('length-row');
const sync = () => { lengthRow.hidden = mode.value !== 'summary'; };
mode.addEventListener('change', sync);
sync();
document.querySelector('form').addEventListener('submit', () => {
  document.getElementById('status').hidden = false;
});
"#;

/// Shared, immutable handles for every request
pub struct AppState {
    pub fetcher: Arc<dyn TranscriptFetcher>,
    pub completer: Arc<dyn CompletionClient>,
    /// Preselected choices on a fresh page
    pub defaults: SummaryRequest,
}

#[derive(Debug, Deserialize)]
pub struct SummaryForm {
    #[serde(default)]
    pub url: String,
    pub mode: OutputMode,
    pub length: Option<LengthTier>,
    pub language: Language,
}

impl SummaryForm {
    fn request(&self) -> SummaryRequest {
        SummaryRequest {
            mode: self.mode,
            length: self.length,
            language: self.language,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .with_state(Arc::new(state))
}

pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!("Listening on http://{local}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page("", &state.defaults, None))
}

async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<SummaryForm>) -> Html<String> {
    let request = form.request();
    let result = summarize_video(&form.url, &request, state.fetcher.as_ref(), state.completer.as_ref()).await;

    match &result {
        Ok(_) => {}
        Err(e) if e.is_warning() => warn!("Rejected request: {e}"),
        Err(e) => error!("Request failed: {e}"),
    }

    Html(render_page(&form.url, &request, Some(&result)))
}

fn render_page(url: &str, request: &SummaryRequest, result: Option<&Result<Completion, SummarizeError>>) -> String {
    let mode_options = options(&OutputMode::ALL, request.mode, OutputMode::value, OutputMode::label);
    let length_options = options(
        &LengthTier::ALL,
        request.length.unwrap_or_default(),
        LengthTier::value,
        LengthTier::label,
    );
    let language_options = options(&Language::ALL, request.language, Language::value, Language::name);
    let url = encode_double_quoted_attribute(url);
    let result = result.map(render_result).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>WatchLess</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>WatchLess</h1>
<p>Get quick summaries of YouTube videos in seconds!</p>
<form method="post" action="/">
<label for="url">Paste a YouTube video URL:</label>
<input type="text" id="url" name="url" value="{url}" placeholder="https://www.youtube.com/watch?v=example">
<label for="mode">Choose output type:</label>
<select id="mode" name="mode">{mode_options}</select>
<div id="length-row">
<label for="length">Choose summary length:</label>
<select id="length" name="length">{length_options}</select>
</div>
<label for="language">Select a language:</label>
<select id="language" name="language">{language_options}</select>
<button type="submit">Summarize</button>
</form>
<p id="status" hidden>Generating summary...</p>
{result}
</main>
<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}

fn render_result(result: &Result<Completion, SummarizeError>) -> String {
    match result {
        Ok(completion) => format!(
            "<section class=\"result\">\n<h4>{}</h4>\n<div class=\"summary-box\">{}</div>\n</section>",
            completion.mode.label(),
            encode_text(&completion.text)
        ),
        Err(e) => {
            let class = if e.is_warning() { "warning" } else { "error" };
            format!("<p class=\"{class}\">{}</p>", encode_text(&e.user_message()))
        }
    }
}

fn options<T: Copy + PartialEq>(
    all: &[T],
    selected: T,
    value: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> String {
    all.iter()
        .map(|item| {
            let attr = if *item == selected { " selected" } else { "" };
            format!("<option value=\"{}\"{attr}>{}</option>", value(item), label(item))
        })
        .collect()
}
