use clap::Parser;
use std::path::PathBuf;

use watchless::prompt::{Language, LengthTier, OutputMode};

#[derive(Parser)]
#[command(
    name = "watchless",
    about = "Summarize YouTube videos from their transcripts",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (reads URLs from stdin if omitted)
    pub url: Option<String>,

    /// What to generate: summary (default), key-points, keywords
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Summary length: short (default), medium, detailed
    #[arg(short = 'L', long, value_enum)]
    pub length: Option<LengthTier>,

    /// Output language (default: english)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Preferred caption track language code
    #[arg(long)]
    pub caption_lang: Option<String>,

    /// Chat completion model
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Serve the web form on this address instead (e.g. 127.0.0.1:8080)
    #[arg(long, value_name = "ADDR", conflicts_with = "url")]
    pub serve: Option<String>,

    /// Show the resolved settings and progress on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
