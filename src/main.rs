use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, WrapErr, bail};
use log::{debug, error, info, warn};

use watchless::completion::{OpenAiClient, OpenAiConfig};
use watchless::config::{self, Config};
use watchless::pipeline::summarize_video;
use watchless::prompt::SummaryRequest;
use watchless::web::{self, AppState};
use watchless::youtube::YouTubeCaptions;

mod cli;

use cli::Cli;

const DEFAULT_CAPTION_LANG: &str = "en";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("watchless.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("watchless")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = if std::env::var_os("OPENAI_API_KEY").is_some() {
        "  \x1b[32m✅\x1b[0m OPENAI_API_KEY".to_string()
    } else {
        "  \x1b[31m❌\x1b[0m OPENAI_API_KEY (not set; completions will fail)".to_string()
    };

    format!(
        "\nENVIRONMENT:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_dir().join("watchless.log").display()
    )
}

/// A missing .env is fine since the key may come from the real environment;
/// an unreadable or malformed one is not.
fn check_dotenv(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(eyre::Report::new(e).wrap_err("invalid .env file")),
    }
}

/// URLs from the argument, else non-blank stdin lines. Never empty, so a
/// missing URL still goes through the pipeline and gets its warning.
fn collect_urls(cli: &Cli) -> Result<Vec<String>> {
    if let Some(ref url) = cli.url {
        return Ok(vec![url.clone()]);
    }

    let stdin = io::stdin();
    let mut urls = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            urls.push(line);
        }
    }
    if urls.is_empty() {
        urls.push(String::new());
    }
    Ok(urls)
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_path = check_dotenv(dotenvy::dotenv())?;
    setup_logging()?;
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {}", path.display());
    }

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let config_path = config::config_path();
    let config = Config::load().wrap_err_with(|| format!("invalid config file {}", config_path.display()))?;

    // CLI flags take priority over the config file
    let request = SummaryRequest {
        mode: cli.mode.or(config.default_mode).unwrap_or_default(),
        length: cli.length.or(config.default_length),
        language: cli.language.or(config.default_language).unwrap_or_default(),
    };

    let mut openai = OpenAiConfig::from_env();
    if let Some(model) = cli.model.clone().or(config.model) {
        openai.model = model;
    }
    if let Some(api_base) = cli.api_base.clone().or(config.api_base) {
        openai.api_base = api_base;
    }
    if openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set");
    }

    let caption_lang = cli
        .caption_lang
        .clone()
        .or(config.caption_lang)
        .unwrap_or_else(|| DEFAULT_CAPTION_LANG.to_string());

    debug!("Request defaults: {request:?}");
    debug!("Completion config: {openai:?}");

    if cli.verbose {
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Mode: {}\nLength: {}\nLanguage: {}\nModel: {}",
            request.mode.label(),
            request.length.unwrap_or_default().label(),
            request.language,
            openai.model,
        );
    }

    let client = reqwest::Client::new();
    let fetcher = YouTubeCaptions::new(client.clone(), caption_lang);
    let completer = OpenAiClient::new(client, openai);

    if let Some(ref addr) = cli.serve {
        eprintln!("Serving on http://{addr}");
        let state = AppState {
            fetcher: Arc::new(fetcher),
            completer: Arc::new(completer),
            defaults: request,
        };
        return web::serve(addr, state).await;
    }

    let urls = collect_urls(&cli)?;
    let mut rendered = Vec::new();
    let mut failures = 0;

    for url in &urls {
        if cli.verbose {
            eprintln!("Processing: {}", url.trim());
        }

        match summarize_video(url, &request, &fetcher, &completer).await {
            Ok(completion) => rendered.push(watchless::output::render_text(&completion)),
            Err(e) => {
                failures += 1;
                if e.is_warning() {
                    warn!("{e}");
                    eprintln!("Warning: {}", e.user_message());
                } else {
                    error!("{e}");
                    eprintln!("{}", e.user_message());
                }
            }
        }
    }

    if !rendered.is_empty() {
        let rendered = rendered.join("\n\n");
        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }
    }

    if failures > 0 {
        bail!("{failures} of {} request(s) failed", urls.len());
    }

    Ok(())
}
