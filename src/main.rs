use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, WrapErr};
use log::{info, warn};

mod cli;

use cli::{Cli, Command};
use ytbrief::config::{API_KEY_ENV, Config, Overrides, Settings};
use ytbrief::pipeline::Summarizer;
use ytbrief::summarize::GeminiModel;
use ytbrief::web::{AppState, router};
use ytbrief::youtube::YouTubeCaptions;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytbrief.log");

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
        .join("ytbrief")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match std::env::var(API_KEY_ENV) {
        Ok(k) if !k.is_empty() => format!("  \x1b[32m✅\x1b[0m {API_KEY_ENV} is set"),
        _ => format!("  \x1b[31m❌\x1b[0m {API_KEY_ENV} (not set, summaries will fail)"),
    };

    let log_path = log_dir().join("ytbrief.log");

    format!(
        "\nREQUIRED CONFIGURATION:\n{key_line}\n\nConfig file: {}\nLogs are written to: {}",
        ytbrief::config::config_path().display(),
        log_path.display()
    )
}

fn build_summarizer(client: reqwest::Client, settings: &Settings) -> Summarizer {
    let transcripts = YouTubeCaptions::new(client.clone(), settings.lang.clone());
    let model = GeminiModel::new(client, settings.gemini.clone());
    Summarizer::new(Arc::new(transcripts), Arc::new(model))
        .with_prompt(settings.prompt.clone())
}

async fn serve(summarizer: Summarizer, bind: &str) -> Result<()> {
    let app = router(AppState { summarizer });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    let addr = listener.local_addr()?;
    info!("listening on {addr}");
    eprintln!("ytbrief listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn summarize_once(summarizer: &Summarizer, url: &str, verbose: bool) -> Result<()> {
    let outcome = summarizer
        .run(url)
        .await
        .wrap_err_with(|| format!("could not summarize {url}"))?;

    if verbose {
        eprintln!("Video: {} ({})", outcome.title, outcome.video_id.watch_url());
    }
    println!("Thumbnail: {}", outcome.video_id.thumbnail_url());

    match outcome.summary {
        Some(summary) => println!("\n--- Summary ---\n{summary}"),
        None => println!("\nTranscript is empty, nothing to summarize."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    dotenvy::dotenv().ok();

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });

    let command = cli.command.clone().unwrap_or(Command::Serve { bind: None });
    let overrides = Overrides {
        bind: match &command {
            Command::Serve { bind } => bind.clone(),
            Command::Summarize { .. } => None,
        },
        model: cli.model.clone(),
        lang: cli.lang.clone(),
    };
    let settings = config.resolve(std::env::var(API_KEY_ENV).ok(), overrides);

    if settings.gemini.api_key.is_none() {
        warn!("{API_KEY_ENV} not set; summary requests will fail until it is configured");
    }
    if cli.verbose {
        let config_path = ytbrief::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Model: {}\nCaption language: {}\nAPI key: {}",
            settings.gemini.model,
            settings.lang,
            if settings.gemini.api_key.is_some() { "set" } else { "missing" }
        );
    }

    let client = reqwest::Client::new();
    let summarizer = build_summarizer(client, &settings);

    match command {
        Command::Serve { .. } => serve(summarizer, &settings.bind).await,
        Command::Summarize { url } => summarize_once(&summarizer, &url, cli.verbose).await,
    }
}
