//! bizfinder - interactive terminal client
//!
//! Type a kind of business at the prompt to list nearby places that have no
//! website. The Gemini API key is read from `API_KEY` (or `GEMINI_API_KEY`).

use anyhow::Context;
use bizfinder::{
    config::{parse_coordinates, Config, LocationSource},
    render::{self, OutputFormat},
    session::SearchSession,
    types::{BusinessFinder, DebugOptions},
};
use clap::{Parser, ValueEnum};
use colored::*;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "bizfinder")]
#[command(about = "Find local businesses without a website")]
#[command(version)]
struct Cli {
    /// Gemini model to use
    #[arg(short, long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    /// Fixed latitude (requires --lon)
    #[arg(long, env = "FINDER_LATITUDE", requires = "lon", allow_hyphen_values = true)]
    lat: Option<String>,

    /// Fixed longitude (requires --lat)
    #[arg(long, env = "FINDER_LONGITUDE", requires = "lat", allow_hyphen_values = true)]
    lon: Option<String>,

    /// IP geolocation endpoint used when no fixed coordinates are given
    #[arg(long, env = "FINDER_LOCATION_URL")]
    location_url: Option<String>,

    /// Give up on a Gemini request after this many milliseconds
    #[arg(long, env = "FINDER_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "table")]
    format: FormatCli,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum FormatCli {
    Table,
    Json,
    Simple,
}

impl From<FormatCli> for OutputFormat {
    fn from(format: FormatCli) -> Self {
        match format {
            FormatCli::Table => OutputFormat::Table,
            FormatCli::Json => OutputFormat::Json,
            FormatCli::Simple => OutputFormat::Simple,
        }
    }
}

/// A line typed at the prompt
#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Refresh,
    Location,
    Help,
    Quit,
}

/// Banner-level failures keep the REPL going; configuration failures end it
fn keep_going(outcome: bizfinder::Result<()>) -> anyhow::Result<()> {
    match outcome {
        Err(error) if !error.is_recoverable() => Err(error).context("Cannot continue"),
        _ => Ok(()),
    }
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/refresh" => Command::Refresh,
        "/location" => Command::Location,
        "/help" | "?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Search(other.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values feed the clap env fallbacks below
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli).context("Failed to load configuration")?;
    let format = OutputFormat::from(cli.format.clone());

    let mut gemini = config
        .gemini_service()
        .context("Failed to create Gemini client")?;
    if cli.debug {
        gemini = gemini.with_debug(DebugOptions {
            enabled: true,
            log_requests: true,
            log_responses: true,
        });
        log::debug!("Gemini config: {:?}", gemini.config());
    }
    let finder: Arc<dyn BusinessFinder> = Arc::new(gemini);
    let locator = config
        .location_provider()
        .context("Failed to create location provider")?;

    println!("{}", "Website-less Business Finder".bold().blue());
    let mut session = SearchSession::new(finder, locator);
    keep_going(session.mount().await.map(|_| ()))?;
    println!("{}", render::location_chip(session.location()));
    println!("\n{}\n", render::session_view(&session, format));
    println!("{}", "Type /help for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold().blue());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Location => println!("{}", render::location_chip(session.location())),
            Command::Refresh => {
                keep_going(session.refresh_location().await.map(|_| ()))?;
                println!("{}", render::location_chip(session.location()));
                if let Some(error) = session.error() {
                    println!("{}", render::error_banner(error));
                }
            }
            Command::Search(query) => {
                if !query.trim().is_empty() && session.location().is_some() {
                    println!("{}", render::loading_line(query.trim()));
                }
                keep_going(session.submit(&query).await.map(|_| ()))?;
                println!("\n{}\n", render::session_view(&session, format));
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> bizfinder::Result<Config> {
    let mut config = Config::load()?;

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    if let (Some(lat), Some(lon)) = (&cli.lat, &cli.lon) {
        config.location = LocationSource::Fixed(parse_coordinates(lat, lon)?);
    } else if let Some(url) = &cli.location_url {
        config.location = LocationSource::Ip { url: url.clone() };
    }

    Ok(config)
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  <business type>  search, e.g. coffee shops");
    println!("  /refresh         look up your location again");
    println!("  /location        show the current location");
    println!("  /help            show this help");
    println!("  /quit            exit");
}
