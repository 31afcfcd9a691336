use anyhow::{Context, Result};
use chartfeed::board::ChartBoard;
use chartfeed::config::Config;
use chartfeed::feed::{
    title_for, CategoryId, FailurePolicy, FanOutCoordinator, HttpResourceClient,
};
use chartfeed::present::Artwork;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("chartfeed")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "chartfeed", about = "Fetch chart feeds concurrently and print them in order")]
struct Args {
    /// Config file (defaults to ~/.config/chartfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Category to fetch: apps, podcasts, tv-shows, music (repeatable; default all)
    #[arg(long = "category", value_name = "SLUG")]
    categories: Vec<CategoryId>,

    /// Fail the whole batch if any category fails
    #[arg(long)]
    fail_fast: bool,

    /// Storefront country code, overriding the config file
    #[arg(long, value_name = "CC")]
    country: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(country) = args.country {
        config.country = country;
    }
    if args.fail_fast {
        config.failure_policy = FailurePolicy::FailFast;
    }
    config.validate().context("Invalid configuration")?;

    let client = HttpResourceClient::from_config(reqwest::Client::new(), &config)
        .context("Failed to build chart client")?;
    let board = ChartBoard::new(FanOutCoordinator::from_config(Arc::new(client), &config));

    let categories = if args.categories.is_empty() {
        CategoryId::ALL.to_vec()
    } else {
        args.categories
    };

    let snapshot = board
        .refresh(&categories)
        .await
        .context("Failed to fetch charts")?;

    for category in &snapshot.failed {
        eprintln!("warning: {} could not be fetched", title_for(*category));
    }

    for section in &snapshot.sections {
        println!("== {} ({})", title_for(section.key), section.len());
        for item in &section.values {
            let artist = if item.artist_name.is_empty() {
                String::new()
            } else {
                format!(" - {}", item.artist_name)
            };
            println!("  {}{}  [{}]", item.name, artist, item.thumbnail_url());
        }
    }

    Ok(())
}
