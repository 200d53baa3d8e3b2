use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use newswire::config::Config;
use newswire::feed;

#[derive(Parser, Debug)]
#[command(name = "newswire", about = "Fetch the GeekNews feed and print normalized items")]
struct Args {
    /// Config file path (defaults to ~/.config/newswire/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print at most this many items
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Emit the normalized feed as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Get the default config file path (~/.config/newswire/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("newswire")
            .join("config.toml"),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match args.config.or_else(default_config_path) {
        Some(path) => Config::load(&path).context("Failed to load configuration")?,
        None => Config::default(),
    };

    let client = feed::build_client().context("Failed to build HTTP client")?;
    let mut feed = feed::fetch_and_normalize(&client, &config)
        .await
        .context("Failed to fetch feed")?;

    if let Some(limit) = args.limit {
        feed.items.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    println!("{}", printable(&feed.title));
    if !feed.description.is_empty() {
        println!("{}", printable(&feed.description));
    }
    println!();
    for (idx, item) in feed.items.iter().enumerate() {
        println!("{:3}. {}", idx + 1, printable(&item.title));
        if !item.link.is_empty() {
            println!("     {}", printable(&item.link));
        }
        if let Some(date) = &item.publication_date {
            println!("     {}", printable(date));
        }
    }

    Ok(())
}

/// Feed text is remote-controlled; drop control characters so it cannot
/// drive the terminal. Keeps tab and newline.
fn printable(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect()
}
