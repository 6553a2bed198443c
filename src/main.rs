use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use clutchfinder::driver::{run_batch, DelayPolicy, ScrapeOptions};
use clutchfinder::scraper::{ClutchScraper, BASE_URL};
use clutchfinder::utils;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Clutchfinder - Vehicle Listing Scraper for Clutch.ca")]
struct Args {
    /// Path to output CSV file
    #[clap(short, long, default_value = "clutch_vehicle_listings.csv")]
    output: String,

    /// Base URL the vehicle ID is appended to
    #[clap(short, long, default_value = BASE_URL)]
    base_url: String,

    /// First vehicle ID to scrape (prompted for when omitted)
    #[clap(short, long)]
    start_id: Option<u64>,

    /// Last vehicle ID to scrape, inclusive (prompted for when omitted)
    #[clap(short, long)]
    end_id: Option<u64>,

    /// Seconds to wait between requests
    #[clap(short, long, default_value = "5")]
    delay: u64,

    /// Add up to this many milliseconds of random jitter to each wait
    #[clap(short, long)]
    jitter_ms: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Welcome to the Clutch.ca Web Scraper!");
    println!("=====================================");

    let start_id = match args.start_id {
        Some(id) => id,
        None => prompt_vehicle_id("Enter the starting vehicle ID: ")?,
    };
    let end_id = match args.end_id {
        Some(id) => id,
        None => prompt_vehicle_id("Enter the ending vehicle ID: ")?,
    };

    let existing = utils::load_existing_records(&args.output)?;
    if !existing.is_empty() {
        println!(
            "Loaded {} previously scraped listings from {}",
            existing.len(),
            args.output
        );
    }

    let base = Duration::from_secs(args.delay);
    let delay = match args.jitter_ms {
        Some(spread) => DelayPolicy::Jittered {
            base,
            spread: Duration::from_millis(spread),
        },
        None => DelayPolicy::Constant(base),
    };

    let options = ScrapeOptions {
        base_url: args.base_url,
        output_file: args.output,
        start_id,
        end_id,
        delay,
    };

    println!(
        "Starting scraper from ID {} to {} at {}. Results will be saved to {}.",
        start_id,
        end_id,
        Local::now().format("%H:%M:%S"),
        options.output_file
    );

    let scraper = ClutchScraper::new(&options.base_url);
    run_batch(&scraper, &options)?;

    println!("Scraping complete!");
    Ok(())
}

fn prompt_vehicle_id(prompt: &str) -> Result<u64> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read vehicle ID")?;

    line.trim()
        .parse()
        .with_context(|| format!("Invalid vehicle ID: {:?}", line.trim()))
}
