use std::thread;
use std::time::Duration;

use anyhow::{ensure, Result};
use rand::Rng;

use crate::models::FetchOutcome;
use crate::progress::ProgressPrinter;
use crate::utils;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Where vehicle pages come from. The driver only sees this seam, so tests
/// run it against scripted outcomes instead of the network.
pub trait VehicleSource {
    fn fetch_vehicle(&self, vehicle_id: u64) -> Result<FetchOutcome>;
}

/// Inter-request pacing. The stock behavior is a flat 5 second wait after
/// every request.
#[derive(Debug, Clone)]
pub enum DelayPolicy {
    Constant(Duration),
    /// `base` plus a uniformly random extra of up to `spread`.
    Jittered { base: Duration, spread: Duration },
}

impl DelayPolicy {
    pub fn next_delay(&self) -> Duration {
        match self {
            DelayPolicy::Constant(base) => *base,
            DelayPolicy::Jittered { base, spread } => {
                let extra_ms = rand::thread_rng().gen_range(0..=spread.as_millis() as u64);
                *base + Duration::from_millis(extra_ms)
            }
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Constant(DEFAULT_DELAY)
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub output_file: String,
    pub start_id: u64,
    pub end_id: u64,
    pub delay: DelayPolicy,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: crate::scraper::BASE_URL.to_string(),
            output_file: "clutch_vehicle_listings.csv".to_string(),
            start_id: 1,
            end_id: 1,
            delay: DelayPolicy::default(),
        }
    }
}

/// Counters for one batch run. `processed` covers every ID in the range,
/// hit or miss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub processed: u64,
    pub written: u64,
    pub not_found: u64,
    pub parse_errors: u64,
}

/// Walks the inclusive ID range in ascending order: fetch, append on a hit,
/// report progress, wait, repeat.
///
/// The output file is created with its header first if needed; an existing
/// file is strictly appended to, duplicates included. Transport and
/// filesystem errors abort the run mid-range, leaving everything appended so
/// far in place.
pub fn run_batch<S: VehicleSource>(source: &S, options: &ScrapeOptions) -> Result<BatchSummary> {
    ensure!(
        options.start_id <= options.end_id,
        "Starting ID {} is greater than ending ID {}",
        options.start_id,
        options.end_id
    );

    utils::ensure_csv_header(&options.output_file)?;

    let total = options.end_id - options.start_id + 1;
    let mut progress = ProgressPrinter::new(total);
    let mut summary = BatchSummary::default();

    for vehicle_id in options.start_id..=options.end_id {
        match source.fetch_vehicle(vehicle_id)? {
            FetchOutcome::Found(record) => {
                utils::append_record(&options.output_file, &record)?;
                summary.written += 1;
            }
            FetchOutcome::NotFound => {
                summary.not_found += 1;
            }
            FetchOutcome::ParseError(reason) => {
                eprintln!(
                    "Error extracting data for vehicle ID {}: {}",
                    vehicle_id, reason
                );
                summary.parse_errors += 1;
            }
        }

        summary.processed += 1;
        progress.tick()?;

        // Unconditional wait between requests, also after the final ID.
        thread::sleep(options.delay.next_delay());
    }

    progress.finish(&summary, &options.output_file)?;

    Ok(summary)
}
