use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::driver::VehicleSource;
use crate::models::FetchOutcome;
use crate::parser;

pub const BASE_URL: &str = "https://www.clutch.ca/vehicles/";

/// Fetches vehicle listing pages from clutch.ca.
///
/// One plain GET per vehicle ID against the stock client: no retries, no
/// extra headers, no timeout override.
pub struct ClutchScraper {
    client: Client,
    base_url: String,
}

impl ClutchScraper {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Listing page URL for a vehicle ID: the ID appended to the base URL.
    pub fn listing_url(&self, vehicle_id: u64) -> String {
        format!("{}{}", self.base_url, vehicle_id)
    }
}

impl VehicleSource for ClutchScraper {
    fn fetch_vehicle(&self, vehicle_id: u64) -> Result<FetchOutcome> {
        let url = self.listing_url(vehicle_id);
        println!("Testing URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if response.status() != StatusCode::OK {
            return Ok(FetchOutcome::NotFound);
        }

        let body = response.text().context("Failed to read response body")?;

        match parser::parse_vehicle_page(&body, &url) {
            Ok(record) => {
                println!(
                    "Found vehicle: {} {} {}, Trim: {}, VIN: {}",
                    record.year, record.make, record.model, record.trim, record.vin
                );
                Ok(FetchOutcome::Found(record))
            }
            Err(e) => Ok(FetchOutcome::ParseError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_appends_the_vehicle_id() {
        let scraper = ClutchScraper::new(BASE_URL);
        assert_eq!(
            scraper.listing_url(271828),
            "https://www.clutch.ca/vehicles/271828"
        );
    }

    #[test]
    fn listing_url_respects_a_custom_base() {
        let scraper = ClutchScraper::new("http://localhost:8080/cars/");
        assert_eq!(scraper.listing_url(7), "http://localhost:8080/cars/7");
    }
}
