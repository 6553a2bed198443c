use serde::{Deserialize, Serialize};

/// Header row of the output CSV, in record field order.
pub const CSV_HEADER: &str = "Year,Make,Model,Trim,VIN,URL";

/// One scraped vehicle listing.
///
/// Trim and VIN hold the literal `"N/A"` when the page carries no such
/// labeled field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Trim")]
    pub trim: String,
    #[serde(rename = "VIN")]
    pub vin: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl VehicleRecord {
    /// Comma-joined data row, fields in header order, no quoting.
    pub fn to_csv_line(&self) -> String {
        [
            self.year.as_str(),
            self.make.as_str(),
            self.model.as_str(),
            self.trim.as_str(),
            self.vin.as_str(),
            self.url.as_str(),
        ]
        .join(",")
    }
}

/// Per-ID result of a fetch attempt.
///
/// `NotFound` covers any non-200 response; `ParseError` covers a page that
/// loaded but could not be extracted. Transport failures are real errors and
/// stay in `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(VehicleRecord),
    NotFound,
    ParseError(String),
}
