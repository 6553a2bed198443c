use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::{VehicleRecord, CSV_HEADER};

/// Creates the output file with its header row, unless it already exists.
/// An existing file is left exactly as it is; rows only ever append.
pub fn ensure_csv_header(output_path: &str) -> Result<()> {
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output_path)
    {
        Ok(mut file) => writeln!(file, "{}", CSV_HEADER)
            .context(format!("Failed to write header to {}", output_path)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => {
            Err(e).context(format!("Failed to create output file: {}", output_path))
        }
    }
}

/// Appends one data row as a raw unquoted line, the file opened and closed
/// per write so an interrupted run keeps everything appended so far.
pub fn append_record(output_path: &str, record: &VehicleRecord) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(output_path)
        .context(format!("Failed to open output file: {}", output_path))?;

    writeln!(file, "{}", record.to_csv_line())
        .context(format!("Failed to append to {}", output_path))
}

/// Reads previously scraped records back from the output file. Missing file
/// means a fresh start; rows that no longer deserialize are skipped with a
/// warning.
pub fn load_existing_records(input_path: &str) -> Result<Vec<VehicleRecord>> {
    let path = Path::new(input_path);

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).context(format!("Failed to open input file: {}", input_path))?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let mut records = Vec::new();

    for result in reader.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => println!("Warning: Skipping unreadable record: {}", e),
        }
    }

    Ok(records)
}

/// `H:MM:SS` with unpadded hours, sub-second remainder dropped.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
