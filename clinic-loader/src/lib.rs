//! Check-in CSV (plain or gzip-compressed) to `Dataset` loader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use clinic_core::{CheckInRow, DashboardConfig, Dataset, LoadError};
use flate2::read::MultiGzDecoder;
use serde::Deserialize;

/// Location of the bundled dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/clinical_analytics.csv.gz";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const REQUIRED_COLUMNS: [&str; 7] = [
    "Clinic Name",
    "Admit Source",
    "Check-In Time",
    "Department",
    "Wait Time Min",
    "Care Score",
    "Number of Records",
];

/// Markers read as a missing admission source.
const MISSING_MARKERS: [&str; 5] = ["", "NA", "N/A", "NaN", "null"];

#[derive(Debug, Deserialize)]
struct RawCheckIn {
    #[serde(rename = "Clinic Name")]
    clinic_name: String,
    #[serde(rename = "Admit Source")]
    admit_source: Option<String>,
    #[serde(rename = "Check-In Time")]
    check_in_time: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Wait Time Min")]
    wait_time_minutes: String,
    #[serde(rename = "Care Score")]
    care_score: String,
    #[serde(rename = "Number of Records")]
    number_of_records: String,
}

impl RawCheckIn {
    fn into_row(self, line: u64, config: &DashboardConfig) -> Result<CheckInRow, LoadError> {
        let check_in_time = parse_check_in(&self.check_in_time, &config.timestamp_format)
            .ok_or_else(|| LoadError::InvalidTimestamp {
                line,
                value: self.check_in_time.clone(),
                format: config.timestamp_format.clone(),
            })?;

        Ok(CheckInRow {
            clinic_name: self.clinic_name,
            admit_source: self
                .admit_source
                .filter(|source| !MISSING_MARKERS.contains(&source.trim())),
            check_in_time,
            department: self.department,
            wait_time_minutes: parse_number(&self.wait_time_minutes, "Wait Time Min", line)?,
            care_score: parse_number(&self.care_score, "Care Score", line)?,
            number_of_records: parse_number(
                &self.number_of_records,
                "Number of Records",
                line,
            )?,
        })
    }
}

/// Loads the dataset from `path`, decompressing gzip input.
pub fn load_dataset(
    path: impl AsRef<Path>,
    config: &DashboardConfig,
) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| LoadError::Unreadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    read_dataset(file, &path.display().to_string(), config)
}

/// Loads the dataset from any byte stream. Gzip is detected from the magic bytes.
pub fn load_from_reader<R: Read>(reader: R, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    read_dataset(reader, "<reader>", config)
}

/// Loads the dataset from CSV text already in memory.
pub fn parse_dataset_str(text: &str, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    read_dataset(text.as_bytes(), "<memory>", config)
}

fn read_dataset<R: Read>(
    mut reader: R,
    source: &str,
    config: &DashboardConfig,
) -> Result<Dataset, LoadError> {
    let unreadable = |err: std::io::Error| LoadError::Unreadable {
        path: source.to_string(),
        reason: err.to_string(),
    };

    // A single `read` may return fewer bytes than the magic number.
    let mut prefix = Vec::with_capacity(GZIP_MAGIC.len());
    (&mut reader)
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut prefix)
        .map_err(unreadable)?;
    let is_gzip = prefix == GZIP_MAGIC;
    let input = BufReader::new(prefix.as_slice().chain(reader));

    // Concatenated members (bgzip, appended exports) must all be read.
    let rows = if is_gzip {
        read_rows(MultiGzDecoder::new(input), source, config)?
    } else {
        read_rows(input, source, config)?
    };

    let dataset = Dataset::from_rows(rows, &config.missing_admit_source);
    tracing::info!(
        source,
        gzip = is_gzip,
        records = dataset.len(),
        "loaded check-in dataset"
    );
    Ok(dataset)
}

fn read_rows<R: Read>(
    input: R,
    source: &str,
    config: &DashboardConfig,
) -> Result<Vec<CheckInRow>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = csv_reader
        .headers()
        .map_err(|err| csv_error(err, source, 0))?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(LoadError::MissingColumn((*missing).to_string()));
    }

    let mut rows = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let line = index as u64 + 1;
        let record = result.map_err(|err| csv_error(err, source, line))?;
        let raw: RawCheckIn =
            record
                .deserialize(Some(&headers))
                .map_err(|err| LoadError::MalformedRow {
                    line,
                    reason: err.to_string(),
                })?;
        rows.push(raw.into_row(line, config)?);
    }
    Ok(rows)
}

fn csv_error(err: csv::Error, source: &str, line: u64) -> LoadError {
    if err.is_io_error() {
        return LoadError::Unreadable {
            path: source.to_string(),
            reason: err.to_string(),
        };
    }
    LoadError::MalformedRow {
        line,
        reason: err.to_string(),
    }
}

fn parse_check_in(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

fn parse_number(value: &str, column: &'static str, line: u64) -> Result<f64, LoadError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| LoadError::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twelve_hour_timestamps() {
        let format = DashboardConfig::default().timestamp_format;
        let parsed = parse_check_in("2014-01-02 12:30:00 PM", &format).expect("parse");
        assert_eq!(parsed.to_string(), "2014-01-02 12:30:00");
        let parsed = parse_check_in("2014-01-02 12:30:00 AM", &format).expect("parse");
        assert_eq!(parsed.to_string(), "2014-01-02 00:30:00");
        assert!(parse_check_in("2014-01-02 13:30:00", &format).is_none());
        assert!(parse_check_in("02/01/2014 09:00:00 AM", &format).is_none());
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(parse_number(" 12 ", "Care Score", 2).ok(), Some(12.0));
        assert!(parse_number("NaN", "Care Score", 2).is_err());
        assert!(parse_number("", "Care Score", 2).is_err());
    }
}
