//! Reading the economic calendar CSV.
//!
//! The file has a header row with `Date`, `Currency` and `Event` columns.
//! Every date is validated against the chosen [`DateFormat`] while loading;
//! the first one that does not parse aborts the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::record::EventRecord;

const ISO_FORMAT: &str = "%Y-%m-%d";
const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: cannot parse date '{value}' as {format}")]
    InvalidDate {
        line: u64,
        value: String,
        format: DateFormat,
    },
}

/// How the `Date` column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// `DD/MM/YYYY` (also `-` or `.` separated). Year-first ISO dates are
    /// unambiguous and accepted as well.
    #[default]
    DayFirst,
    /// `YYYY-MM-DD` only.
    Iso,
}

impl DateFormat {
    /// Parse a date cell. Years must be written with four digits; chrono's
    /// `%Y` alone would read `25` as year 25.
    pub fn parse(self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        let iso = || NaiveDate::parse_from_str(value, ISO_FORMAT).ok();
        let date = match self {
            DateFormat::Iso => iso(),
            DateFormat::DayFirst => DAY_FIRST_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .or_else(iso),
        }?;
        (1000..=9999).contains(&date.year()).then_some(date)
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day-first" | "dayfirst" | "dmy" => Ok(DateFormat::DayFirst),
            "iso" | "ymd" => Ok(DateFormat::Iso),
            other => Err(format!("unknown date format '{}', expected day-first|iso", other)),
        }
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateFormat::DayFirst => write!(f, "day-first"),
            DateFormat::Iso => write!(f, "iso"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Event")]
    event: String,
}

pub fn load_events(path: &Path, format: DateFormat) -> Result<Vec<EventRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), %format, "loading calendar file");
    read_events(file, format)
}

pub fn read_events<R: Read>(reader: R, format: DateFormat) -> Result<Vec<EventRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in ["Date", "Currency", "Event"] {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let raw: RawRow = record.deserialize(Some(&headers))?;
        let date = format.parse(&raw.date).ok_or_else(|| LoadError::InvalidDate {
            line: record.position().map(|p| p.line()).unwrap_or_default(),
            value: raw.date.clone(),
            format,
        })?;
        rows.push(EventRecord::new(date, raw.currency, raw.event));
    }

    match (rows.iter().map(|r| r.date).min(), rows.iter().map(|r| r.date).max()) {
        (Some(first), Some(last)) => {
            info!(rows = rows.len(), %first, %last, "calendar loaded")
        }
        _ => info!("calendar file has no rows"),
    }

    Ok(rows)
}
