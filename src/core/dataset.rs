use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{AnomalyError, AnomalyResult};

/// A single historical temperature observation for a city.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reading {
    pub city: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
}

impl Reading {
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }
}

/// A `Reading` with its rolling-window baseline attached.
///
/// `rolling_std` is `None` only when the city has fewer than two readings in
/// total, in which case no sample standard deviation exists to backfill from.
/// Such rows are never flagged as anomalous.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AnnotatedReading {
    pub city: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub rolling_avg: f64,
    pub rolling_std: Option<f64>,
    pub is_anomaly: bool,
}

/// Per-(city, calendar month) descriptive statistics, recomputed on demand.
#[derive(Debug, Serialize, Clone)]
pub struct MonthlyBaseline {
    pub city: String,
    pub month: u32,
    pub mean: f64,
    pub std: Option<f64>,
    pub samples: usize,
}

/// One temperature fetched from the weather provider. Ephemeral: consumed by
/// the live detector and never merged into the historical dataset.
#[derive(Debug, Serialize, Clone)]
pub struct LiveReading {
    pub city: String,
    pub temperature: f64,
    pub fetched_at: DateTime<Utc>,
}

/// The raw historical dataset, ordered by arrival. Owned by the dashboard
/// session; analyzers borrow it and return new derived values.
#[derive(Debug, Default, Clone)]
pub struct TemperatureDataset {
    readings: Vec<Reading>,
}

impl TemperatureDataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Distinct cities in order of first appearance.
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = Vec::new();
        for reading in &self.readings {
            if !cities.iter().any(|c| c == &reading.city) {
                cities.push(reading.city.clone());
            }
        }
        cities
    }

    pub fn contains_city(&self, city: &str) -> bool {
        self.readings.iter().any(|r| r.city == city)
    }

    /// Parses CSV text with a header row containing at least
    /// `city`, `timestamp` and `temperature` columns.
    ///
    /// Uploaded files and the built-in default dataset both go through here,
    /// so the analyzers can treat the two sources identically.
    pub fn parse_csv(input: &str) -> AnomalyResult<Self> {
        let mut lines = input.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| AnomalyError::InvalidData("empty input".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let city_col = find_column(&columns, "city")?;
        let timestamp_col = find_column(&columns, "timestamp")?;
        let temperature_col = find_column(&columns, "temperature")?;

        let mut readings = Vec::new();
        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(AnomalyError::InvalidData(format!(
                    "line {}: expected {} fields, found {}",
                    line_no + 1,
                    columns.len(),
                    fields.len()
                )));
            }

            let city = fields[city_col];
            if city.is_empty() {
                return Err(AnomalyError::InvalidData(format!(
                    "line {}: missing city",
                    line_no + 1
                )));
            }

            let timestamp = parse_timestamp(fields[timestamp_col]).ok_or_else(|| {
                AnomalyError::InvalidData(format!(
                    "line {}: unparseable timestamp '{}'",
                    line_no + 1,
                    fields[timestamp_col]
                ))
            })?;

            let temperature: f64 = fields[temperature_col].parse().map_err(|_| {
                AnomalyError::InvalidData(format!(
                    "line {}: non-numeric temperature '{}'",
                    line_no + 1,
                    fields[temperature_col]
                ))
            })?;

            readings.push(Reading {
                city: city.to_string(),
                timestamp,
                temperature,
            });
        }

        Ok(Self::new(readings))
    }
}

fn find_column(columns: &[&str], name: &str) -> AnomalyResult<usize> {
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(name))
        .ok_or_else(|| AnomalyError::InvalidData(format!("missing required column '{}'", name)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}
