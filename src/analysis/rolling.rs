//! Historical analyzer: per-city rolling baselines over the raw dataset.

use std::collections::HashMap;

use crate::analysis::sample_stats;
use crate::core::dataset::{AnnotatedReading, TemperatureDataset};

/// Number of most recent readings per city that form the rolling window.
pub const ROLLING_WINDOW: usize = 30;

/// A reading is anomalous when it deviates from its rolling mean by at least
/// this many rolling standard deviations.
pub const SIGMA_THRESHOLD: f64 = 2.0;

/// Annotates every reading with its rolling mean/std and anomaly flag.
///
/// Pure function of the dataset: output rows are in input order, one per
/// input reading, and the raw dataset is left untouched.
///
/// Each city is processed independently. For row i of a city the window is
/// the most recent `ROLLING_WINDOW` readings of that city up to and
/// including i; with insufficient history the window is simply shorter
/// (minimum periods = 1). Leading rows whose shortened window has no defined
/// sample std (a window of one) are backfilled with the first defined
/// (avg, std) pair of that city.
pub fn annotate(dataset: &TemperatureDataset) -> Vec<AnnotatedReading> {
    let mut history: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut rows_by_city: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut stats: Vec<(f64, Option<f64>)> = Vec::with_capacity(dataset.len());

    for (row, reading) in dataset.readings().iter().enumerate() {
        let temps = history.entry(reading.city.as_str()).or_default();
        temps.push(reading.temperature);

        let start = temps.len().saturating_sub(ROLLING_WINDOW);
        stats.push(sample_stats(&temps[start..]));
        rows_by_city
            .entry(reading.city.as_str())
            .or_default()
            .push(row);
    }

    // Backward-fill: leading rows of a city inherit the first defined std
    // (and its mean). A city with fewer than two readings has none to
    // inherit and keeps rolling_std = None.
    for rows in rows_by_city.values() {
        if let Some(first_defined) = rows.iter().position(|&row| stats[row].1.is_some()) {
            let fill = stats[rows[first_defined]];
            for &row in &rows[..first_defined] {
                stats[row] = fill;
            }
        }
    }

    dataset
        .readings()
        .iter()
        .zip(stats)
        .map(|(reading, (rolling_avg, rolling_std))| {
            let is_anomaly = rolling_std.is_some_and(|std| {
                (reading.temperature - rolling_avg).abs() >= SIGMA_THRESHOLD * std
            });
            AnnotatedReading {
                city: reading.city.clone(),
                timestamp: reading.timestamp,
                temperature: reading.temperature,
                rolling_avg,
                rolling_std,
                is_anomaly,
            }
        })
        .collect()
}
