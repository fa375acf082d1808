//! Monthly baseline aggregator for the history-trend views.
//!
//! Two descriptive signals live here, both independent of the rolling-window
//! analyzer and of each other:
//!
//! * per-(city, calendar month) mean/std, for trend charts;
//! * readings beyond two sigmas of the city's *all-time* mean/std, a coarser
//!   outlier listing using a strict `>` comparison. Neither reconciles with
//!   the rolling or live classification; they are presented side by side.

use crate::analysis::{sample_stats, SIGMA_THRESHOLD};
use crate::core::dataset::{MonthlyBaseline, Reading, TemperatureDataset};
use crate::core::errors::{AnomalyError, AnomalyResult};

/// Mean and sample std of a city's readings per calendar month (1-12,
/// years pooled). Months with no readings are absent from the output;
/// the rest are sorted by month.
pub fn monthly_baselines(
    dataset: &TemperatureDataset,
    city: &str,
) -> AnomalyResult<Vec<MonthlyBaseline>> {
    if !dataset.contains_city(city) {
        return Err(AnomalyError::UnknownCity(city.to_string()));
    }

    let mut baselines = Vec::new();
    for month in 1..=12 {
        let temps: Vec<f64> = dataset
            .readings()
            .iter()
            .filter(|r| r.city == city && r.month() == month)
            .map(|r| r.temperature)
            .collect();
        if temps.is_empty() {
            continue;
        }
        let (mean, std) = sample_stats(&temps);
        baselines.push(MonthlyBaseline {
            city: city.to_string(),
            month,
            mean,
            std,
            samples: temps.len(),
        });
    }
    Ok(baselines)
}

/// Readings lying strictly more than two sigmas from the city's all-time
/// mean. Empty when the city has too few readings for a defined std.
pub fn global_outliers(dataset: &TemperatureDataset, city: &str) -> AnomalyResult<Vec<Reading>> {
    if !dataset.contains_city(city) {
        return Err(AnomalyError::UnknownCity(city.to_string()));
    }

    let temps: Vec<f64> = dataset
        .readings()
        .iter()
        .filter(|r| r.city == city)
        .map(|r| r.temperature)
        .collect();

    let (mean, std) = sample_stats(&temps);
    let Some(std) = std else {
        return Ok(Vec::new());
    };

    Ok(dataset
        .readings()
        .iter()
        .filter(|r| r.city == city && (r.temperature - mean).abs() > SIGMA_THRESHOLD * std)
        .cloned()
        .collect())
}
