//! Live anomaly detector: classifies one current temperature against the
//! city's history for the current calendar month.

use serde::Serialize;

use crate::analysis::{sample_stats, SIGMA_THRESHOLD};
use crate::core::clock::Clock;
use crate::core::dataset::TemperatureDataset;
use crate::core::errors::{AnomalyError, AnomalyResult};

/// Mean/std of the (city, month) slice a live reading was judged against.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean: f64,
    pub std: f64,
}

/// Outcome of a live classification.
///
/// `baseline: None` means the city has no readings for the current month —
/// a normal "insufficient data" outcome, distinct from a negative
/// classification. Callers must branch on the baseline, not only on
/// `is_anomaly`, to tell the two apart.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct LiveAssessment {
    pub is_anomaly: bool,
    pub baseline: Option<Baseline>,
}

impl LiveAssessment {
    fn insufficient_data() -> Self {
        Self {
            is_anomaly: false,
            baseline: None,
        }
    }
}

/// Classifies `current_temp` for `city` against that city's historical
/// readings for the clock's current month.
///
/// Fails with `UnknownCity` when the city never appears in the dataset at
/// all; an empty (city, month) slice is the insufficient-data success case
/// instead.
///
/// A single-reading or all-identical month collapses the std to zero, which
/// collapses the threshold to exact equality: any other temperature is
/// anomalous. Deliberate, matches the rule |t - mean| >= 2 * std.
pub fn assess(
    dataset: &TemperatureDataset,
    city: &str,
    current_temp: f64,
    clock: &dyn Clock,
) -> AnomalyResult<LiveAssessment> {
    if !dataset.contains_city(city) {
        return Err(AnomalyError::UnknownCity(city.to_string()));
    }

    let month = clock.current_month();
    let temps: Vec<f64> = dataset
        .readings()
        .iter()
        .filter(|r| r.city == city && r.month() == month)
        .map(|r| r.temperature)
        .collect();

    if temps.is_empty() {
        return Ok(LiveAssessment::insufficient_data());
    }

    let (mean, std) = sample_stats(&temps);
    let std = std.unwrap_or(0.0);
    let is_anomaly = if std == 0.0 {
        current_temp != mean
    } else {
        (current_temp - mean).abs() >= SIGMA_THRESHOLD * std
    };

    Ok(LiveAssessment {
        is_anomaly,
        baseline: Some(Baseline { mean, std }),
    })
}
