// End-to-end checks of the analysis pipeline over parsed CSV data.

use anyhow::Result;
use temp_anomaly_dashboard::analysis::{self, live, monthly, rolling};
use temp_anomaly_dashboard::core::clock::FixedClock;
use temp_anomaly_dashboard::core::errors::AnomalyError;
use temp_anomaly_dashboard::TemperatureDataset;

fn june_csv() -> String {
    let mut csv = String::from("city,timestamp,temperature\n");
    csv.push_str("A,2024-06-01,20.0\n");
    csv.push_str("A,2024-06-02,22.0\n");
    csv.push_str("A,2024-06-03,21.0\n");
    csv
}

// A year of daily readings with a seasonal ramp and two planted spikes.
fn year_csv(city: &str) -> String {
    let mut csv = String::from("city,timestamp,temperature\n");
    for month in 1..=12u32 {
        for day in 1..=28u32 {
            let base = 5.0 + month as f64 + (day % 5) as f64 * 0.3;
            let temp = match (month, day) {
                (7, 15) => base + 25.0,
                (2, 10) => base - 25.0,
                _ => base,
            };
            csv.push_str(&format!("{},2024-{:02}-{:02},{:.2}\n", city, month, day, temp));
        }
    }
    csv
}

#[test]
fn csv_to_annotation_pipeline_flags_planted_spikes() -> Result<()> {
    let dataset = TemperatureDataset::parse_csv(&year_csv("Moscow"))?;
    let annotated = analysis::annotate(&dataset);

    assert_eq!(annotated.len(), dataset.len());

    let flagged: Vec<_> = annotated.iter().filter(|r| r.is_anomaly).collect();
    assert!(
        flagged
            .iter()
            .any(|r| r.timestamp.format("%m-%d").to_string() == "07-15"),
        "hot spike must be flagged"
    );
    assert!(
        flagged
            .iter()
            .any(|r| r.timestamp.format("%m-%d").to_string() == "02-10"),
        "cold spike must be flagged"
    );
    Ok(())
}

#[test]
fn annotation_invariant_holds_on_every_row() -> Result<()> {
    let dataset = TemperatureDataset::parse_csv(&year_csv("Moscow"))?;
    for row in analysis::annotate(&dataset) {
        match row.rolling_std {
            Some(std) => {
                let deviates = (row.temperature - row.rolling_avg).abs()
                    >= rolling::SIGMA_THRESHOLD * std;
                assert_eq!(row.is_anomaly, deviates);
            }
            None => assert!(!row.is_anomaly),
        }
    }
    Ok(())
}

#[test]
fn live_detector_matches_reference_example() -> Result<()> {
    // dataset = [("A", June, 20), ("A", June, 22), ("A", June, 21)]
    let dataset = TemperatureDataset::parse_csv(&june_csv())?;

    let hot = live::assess(&dataset, "A", 30.0, &FixedClock(6))?;
    let baseline = hot.baseline.expect("three June readings");
    assert_eq!(baseline.mean, 21.0);
    assert!((baseline.std - 1.0).abs() < 1e-12);
    assert!(hot.is_anomaly, "|30 - 21| = 9 >= 2 * 1.0");

    let mild = live::assess(&dataset, "A", 21.5, &FixedClock(6))?;
    assert!(!mild.is_anomaly, "|21.5 - 21| = 0.5 < 2 * 1.0");
    Ok(())
}

#[test]
fn live_detector_distinguishes_no_data_from_normal() -> Result<()> {
    let dataset = TemperatureDataset::parse_csv(&june_csv())?;

    // City exists, but December has no readings: success with no baseline.
    let december = live::assess(&dataset, "A", 21.0, &FixedClock(12))?;
    assert!(december.baseline.is_none());
    assert!(!december.is_anomaly);

    // City missing entirely: an error, not an empty result.
    let err = live::assess(&dataset, "Nowhere", 21.0, &FixedClock(6)).unwrap_err();
    assert!(matches!(err, AnomalyError::UnknownCity(_)));
    Ok(())
}

#[test]
fn monthly_baselines_cover_only_observed_months() -> Result<()> {
    let dataset = TemperatureDataset::parse_csv(&year_csv("Moscow"))?;
    let baselines = monthly::monthly_baselines(&dataset, "Moscow")?;

    assert_eq!(baselines.len(), 12);
    for (expected_month, baseline) in (1..=12u32).zip(&baselines) {
        assert_eq!(baseline.month, expected_month);
        assert_eq!(baseline.samples, 28);
        assert!(baseline.std.is_some());
    }

    let sparse = TemperatureDataset::parse_csv(&june_csv())?;
    let sparse_baselines = monthly::monthly_baselines(&sparse, "A")?;
    assert_eq!(sparse_baselines.len(), 1);
    assert_eq!(sparse_baselines[0].month, 6);
    Ok(())
}

#[test]
fn rolling_and_global_signals_are_independent() -> Result<()> {
    let dataset = TemperatureDataset::parse_csv(&year_csv("Moscow"))?;

    let rolling_flags = analysis::annotate(&dataset)
        .into_iter()
        .filter(|r| r.is_anomaly)
        .count();
    let global_flags = monthly::global_outliers(&dataset, "Moscow")?.len();

    // Both signals see the planted spikes, but they are computed from
    // different baselines and need not agree row for row.
    assert!(rolling_flags >= 2);
    assert!(global_flags >= 2);
    Ok(())
}
