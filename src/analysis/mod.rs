pub mod live;
pub mod monthly;
pub mod rolling;

pub use live::{Baseline, LiveAssessment};
pub use rolling::{annotate, ROLLING_WINDOW, SIGMA_THRESHOLD};

/// Mean and sample standard deviation (N-1 denominator) of a slice.
///
/// The std is `None` for fewer than two values, where Bessel's correction
/// leaves it undefined. Callers decide what that means for them.
pub fn sample_stats(values: &[f64]) -> (f64, Option<f64>) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, None);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, Some(variance.sqrt()))
}
