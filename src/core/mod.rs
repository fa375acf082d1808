pub mod clock;
pub mod dataset;
pub mod errors;

// exports for lazy devs like us
pub use clock::{Clock, FixedClock, SystemClock};
pub use dataset::{AnnotatedReading, LiveReading, MonthlyBaseline, Reading, TemperatureDataset};
pub use errors::{AnomalyError, AnomalyResult};
