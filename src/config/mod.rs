pub mod settings;

pub use settings::{generate_default_config, DatasetSettings, ServerSettings, Settings, WeatherSettings};
