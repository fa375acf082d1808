pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod weather;

use std::sync::Arc;
use tracing::{info, warn};

// Re-exports
pub use api::routes::{create_router, AppState};
pub use config::Settings;
pub use core::dataset::TemperatureDataset;

/// Boots the dashboard API: loads the built-in dataset (if present), wires
/// up the weather client and serves until shutdown.
pub async fn run_server(settings: Settings, port: u16) -> anyhow::Result<()> {
    let dataset = match std::fs::read_to_string(&settings.dataset.default_csv_path) {
        Ok(text) => {
            let dataset = TemperatureDataset::parse_csv(&text)?;
            info!(
                "Loaded default dataset from {}: {} rows, {} cities",
                settings.dataset.default_csv_path.display(),
                dataset.len(),
                dataset.cities().len()
            );
            dataset
        }
        Err(e) => {
            warn!(
                "No default dataset at {} ({}); starting empty, waiting for an upload",
                settings.dataset.default_csv_path.display(),
                e
            );
            TemperatureDataset::default()
        }
    };

    let weather = weather::WeatherClient::new(&settings.weather)?;

    let state = Arc::new(AppState {
        dataset: Arc::new(tokio::sync::Mutex::new(dataset)),
        weather: Arc::new(weather),
        clock: Arc::new(core::clock::SystemClock),
        max_upload_bytes: settings.dataset.max_upload_bytes,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", settings.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
