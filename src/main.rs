use tracing::error;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    if let Err(e) = temp_anomaly_dashboard::cli::run().await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}
