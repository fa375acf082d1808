// Router-level tests driven through tower's oneshot, no live server needed.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use temp_anomaly_dashboard::config::WeatherSettings;
use temp_anomaly_dashboard::core::clock::FixedClock;
use temp_anomaly_dashboard::weather::WeatherClient;
use temp_anomaly_dashboard::{create_router, AppState, TemperatureDataset};

fn test_router() -> Router {
    let weather_settings = WeatherSettings {
        // Never dialed by these tests; port 9 (discard) guards against that.
        base_url: "http://127.0.0.1:9/weather".to_string(),
        api_key: "test-key".to_string(),
        request_timeout_secs: 1,
    };

    let state = Arc::new(AppState {
        dataset: Arc::new(Mutex::new(TemperatureDataset::default())),
        weather: Arc::new(WeatherClient::new(&weather_settings).unwrap()),
        clock: Arc::new(FixedClock(6)),
        max_upload_bytes: 1024 * 1024,
    });
    create_router(state)
}

fn june_csv() -> &'static str {
    "city,timestamp,temperature\n\
     A,2024-06-01,20.0\n\
     A,2024-06-02,22.0\n\
     A,2024-06-03,21.0\n\
     Berlin,2024-12-01,3.0\n"
}

async fn upload(app: &Router, csv: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/dataset")
                .header("content-type", "text/csv")
                .body(Body::from(csv.to_string()))?,
        )
        .await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn get_json(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn upload_then_query_round_trip() -> Result<()> {
    let app = test_router();

    let (status, body) = upload(&app, june_csv()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], 4);
    assert_eq!(body["cities"], serde_json::json!(["A", "Berlin"]));

    let (status, cities) = get_json(&app, "/api/v1/cities").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cities, serde_json::json!(["A", "Berlin"]));

    let (status, history) = get_json(&app, "/api/v1/cities/A/history").await?;
    assert_eq!(status, StatusCode::OK);
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["city"] == "A"));
    assert!(rows[0]["rolling_avg"].is_number());
    Ok(())
}

#[tokio::test]
async fn uploads_replace_the_previous_dataset() -> Result<()> {
    let app = test_router();

    upload(&app, june_csv()).await?;
    let replacement = "city,timestamp,temperature\nOslo,2024-06-01,12.0\n";
    let (status, body) = upload(&app, replacement).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], 1);

    let (_, cities) = get_json(&app, "/api/v1/cities").await?;
    assert_eq!(cities, serde_json::json!(["Oslo"]));

    // The old cities are gone with the old dataset
    let (status, _) = get_json(&app, "/api/v1/cities/A/history").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_upload_is_a_bad_request() -> Result<()> {
    let app = test_router();

    let (status, body) = upload(&app, "city,timestamp\nA,2024-06-01\n").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("temperature"));
    Ok(())
}

#[tokio::test]
async fn live_classification_uses_the_injected_month() -> Result<()> {
    let app = test_router();
    upload(&app, june_csv()).await?;

    // June history for A: mean 21, std 1.0
    let (status, hot) = get_json(&app, "/api/v1/cities/A/live?temp=30").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hot["is_anomaly"], true);
    assert_eq!(hot["baseline"]["mean"], 21.0);

    let (_, mild) = get_json(&app, "/api/v1/cities/A/live?temp=21.5").await?;
    assert_eq!(mild["is_anomaly"], false);

    // Berlin only has December data; with the clock pinned to June this is
    // the insufficient-data outcome, not an error and not an anomaly.
    let (status, berlin) = get_json(&app, "/api/v1/cities/Berlin/live?temp=3").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(berlin["is_anomaly"], false);
    assert!(berlin["baseline"].is_null());
    Ok(())
}

#[tokio::test]
async fn unknown_city_maps_to_not_found() -> Result<()> {
    let app = test_router();
    upload(&app, june_csv()).await?;

    for uri in [
        "/api/v1/cities/Atlantis/history",
        "/api/v1/cities/Atlantis/monthly",
        "/api/v1/cities/Atlantis/live?temp=20",
    ] {
        let (status, body) = get_json(&app, uri).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("Atlantis"));
    }
    Ok(())
}

#[tokio::test]
async fn monthly_endpoint_returns_baselines_and_outliers() -> Result<()> {
    let app = test_router();
    upload(&app, june_csv()).await?;

    let (status, body) = get_json(&app, "/api/v1/cities/A/monthly").await?;
    assert_eq!(status, StatusCode::OK);

    let baselines = body["baselines"].as_array().unwrap();
    assert_eq!(baselines.len(), 1);
    assert_eq!(baselines[0]["month"], 6);
    assert_eq!(baselines[0]["mean"], 21.0);
    assert_eq!(baselines[0]["samples"], 3);

    assert!(body["global_outliers"].as_array().unwrap().is_empty());
    Ok(())
}
