/*
* Temperature Anomaly Dashboard API Routes
* -----------------------------------------------
*
* Welcome to the nerve center of the dashboard API! This is where all the
* HTTP magic happens, powered by Axum (because who uses Actix in 2025,
* right?).
*
* Architecture Overview:
* --------------------
* A RESTful API serving chart-ready anomaly data. The charts themselves live
* elsewhere; we hand out plain data and let the presentation layer worry
* about pixels.
*
* Core Components:
* --------------
* 1. AppState: thread-safe shared state using Arc<Mutex<T>>
*    - TemperatureDataset: the session's raw history (uploads replace it wholesale)
*    - WeatherClient: talks to the weather provider (no retries, no mercy)
*    - Clock: injected month source, so tests don't depend on the calendar
*
* API Endpoints (because REST is still not dead in 2025):
* ---------------------------------------------------
* POST /api/v1/dataset                 - Upload a CSV, replaces the dataset
* GET  /api/v1/cities                  - Lists cities present in the history
* GET  /api/v1/cities/{city}/history   - Rolling-annotated series for a city
* GET  /api/v1/cities/{city}/monthly   - Monthly baselines + global outliers
* GET  /api/v1/cities/{city}/live      - Classify a caller-supplied temperature
* POST /api/v1/cities/{city}/check     - Fetch live temperature, then classify
*
* Technical Implementation Details:
* ------------------------------
* - Every handler recomputes from the raw dataset; derived values are never
*   cached across requests, so an upload can never serve stale annotations
* - Proper error handling with ApiError (more robust than my dating life)
* - Tracing for logging (because println! is so 2021)
* - Body size limit on uploads (someone WILL try the national archive)
*/

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::analysis::live::{Baseline, LiveAssessment};
use crate::analysis::{self, monthly};
use crate::api::error::ApiError;
use crate::core::clock::Clock;
use crate::core::dataset::{AnnotatedReading, MonthlyBaseline, Reading, TemperatureDataset};
use crate::core::errors::AnomalyError;
use crate::weather::WeatherClient;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Mutex<TemperatureDataset>>,
    pub weather: Arc<WeatherClient>,
    pub clock: Arc<dyn Clock>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub dataset_id: Uuid,
    pub rows: usize,
    pub cities: Vec<String>,
    pub anomalies: usize,
}

#[derive(Debug, Serialize)]
pub struct MonthlyTrendsResponse {
    pub city: String,
    pub baselines: Vec<MonthlyBaseline>,
    pub global_outliers: Vec<Reading>,
}

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub temp: f64,
}

#[derive(Debug, Serialize)]
pub struct LiveCheckResponse {
    pub city: String,
    pub current_temp: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    pub is_anomaly: bool,
    /// Absent when the city has no history for the current month; callers
    /// must treat that as "insufficient data", not as a normal negative.
    pub baseline: Option<Baseline>,
}

impl LiveCheckResponse {
    fn new(city: String, current_temp: f64, assessment: LiveAssessment) -> Self {
        Self {
            city,
            current_temp,
            fetched_at: None,
            is_anomaly: assessment.is_anomaly,
            baseline: assessment.baseline,
        }
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let max_upload_bytes = app_state.max_upload_bytes;

    Router::new()
        .route("/api/v1/dataset", post(upload_dataset))
        .route("/api/v1/cities", get(list_cities))
        .route("/api/v1/cities/{city}/history", get(city_history))
        .route("/api/v1/cities/{city}/monthly", get(city_monthly))
        .route("/api/v1/cities/{city}/live", get(classify_supplied))
        .route("/api/v1/cities/{city}/check", post(check_live))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[axum::debug_handler]
async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<UploadResponse>, ApiError> {
    let parsed = TemperatureDataset::parse_csv(&body)?;
    let annotated = analysis::annotate(&parsed);
    let response = UploadResponse {
        dataset_id: Uuid::new_v4(),
        rows: parsed.len(),
        cities: parsed.cities(),
        anomalies: annotated.iter().filter(|r| r.is_anomaly).count(),
    };

    info!(
        "Dataset {} uploaded: {} rows, {} cities, {} anomalies",
        response.dataset_id,
        response.rows,
        response.cities.len(),
        response.anomalies
    );

    *state.dataset.lock().await = parsed;
    Ok(Json(response))
}

#[axum::debug_handler]
async fn list_cities(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let dataset = state.dataset.lock().await;
    Json(dataset.cities())
}

#[axum::debug_handler]
async fn city_history(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<Vec<AnnotatedReading>>, ApiError> {
    let dataset = state.dataset.lock().await;
    if !dataset.contains_city(&city) {
        return Err(AnomalyError::UnknownCity(city).into());
    }

    let annotated = analysis::annotate(&dataset)
        .into_iter()
        .filter(|r| r.city == city)
        .collect();
    Ok(Json(annotated))
}

#[axum::debug_handler]
async fn city_monthly(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<MonthlyTrendsResponse>, ApiError> {
    let dataset = state.dataset.lock().await;
    let baselines = monthly::monthly_baselines(&dataset, &city)?;
    let global_outliers = monthly::global_outliers(&dataset, &city)?;
    Ok(Json(MonthlyTrendsResponse {
        city,
        baselines,
        global_outliers,
    }))
}

#[axum::debug_handler]
async fn classify_supplied(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    Query(query): Query<LiveQuery>,
) -> Result<Json<LiveCheckResponse>, ApiError> {
    let dataset = state.dataset.lock().await;
    let assessment = analysis::live::assess(&dataset, &city, query.temp, state.clock.as_ref())?;
    Ok(Json(LiveCheckResponse::new(city, query.temp, assessment)))
}

#[axum::debug_handler]
async fn check_live(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<LiveCheckResponse>, ApiError> {
    let live = state.weather.fetch_current(&city).await?;

    let dataset = state.dataset.lock().await;
    let assessment =
        analysis::live::assess(&dataset, &city, live.temperature, state.clock.as_ref())?;

    let mut response = LiveCheckResponse::new(city, live.temperature, assessment);
    response.fetched_at = Some(live.fetched_at);
    Ok(Json(response))
}
