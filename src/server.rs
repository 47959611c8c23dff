use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::SeismicEngine;
use crate::error::SeismicError;
use crate::models::{
    DatasetFiles, DatasetInfo, DatasetIntegrity, DetectedEvent, EventDetectionRequest,
    IndexSummary, PerformanceMetrics, ProcessingRequest, RawFileData, TimeRange,
};

/// Build the HTTP router over a shared engine.
pub fn router(engine: SeismicEngine) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/datasets", get(list_datasets))
        .route("/datasets/:dataset/timerange", get(dataset_time_range))
        .route("/datasets/:dataset/files", get(dataset_files))
        .route("/datasets/:dataset/files/:filename", get(raw_file_data))
        .route("/datasets/:dataset/index", post(index_dataset))
        .route("/datasets/:dataset/integrity", get(integrity_report))
        .route("/processing-methods", get(processing_methods))
        .route("/process", post(process))
        .route("/detect-events", post(detect_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Seismic waveform service" }))
}

async fn list_datasets(
    State(engine): State<SeismicEngine>,
) -> Result<Json<Vec<DatasetInfo>>, SeismicError> {
    Ok(Json(engine.list_datasets().await?))
}

async fn dataset_time_range(
    State(engine): State<SeismicEngine>,
    Path(dataset): Path<String>,
) -> Result<Json<TimeRange>, SeismicError> {
    Ok(Json(engine.dataset_time_range(&dataset).await?))
}

async fn dataset_files(
    State(engine): State<SeismicEngine>,
    Path(dataset): Path<String>,
) -> Result<Json<DatasetFiles>, SeismicError> {
    Ok(Json(engine.dataset_files(&dataset).await?))
}

async fn raw_file_data(
    State(engine): State<SeismicEngine>,
    Path((dataset, filename)): Path<(String, String)>,
) -> Result<Json<RawFileData>, SeismicError> {
    Ok(Json(engine.raw_file_data(&dataset, &filename).await?))
}

async fn index_dataset(
    State(engine): State<SeismicEngine>,
    Path(dataset): Path<String>,
) -> Result<Json<IndexSummary>, SeismicError> {
    Ok(Json(engine.index_dataset(&dataset).await?))
}

async fn integrity_report(
    State(engine): State<SeismicEngine>,
    Path(dataset): Path<String>,
) -> Result<Json<DatasetIntegrity>, SeismicError> {
    Ok(Json(engine.integrity_report(&dataset).await?))
}

async fn processing_methods(State(engine): State<SeismicEngine>) -> Json<Value> {
    Json(engine.processing_methods())
}

async fn process(
    State(engine): State<SeismicEngine>,
    Json(request): Json<ProcessingRequest>,
) -> Result<Json<PerformanceMetrics>, SeismicError> {
    Ok(Json(engine.process(&request).await?))
}

async fn detect_events(
    State(engine): State<SeismicEngine>,
    Json(request): Json<EventDetectionRequest>,
) -> Result<Json<Vec<DetectedEvent>>, SeismicError> {
    Ok(Json(engine.detect_events(&request).await?))
}
