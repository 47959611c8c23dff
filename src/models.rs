use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRange {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetFiles {
    pub files: Vec<FileInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawFileMetadata {
    pub dataset: String,
    pub filename: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub sampling_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceData {
    pub channel: String,
    pub time: Vec<f64>,
    pub amplitude: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawFileData {
    pub metadata: RawFileMetadata,
    pub traces: Vec<TraceData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingRequest {
    pub dataset: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub method: String,
    #[serde(default)]
    pub parameters: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    pub snr_before: f64,
    pub snr_after: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDetectionRequest {
    pub dataset: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub method: String,
    #[serde(default)]
    pub parameters: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectedEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub magnitude: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub dataset: String,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub records_inserted: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileIntegrity {
    pub filename: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetIntegrity {
    pub dataset: String,
    pub files: Vec<FileIntegrity>,
}
