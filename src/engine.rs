use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::archive::DataArchive;
use crate::config::Config;
use crate::database::MetadataStore;
use crate::detection;
use crate::error::SeismicError;
use crate::indexer;
use crate::models::{
    DatasetFiles, DatasetInfo, DatasetIntegrity, DetectedEvent, EventDetectionRequest,
    IndexSummary, PerformanceMetrics, ProcessingRequest, RawFileData, RawFileMetadata, TimeRange,
    TraceData,
};
use crate::processing;
use crate::waveform::WaveformCollection;

/// Service facade tying the archive, the metadata store, and the signal
/// algorithms together. Archive reads are blocking and bridged through
/// `spawn_blocking`; one engine is shared across all requests.
#[derive(Clone)]
pub struct SeismicEngine {
    archive: DataArchive,
    store: MetadataStore,
    index_workers: usize,
}

impl SeismicEngine {
    pub async fn new(config: &Config) -> Result<Self, SeismicError> {
        let archive = DataArchive::new(config.data_dir.clone());
        let store = MetadataStore::new(&config.database_path).await?;
        info!(
            "Engine ready: data dir {}, {} index workers",
            config.data_dir.display(),
            config.index_workers
        );
        Ok(Self {
            archive,
            store,
            index_workers: config.index_workers,
        })
    }

    pub async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, SeismicError> {
        let archive = self.archive.clone();
        let names = run_blocking(move || archive.list_datasets()).await?;
        Ok(names
            .into_iter()
            .map(|name| DatasetInfo {
                description: format!("Seismic waveform dataset '{}'", name),
                name,
            })
            .collect())
    }

    pub async fn dataset_time_range(&self, dataset: &str) -> Result<TimeRange, SeismicError> {
        let archive = self.archive.clone();
        let dataset = dataset.to_string();
        let (start_time, end_time) = run_blocking(move || archive.time_range(&dataset)).await?;
        Ok(TimeRange {
            start_time,
            end_time,
        })
    }

    pub async fn dataset_files(&self, dataset: &str) -> Result<DatasetFiles, SeismicError> {
        let archive = self.archive.clone();
        let dataset = dataset.to_string();
        let files = run_blocking(move || archive.file_spans(&dataset)).await?;
        Ok(DatasetFiles { files })
    }

    pub async fn raw_file_data(
        &self,
        dataset: &str,
        filename: &str,
    ) -> Result<RawFileData, SeismicError> {
        let archive = self.archive.clone();
        let dataset_name = dataset.to_string();
        let file = filename.to_string();
        let traces = run_blocking(move || archive.read_raw(&dataset_name, &file)).await?;

        // read_raw guarantees at least one trace.
        let start_time = traces
            .iter()
            .map(|t| t.start_time)
            .min()
            .unwrap_or_else(Utc::now);
        let end_time = traces
            .iter()
            .map(|t| t.end_time())
            .max()
            .unwrap_or(start_time);
        let sampling_rate = traces.first().map(|t| t.sampling_rate).unwrap_or(0.0);

        Ok(RawFileData {
            metadata: RawFileMetadata {
                dataset: dataset.to_string(),
                filename: filename.to_string(),
                start_time,
                end_time,
                sampling_rate,
            },
            traces: traces
                .into_iter()
                .map(|trace| TraceData {
                    channel: trace.source_id(),
                    time: trace.relative_times(),
                    amplitude: trace.samples,
                })
                .collect(),
        })
    }

    /// Parse every file of a dataset on the worker pool and persist one
    /// record per trace. Inserts run sequentially after the parallel scan.
    pub async fn index_dataset(&self, dataset: &str) -> Result<IndexSummary, SeismicError> {
        let archive = self.archive.clone();
        let name = dataset.to_string();
        let workers = self.index_workers;
        let outcome = run_blocking(move || indexer::scan_dataset(&archive, &name, workers)).await?;

        for record in &outcome.records {
            self.store.insert_file_metadata(record).await?;
        }
        let range = self.store.dataset_time_range(dataset).await?;

        info!(
            "Indexed dataset {}: {} records from {} files ({} failed)",
            dataset,
            outcome.records.len(),
            outcome.files_scanned,
            outcome.files_failed
        );
        Ok(IndexSummary {
            dataset: dataset.to_string(),
            files_scanned: outcome.files_scanned,
            files_failed: outcome.files_failed,
            records_inserted: outcome.records.len(),
            start_time: range.map(|(start, _)| start),
            end_time: range.map(|(_, end)| end),
        })
    }

    pub async fn process(
        &self,
        request: &ProcessingRequest,
    ) -> Result<PerformanceMetrics, SeismicError> {
        let collection = self
            .load_window(&request.dataset, request.start_time, request.end_time)
            .await?;
        let method = request.method.clone();
        let parameters = request.parameters.clone();
        run_blocking(move || processing::process(&collection, &method, &parameters)).await
    }

    pub async fn detect_events(
        &self,
        request: &EventDetectionRequest,
    ) -> Result<Vec<DetectedEvent>, SeismicError> {
        let collection = self
            .load_window(&request.dataset, request.start_time, request.end_time)
            .await?;
        let method = request.method.clone();
        let parameters = request.parameters.clone();
        run_blocking(move || detection::detect_events(&collection, &method, &parameters)).await
    }

    pub fn processing_methods(&self) -> Value {
        processing::method_parameters()
    }

    pub async fn integrity_report(&self, dataset: &str) -> Result<DatasetIntegrity, SeismicError> {
        let archive = self.archive.clone();
        let dataset = dataset.to_string();
        run_blocking(move || archive.integrity_report(&dataset)).await
    }

    /// Load all traces overlapping the window. When the metadata index has
    /// rows for the dataset only the overlapping files are opened; otherwise
    /// the whole dataset directory is scanned.
    async fn load_window(
        &self,
        dataset: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WaveformCollection, SeismicError> {
        let filenames = if self.store.has_records(dataset).await? {
            Some(self.store.files_in_range(dataset, start, end).await?)
        } else {
            None
        };

        let archive = self.archive.clone();
        let dataset = dataset.to_string();
        run_blocking(move || archive.load_window(&dataset, start, end, filenames.as_deref())).await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, SeismicError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SeismicError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SeismicError::Internal {
            message: format!("blocking task failed: {}", e),
        })?
}
