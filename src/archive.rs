use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::error::SeismicError;
use crate::models::{DatasetIntegrity, FileInfo, FileIntegrity};
use crate::mseed::{self, MseedError};
use crate::waveform::{Trace, WaveformCollection};

const WAVEFORM_EXTENSION: &str = "mseed";

/// On-disk waveform archive: one subdirectory per dataset, `.mseed` files
/// inside. All reads are blocking; callers bridge into the async runtime.
#[derive(Debug, Clone)]
pub struct DataArchive {
    data_dir: PathBuf,
}

impl DataArchive {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn list_datasets(&self) -> Result<Vec<String>, SeismicError> {
        let mut datasets = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                datasets.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        if datasets.is_empty() {
            warn!("No datasets found in the data directory");
        }
        datasets.sort();
        Ok(datasets)
    }

    /// Dataset-wide time range: min start / max end over every trace of every
    /// file. Any unreadable file aborts the computation with no partial
    /// result.
    pub fn time_range(
        &self,
        dataset: &str,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), SeismicError> {
        let dir = self.dataset_dir(dataset)?;
        let mut range: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

        for path in waveform_files(&dir)? {
            let traces = mseed::read_traces(&path).map_err(|e| malformed(&path, e))?;
            for trace in &traces {
                let (start, end) = (trace.start_time, trace.end_time());
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(start), hi.max(end)),
                    None => (start, end),
                });
            }
        }

        range.ok_or_else(|| SeismicError::NoData {
            dataset: dataset.to_string(),
        })
    }

    /// Per-file time spans, sorted by start time. Unreadable files are logged
    /// and skipped.
    pub fn file_spans(&self, dataset: &str) -> Result<Vec<FileInfo>, SeismicError> {
        let dir = self.dataset_dir(dataset)?;
        let mut spans = Vec::new();

        for path in waveform_files(&dir)? {
            let filename = file_name(&path);
            match mseed::read_traces(&path) {
                Ok(traces) if !traces.is_empty() => {
                    let start = traces.iter().map(|t| t.start_time).min();
                    let end = traces.iter().map(|t| t.end_time()).max();
                    if let (Some(start_time), Some(end_time)) = (start, end) {
                        spans.push(FileInfo {
                            filename,
                            start_time,
                            end_time,
                        });
                    }
                }
                Ok(_) => warn!("File {} in {} contains no traces", filename, dataset),
                Err(e) => error!("Error processing file {}: {}", filename, e),
            }
        }

        info!("Found {} files in dataset {}", spans.len(), dataset);
        spans.sort_by_key(|s| s.start_time);
        Ok(spans)
    }

    /// Load every trace overlapping `[start, end]`. When `filenames` is given
    /// only those files are opened (index-assisted path); otherwise the whole
    /// dataset directory is scanned. Per-file read failures are logged and
    /// skipped.
    pub fn load_window(
        &self,
        dataset: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filenames: Option<&[String]>,
    ) -> Result<WaveformCollection, SeismicError> {
        let dir = self.dataset_dir(dataset)?;
        let mut collection = WaveformCollection::new();

        for path in waveform_files(&dir)? {
            let filename = file_name(&path);
            if let Some(wanted) = filenames {
                if !wanted.iter().any(|f| f == &filename) {
                    continue;
                }
            }
            match mseed::read_traces(&path) {
                Ok(traces) => {
                    for trace in traces {
                        if trace.overlaps(start, end) {
                            collection.push(trace);
                        }
                    }
                }
                Err(e) => error!("Error reading file {}: {}", filename, e),
            }
        }

        if collection.is_empty() {
            warn!(
                "No data found for the specified time range in dataset {}",
                dataset
            );
            return Err(SeismicError::NoData {
                dataset: dataset.to_string(),
            });
        }
        Ok(collection)
    }

    /// Raw traces of a single file. Missing file is not-found; unreadable or
    /// empty is malformed-input.
    pub fn read_raw(&self, dataset: &str, filename: &str) -> Result<Vec<Trace>, SeismicError> {
        let path = self.dataset_dir(dataset)?.join(filename);
        if !path.exists() {
            return Err(SeismicError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let traces = mseed::read_traces(&path).map_err(|e| malformed(&path, e))?;
        if traces.is_empty() {
            return Err(SeismicError::MalformedFile {
                filename: filename.to_string(),
                message: "no data found in the file".to_string(),
            });
        }
        Ok(traces)
    }

    /// Filenames of the dataset's waveform files, for the indexer fan-out.
    pub fn waveform_file_names(&self, dataset: &str) -> Result<Vec<String>, SeismicError> {
        let dir = self.dataset_dir(dataset)?;
        Ok(waveform_files(&dir)?.iter().map(|p| file_name(p)).collect())
    }

    /// Parse one dataset file into traces, mapping format errors to
    /// malformed-input.
    pub fn read_file_traces(
        &self,
        dataset: &str,
        filename: &str,
    ) -> Result<Vec<Trace>, SeismicError> {
        let path = self.dataset_dir(dataset)?.join(filename);
        mseed::read_traces(&path).map_err(|e| malformed(&path, e))
    }

    /// Scan every file for structural problems: unreadable records, files
    /// without traces, NaN or infinite amplitudes.
    pub fn integrity_report(&self, dataset: &str) -> Result<DatasetIntegrity, SeismicError> {
        let dir = self.dataset_dir(dataset)?;
        let mut files = Vec::new();

        for path in waveform_files(&dir)? {
            let filename = file_name(&path);
            let mut issues = Vec::new();
            match mseed::read_traces(&path) {
                Ok(traces) => {
                    if traces.is_empty() {
                        issues.push("contains no traces".to_string());
                    }
                    if traces
                        .iter()
                        .any(|t| t.samples.iter().any(|v| v.is_nan()))
                    {
                        issues.push("contains NaN values".to_string());
                    }
                    if traces
                        .iter()
                        .any(|t| t.samples.iter().any(|v| v.is_infinite()))
                    {
                        issues.push("contains infinite values".to_string());
                    }
                }
                Err(e) => issues.push(format!("unreadable: {}", e)),
            }
            for issue in &issues {
                warn!("File {} in {}: {}", filename, dataset, issue);
            }
            files.push(FileIntegrity { filename, issues });
        }

        info!("Completed integrity check for {}", dataset);
        Ok(DatasetIntegrity {
            dataset: dataset.to_string(),
            files,
        })
    }

    fn dataset_dir(&self, dataset: &str) -> Result<PathBuf, SeismicError> {
        let dir = self.data_dir.join(dataset);
        if !dir.is_dir() {
            return Err(SeismicError::DatasetNotFound {
                dataset: dataset.to_string(),
            });
        }
        Ok(dir)
    }
}

fn waveform_files(dir: &Path) -> Result<Vec<PathBuf>, SeismicError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == WAVEFORM_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn malformed(path: &Path, err: MseedError) -> SeismicError {
    if let MseedError::Io { ref source, .. } = err {
        if source.kind() == std::io::ErrorKind::NotFound {
            return SeismicError::FileNotFound {
                path: path.display().to_string(),
            };
        }
    }
    SeismicError::MalformedFile {
        filename: file_name(path),
        message: err.to_string(),
    }
}
