use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::archive::DataArchive;
use crate::database::FileMetadata;
use crate::error::SeismicError;

#[derive(Debug, Default)]
pub struct IndexOutcome {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub records: Vec<FileMetadata>,
}

/// Parse every waveform file of a dataset on a bounded worker pool and emit
/// one metadata record per trace. A failed file is logged and skipped; the
/// caller persists the merged records sequentially.
pub fn scan_dataset(
    archive: &DataArchive,
    dataset: &str,
    workers: usize,
) -> Result<IndexOutcome, SeismicError> {
    let files = archive.waveform_file_names(dataset)?;
    if files.is_empty() {
        warn!("No waveform files found in dataset {}", dataset);
        return Ok(IndexOutcome::default());
    }

    info!(
        "Indexing {} files in dataset {} across {} workers",
        files.len(),
        dataset,
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| SeismicError::Internal {
            message: format!("failed to build index worker pool: {}", e),
        })?;

    let per_file: Vec<Option<Vec<FileMetadata>>> = pool.install(|| {
        files
            .par_iter()
            .map(|filename| match archive.read_file_traces(dataset, filename) {
                Ok(traces) => Some(
                    traces
                        .iter()
                        .map(|trace| FileMetadata {
                            dataset: dataset.to_string(),
                            filename: filename.clone(),
                            start_time: trace.start_time,
                            end_time: trace.end_time(),
                            sampling_rate: trace.sampling_rate,
                        })
                        .collect(),
                ),
                Err(e) => {
                    error!("Error processing file {}: {}", filename, e);
                    None
                }
            })
            .collect()
    });

    let mut outcome = IndexOutcome {
        files_scanned: files.len(),
        ..Default::default()
    };
    for result in per_file {
        match result {
            Some(mut records) => outcome.records.append(&mut records),
            None => outcome.files_failed += 1,
        }
    }
    Ok(outcome)
}
