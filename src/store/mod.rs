//! Document store for dataset collections.
//!
//! The engine never talks to storage directly: the CLI fetches raw documents,
//! normalizes them and rebuilds the dataset after every mutation.

pub mod json;

pub use json::JsonStore;

use crate::error::{StatsError, StatsResult};
use crate::ingest::RawRecord;
use crate::models::Record;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Options for a bulk upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Records committed per chunk.
    pub batch_size: usize,
    /// Draw a progress bar per committed chunk.
    pub show_progress: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            batch_size: 400,
            show_progress: false,
        }
    }
}

/// Outcome of a successful bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    pub records_written: usize,
    pub chunks: usize,
}

/// Collection-oriented document store.
///
/// Writes are not idempotent: creating the same record twice stores it twice.
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Every document of a collection; a missing collection is empty.
    async fn fetch_all(&self, collection: &str) -> StatsResult<Vec<RawRecord>>;

    /// Store one record under a fresh id and return the id.
    async fn create(&self, collection: &str, record: &Record) -> StatsResult<String>;

    /// Replace every non-id field of an existing document.
    async fn update(&self, collection: &str, id: &str, record: &Record) -> StatsResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StatsResult<()>;

    /// Commit one chunk atomically, returning how many records were written.
    async fn commit_chunk(&self, collection: &str, records: &[Record]) -> StatsResult<usize>;

    /// Write `records` in independent chunks of `options.batch_size`.
    ///
    /// Chunks committed before a failure stay committed; the error reports how
    /// far the upload got.
    async fn bulk_create(
        &self,
        collection: &str,
        records: &[Record],
        options: &UploadOptions,
    ) -> StatsResult<UploadReport> {
        let batch_size = options.batch_size.max(1);
        let total_chunks = records.len().div_ceil(batch_size);
        info!(
            "Uploading {} records to '{}' in {} chunks of {}",
            records.len(),
            collection,
            total_chunks,
            batch_size
        );

        let progress = options.show_progress.then(|| upload_progress_bar(total_chunks));

        let mut committed_records = 0;
        for (index, chunk) in records.chunks(batch_size).enumerate() {
            match self.commit_chunk(collection, chunk).await {
                Ok(written) => {
                    committed_records += written;
                    debug!("Committed chunk {}/{}", index + 1, total_chunks);
                    if let Some(ref pb) = progress {
                        pb.inc(1);
                    }
                }
                Err(err) => {
                    if let Some(ref pb) = progress {
                        pb.abandon_with_message("Upload interrupted");
                    }
                    warn!(
                        "Chunk {}/{} failed after {} records were committed",
                        index + 1,
                        total_chunks,
                        committed_records
                    );
                    return Err(StatsError::PartialUpload {
                        committed_chunks: index,
                        total_chunks,
                        committed_records,
                        source: Box::new(err),
                    });
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Upload complete");
        }

        Ok(UploadReport {
            records_written: committed_records,
            chunks: total_chunks,
        })
    }
}

fn upload_progress_bar(chunks: usize) -> ProgressBar {
    let pb = ProgressBar::new(chunks as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryValues;
    use std::sync::Mutex;

    /// In-memory store that fails on one chunk.
    struct FlakyStore {
        fail_on_chunk: usize,
        chunks_seen: Mutex<usize>,
        written: Mutex<Vec<Record>>,
    }

    impl FlakyStore {
        fn new(fail_on_chunk: usize) -> Self {
            Self {
                fail_on_chunk,
                chunks_seen: Mutex::new(0),
                written: Mutex::new(Vec::new()),
            }
        }
    }

    impl Store for FlakyStore {
        async fn fetch_all(&self, _collection: &str) -> StatsResult<Vec<RawRecord>> {
            let written = self.written.lock().unwrap();
            Ok(written.iter().map(Record::to_raw).collect())
        }

        async fn create(&self, _collection: &str, record: &Record) -> StatsResult<String> {
            self.written.lock().unwrap().push(record.clone());
            Ok("id".to_string())
        }

        async fn update(&self, collection: &str, id: &str, _record: &Record) -> StatsResult<()> {
            Err(StatsError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
        }

        async fn delete(&self, collection: &str, id: &str) -> StatsResult<()> {
            Err(StatsError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
        }

        async fn commit_chunk(&self, _collection: &str, records: &[Record]) -> StatsResult<usize> {
            let mut seen = self.chunks_seen.lock().unwrap();
            *seen += 1;
            if *seen == self.fail_on_chunk {
                return Err(StatsError::Io(std::io::Error::other("quota exceeded")));
            }
            self.written.lock().unwrap().extend_from_slice(records);
            Ok(records.len())
        }
    }

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                id: None,
                year: Some(1981 + i as i32),
                values: CategoryValues::new(vec![("male".to_string(), i as f64)]),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_bulk_create_chunks() {
        let store = FlakyStore::new(usize::MAX);
        let options = UploadOptions {
            batch_size: 400,
            show_progress: false,
        };

        let report = store.bulk_create("sex", &records(1000), &options).await.unwrap();
        assert_eq!(report.chunks, 3);
        assert_eq!(report.records_written, 1000);
        assert_eq!(*store.chunks_seen.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_partial_upload_keeps_committed_chunks() {
        let store = FlakyStore::new(3);
        let options = UploadOptions {
            batch_size: 400,
            show_progress: false,
        };

        let err = store.bulk_create("sex", &records(1000), &options).await.unwrap_err();
        match err {
            StatsError::PartialUpload {
                committed_chunks,
                total_chunks,
                committed_records,
                ..
            } => {
                assert_eq!(committed_chunks, 2);
                assert_eq!(total_chunks, 3);
                assert_eq!(committed_records, 800);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.written.lock().unwrap().len(), 800);
    }

    #[tokio::test]
    async fn test_empty_upload() {
        let store = FlakyStore::new(1);
        let report = store
            .bulk_create("sex", &[], &UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(report.chunks, 0);
        assert_eq!(report.records_written, 0);
    }
}
